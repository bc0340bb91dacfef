use std::rc::Rc;

use sage_core::FilterAction;
use sage_core::config::CalendarConfig;
use sage_core::gantt::{
  EventBar,
  GanttLayout,
  MarkerKind
};
use sage_core::svg::{
  label_row,
  marker_style
};
use web_sys::MouseEvent;
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html,
  use_state
};

const LANE_STRIPE: [&str; 2] =
  ["#ffffff", "#f6f7f9"];
const TOOLTIP_OFFSET: i32 = 14;

#[derive(Clone, PartialEq)]
struct HoverTip {
  text: String,
  x:    i32,
  y:    i32
}

#[derive(Properties, PartialEq)]
pub struct GanttChartProps {
  pub layout:    GanttLayout,
  pub config:    Rc<CalendarConfig>,
  pub selected:  Option<String>,
  pub on_action: Callback<FilterAction>
}

fn px(value: f64) -> String {
  format!("{value:.2}")
}

#[function_component(GanttChart)]
pub fn gantt_chart(
  props: &GanttChartProps
) -> Html {
  let hover = use_state(|| None::<HoverTip>);
  let layout = &props.layout;
  let config = &props.config;
  let total_width =
    layout.label_width + layout.width;
  let total_height =
    layout.header_height + layout.height;
  let body_top = layout.header_height;

  let lane_rows = layout
    .lanes
    .iter()
    .enumerate()
    .map(|(idx, band)| {
      let y = body_top + band.y;
      html! {
          <g class="lane" key={band.lane.as_key()}>
              <rect
                  class="lane-band"
                  x="0"
                  y={px(y)}
                  width={px(total_width)}
                  height={px(band.height)}
                  fill={LANE_STRIPE[idx % 2]}
              />
              <text class="lane-label" x="8" y={px(y + band.height / 2.0 + 4.0)}>
                  { band.label.clone() }
              </text>
          </g>
      }
    })
    .collect::<Html>();

  let school_bands = layout
    .lanes
    .iter()
    .flat_map(|band| {
      band.school_bands.iter().map(
        move |school| (band, school)
      )
    })
    .map(|(band, school)| {
      html! {
          <rect
              class="school-year"
              x={px(school.x)}
              y={px(body_top + band.y)}
              width={px(school.width)}
              height={px(band.height)}
              fill={config.school_year.fill.clone()}
              fill-opacity={config.school_year.opacity.to_string()}
              pointer-events="none"
          />
      }
    })
    .collect::<Html>();

  let markers = layout
    .markers
    .iter()
    .map(|marker| {
      let style =
        marker_style(config, marker.kind);
      let y1 = if marker.kind
        == MarkerKind::Month
      {
        body_top
      } else {
        0.0
      };
      html! {
          <g class={marker.kind.as_class()}>
              <line
                  x1={px(marker.x)}
                  y1={px(y1)}
                  x2={px(marker.x)}
                  y2={px(total_height)}
                  stroke={style.color.clone()}
                  stroke-width={style.width.to_string()}
                  stroke-opacity={style.opacity.to_string()}
                  stroke-dasharray={style.dash.clone()}
              />
              <text
                  x={px(marker.x + 3.0)}
                  y={px(label_row(marker.kind))}
                  fill={style.color.clone()}
              >{ marker.label.clone() }</text>
          </g>
      }
    })
    .collect::<Html>();

  let render_bar = |bar: &EventBar| {
    let selected = props.selected.as_deref()
      == Some(bar.event_id.as_str());
    let on_click = {
      let on_action = props.on_action.clone();
      let id = bar.event_id.clone();
      move |_: MouseEvent| {
        on_action.emit(
          FilterAction::SelectEvent(
            id.clone()
          )
        )
      }
    };
    let on_move = {
      let hover = hover.clone();
      let text = bar.tooltip.clone();
      move |e: MouseEvent| {
        hover.set(Some(HoverTip {
          text: text.clone(),
          x:    e.client_x() + TOOLTIP_OFFSET,
          y:    e.client_y() + TOOLTIP_OFFSET
        }));
      }
    };
    let on_leave = {
      let hover = hover.clone();
      move |_: MouseEvent| hover.set(None)
    };
    let (stroke, stroke_width, dash) =
      if selected {
        (
          Some("#1b1f24".to_string()),
          Some("2.5"),
          None
        )
      } else if bar.urgent {
        (
          Some("#e81123".to_string()),
          Some("2"),
          None
        )
      } else if bar.estimated {
        (
          Some(bar.color.clone()),
          Some("1"),
          Some("3 2")
        )
      } else {
        (None, None, None)
      };

    html! {
        <g
            key={bar.event_id.clone()}
            class={classes!(
                "event-bar",
                bar.estimated.then_some("estimated"),
                bar.urgent.then_some("urgent"),
                selected.then_some("selected")
            )}
            onclick={on_click}
            onmousemove={on_move}
            onmouseleave={on_leave}
        >
            <rect
                x={px(bar.x)}
                y={px(body_top + bar.y)}
                width={px(bar.width)}
                height={px(bar.height)}
                rx="3"
                fill={bar.color.clone()}
                fill-opacity={if bar.estimated { "0.55" } else { "1" }}
                stroke={stroke}
                stroke-width={stroke_width}
                stroke-dasharray={dash}
            />
        </g>
    }
  };
  let bars = layout
    .bars
    .iter()
    .map(render_bar)
    .collect::<Html>();

  let reference = match layout.reference_x {
    | Some(x) => {
      let style = &config.markers.reference;
      let label = style
        .label
        .clone()
        .unwrap_or_else(|| "Today".to_string());
      html! {
          <g class="marker-reference">
              <line
                  x1={px(x)}
                  y1="0"
                  x2={px(x)}
                  y2={px(total_height)}
                  stroke={style.color.clone()}
                  stroke-width={style.width.to_string()}
                  stroke-opacity={style.opacity.to_string()}
                  stroke-dasharray={style.dash.clone()}
              />
              <text x={px(x + 3.0)} y={px(body_top - 2.0)} fill={style.color.clone()}>
                  { format!("{label} {}", layout.reference_date.format("%d %b")) }
              </text>
          </g>
      }
    }
    | None => html! {}
  };

  let tooltip = match (*hover).clone() {
    | Some(tip) => html! {
        <div
            class="gantt-tooltip"
            style={format!("position:fixed;left:{}px;top:{}px;", tip.x, tip.y)}
        >
            {
                for tip.text.lines().map(|line| html! {
                    <div>{ line.to_string() }</div>
                })
            }
        </div>
    },
    | None => html! {}
  };

  html! {
      <div class="panel gantt-panel">
          <div class="gantt-scroll">
              <svg
                  class="gantt-chart"
                  xmlns="http://www.w3.org/2000/svg"
                  width={px(total_width)}
                  height={px(total_height)}
                  viewBox={format!("0 0 {} {}", px(total_width), px(total_height))}
              >
                  { lane_rows }
                  <g class="timeline" transform={format!("translate({},0)", px(layout.label_width))}>
                      { school_bands }
                      { markers }
                      { bars }
                      { reference }
                  </g>
              </svg>
          </div>
          {
              if layout.bars.is_empty() {
                  html! {
                      <div class="gantt-empty">{ "No events match the current filters." }</div>
                  }
              } else {
                  html! {}
              }
          }
          { tooltip }
      </div>
  }
}
