use chrono::NaiveDate;
use sage_core::config::ViewPreset;
use sage_core::filter::{
  DATE_INPUT_FORMAT,
  TimeRange
};
use sage_core::{
  FilterAction,
  FilterState
};
use web_sys::{
  Event,
  HtmlInputElement,
  HtmlSelectElement,
  MouseEvent
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  classes,
  function_component,
  html
};

const EXPORT_FILE_NAME: &str =
  "sage-programme-calendar.svg";

#[derive(Properties, PartialEq)]
pub struct ToolbarProps {
  pub state:       FilterState,
  pub presets:     Vec<ViewPreset>,
  pub today:       NaiveDate,
  pub export_href: String,
  pub on_action:   Callback<FilterAction>
}

fn emit_on_click(
  on_action: &Callback<FilterAction>,
  action: FilterAction
) -> Callback<MouseEvent> {
  let on_action = on_action.clone();
  Callback::from(move |_| {
    on_action.emit(action.clone())
  })
}

#[function_component(Toolbar)]
pub fn toolbar(
  props: &ToolbarProps
) -> Html {
  let state = &props.state;
  let can_shift =
    state.time_range.months().is_some();

  let on_reference_change = {
    let on_action = props.on_action.clone();
    Callback::from(move |e: Event| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      on_action.emit(
        FilterAction::SetReferenceDateInput(
          input.value()
        )
      );
    })
  };

  let on_preset_change = {
    let on_action = props.on_action.clone();
    Callback::from(move |e: Event| {
      let select: HtmlSelectElement =
        e.target_unchecked_into();
      let value = select.value();
      if value.is_empty() {
        on_action
          .emit(FilterAction::ClearPreset);
      } else {
        on_action.emit(
          FilterAction::ApplyPreset(value)
        );
      }
    })
  };

  let on_estimated_change = {
    let on_action = props.on_action.clone();
    Callback::from(move |e: Event| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      on_action.emit(
        FilterAction::SetShowEstimated(
          input.checked()
        )
      );
    })
  };

  let preset_hint = state
    .selected_preset
    .as_deref()
    .and_then(|id| {
      props
        .presets
        .iter()
        .find(|preset| preset.id == id)
    })
    .and_then(|preset| {
      preset.description.clone()
    });

  html! {
      <div class="calendar-toolbar">
          <div class="toolbar-group range">
              {
                  for TimeRange::ALL.into_iter().map(|range| {
                      html! {
                          <button
                              class={classes!("btn", (state.time_range == range).then_some("active"))}
                              onclick={emit_on_click(&props.on_action, FilterAction::SetTimeRange(range))}
                          >{ range.label() }</button>
                      }
                  })
              }
          </div>
          <div class="toolbar-group reference">
              <button
                  class="btn ghost"
                  title="Previous window"
                  disabled={!can_shift}
                  onclick={emit_on_click(&props.on_action, FilterAction::ShiftReference(-1))}
              >{ "‹" }</button>
              <input
                  type="date"
                  value={state.reference_date.format(DATE_INPUT_FORMAT).to_string()}
                  onchange={on_reference_change}
              />
              <button
                  class="btn ghost"
                  title="Next window"
                  disabled={!can_shift}
                  onclick={emit_on_click(&props.on_action, FilterAction::ShiftReference(1))}
              >{ "›" }</button>
              <button
                  class="btn ghost"
                  onclick={emit_on_click(&props.on_action, FilterAction::SetReferenceDate(props.today))}
              >{ "Today" }</button>
          </div>
          <div class="toolbar-group preset">
              <select onchange={on_preset_change} title={preset_hint.unwrap_or_default()}>
                  <option value="" selected={state.selected_preset.is_none()}>{ "Custom view" }</option>
                  {
                      for props.presets.iter().map(|preset| {
                          let selected = state.selected_preset.as_deref() == Some(preset.id.as_str());
                          html! {
                              <option value={preset.id.clone()} selected={selected}>
                                  { preset.label.clone() }
                              </option>
                          }
                      })
                  }
              </select>
          </div>
          <label class="toolbar-group estimated">
              <input
                  type="checkbox"
                  checked={state.show_estimated}
                  onchange={on_estimated_change}
              />
              <span>{ "Show estimated dates" }</span>
          </label>
          <div class="toolbar-group actions">
              <a class="btn" href={props.export_href.clone()} download={EXPORT_FILE_NAME}>
                  { "Export SVG" }
              </a>
              <button
                  class="btn ghost"
                  onclick={emit_on_click(&props.on_action, FilterAction::Reset)}
              >{ "Reset" }</button>
          </div>
      </div>
  }
}
