use sage_core::FilterAction;
use sage_core::details::EventDetails;
use web_sys::MouseEvent;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct EventDrawerProps {
  pub details:   Option<EventDetails>,
  pub on_action: Callback<FilterAction>
}

fn date_range(
  details: &EventDetails
) -> String {
  let event = &details.event;
  if event.start_date == event.end_date {
    event
      .start_date
      .format("%A %d %B %Y")
      .to_string()
  } else {
    format!(
      "{} to {}",
      event.start_date.format("%d %B %Y"),
      event.end_date.format("%d %B %Y")
    )
  }
}

#[function_component(EventDrawer)]
pub fn event_drawer(
  props: &EventDrawerProps
) -> Html {
  let Some(details) = &props.details else {
    return html! {};
  };
  let event = &details.event;

  let on_close = {
    let on_action = props.on_action.clone();
    move |_: MouseEvent| {
      on_action.emit(FilterAction::CloseDetails)
    }
  };
  let days = if details.duration_days == 1 {
    "1 day".to_string()
  } else {
    format!("{} days", details.duration_days)
  };
  let geographies = event
    .geography
    .iter()
    .map(|geo| geo.label())
    .collect::<Vec<_>>()
    .join(", ");

  html! {
      <aside class="panel event-drawer">
          <div class="header" style={format!("border-left:4px solid {};", details.color)}>
              <span>{ event.name.clone() }</span>
              <button class="btn ghost" title="Close" onclick={on_close}>{ "×" }</button>
          </div>
          <div class="details">
              {
                  if details.urgent {
                      html! { <div class="badge urgent">{ "Upcoming soon" }</div> }
                  } else {
                      html! {}
                  }
              }
              <dl>
                  <dt>{ "Dates" }</dt>
                  <dd>{ format!("{} ({days})", date_range(details)) }</dd>
                  <dt>{ "Date status" }</dt>
                  <dd>{ event.date_status.label() }</dd>
                  <dt>{ "Type" }</dt>
                  <dd>{ event.event_type.label() }</dd>
                  <dt>{ "Lane" }</dt>
                  <dd>{ details.lane_label.clone() }</dd>
                  <dt>{ "Geography" }</dt>
                  <dd>{ geographies }</dd>
                  {
                      match &event.workstream {
                          | Some(workstream) => html! {
                              <>
                                  <dt>{ "Workstream" }</dt>
                                  <dd>{ workstream.clone() }</dd>
                              </>
                          },
                          | None => html! {}
                      }
                  }
              </dl>
              {
                  match &event.description {
                      | Some(description) => html! {
                          <p class="description">{ description.clone() }</p>
                      },
                      | None => html! {}
                  }
              }
              {
                  if details.related.is_empty() {
                      html! {}
                  } else {
                      html! {
                          <div class="related">
                              <div class="subheader">{ "Related events" }</div>
                              {
                                  for details.related.iter().map(|related| {
                                      let on_action = props.on_action.clone();
                                      let id = related.id.clone();
                                      html! {
                                          <button
                                              class="related-event"
                                              onclick={move |_| on_action.emit(FilterAction::SelectEvent(id.clone()))}
                                          >
                                              <span class="legend-swatch" style={format!("background:{};", related.color)}></span>
                                              <span>{ related.name.clone() }</span>
                                          </button>
                                      }
                                  })
                              }
                          </div>
                      }
                  }
              }
          </div>
      </aside>
  }
}
