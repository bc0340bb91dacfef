use std::collections::BTreeMap;

use sage_core::event::{
  EventType,
  Geography
};
use sage_core::{
  FilterAction,
  FilterState
};
use web_sys::MouseEvent;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct FilterPanelProps {
  pub state:     FilterState,
  pub colors:    BTreeMap<EventType, String>,
  pub on_action: Callback<FilterAction>
}

fn section_actions(
  on_action: &Callback<FilterAction>,
  select_all: FilterAction,
  clear: FilterAction
) -> Html {
  let on_select = {
    let on_action = on_action.clone();
    move |_: MouseEvent| {
      on_action.emit(select_all.clone())
    }
  };
  let on_clear = {
    let on_action = on_action.clone();
    move |_: MouseEvent| {
      on_action.emit(clear.clone())
    }
  };

  html! {
      <div class="filter-actions">
          <button class="link" onclick={on_select}>{ "All" }</button>
          <button class="link" onclick={on_clear}>{ "None" }</button>
      </div>
  }
}

#[function_component(FilterPanel)]
pub fn filter_panel(
  props: &FilterPanelProps
) -> Html {
  let state = &props.state;

  html! {
      <aside class="panel filter-panel">
          <section>
              <div class="header">
                  <span>{ "Event types" }</span>
                  {
                      section_actions(
                          &props.on_action,
                          FilterAction::SelectAllEventTypes,
                          FilterAction::ClearEventTypes,
                      )
                  }
              </div>
              {
                  for EventType::ALL.into_iter().map(|event_type| {
                      let on_action = props.on_action.clone();
                      let color = props
                          .colors
                          .get(&event_type)
                          .cloned()
                          .unwrap_or_default();
                      html! {
                          <label class="filter-option">
                              <input
                                  type="checkbox"
                                  checked={state.selected_event_types.contains(&event_type)}
                                  onchange={move |_| on_action.emit(FilterAction::ToggleEventType(event_type))}
                              />
                              <span class="legend-swatch" style={format!("background:{color};")}></span>
                              <span>{ event_type.label() }</span>
                          </label>
                      }
                  })
              }
          </section>
          <section>
              <div class="header">
                  <span>{ "Geography" }</span>
                  {
                      section_actions(
                          &props.on_action,
                          FilterAction::SelectAllGeographies,
                          FilterAction::ClearGeographies,
                      )
                  }
              </div>
              {
                  for Geography::ALL.into_iter().map(|geography| {
                      let on_action = props.on_action.clone();
                      html! {
                          <label class="filter-option">
                              <input
                                  type="checkbox"
                                  checked={state.selected_geographies.contains(&geography)}
                                  onchange={move |_| on_action.emit(FilterAction::ToggleGeography(geography))}
                              />
                              <span>{ geography.label() }</span>
                          </label>
                      }
                  })
              }
          </section>
      </aside>
  }
}
