use sage_core::FilterAction;
use sage_core::pills::FilterPill;
use web_sys::MouseEvent;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct FilterPillsProps {
  pub pills:         Vec<FilterPill>,
  pub visible_count: usize,
  pub on_action:     Callback<FilterAction>
}

#[function_component(FilterPills)]
pub fn filter_pills(
  props: &FilterPillsProps
) -> Html {
  let on_reset = {
    let on_action = props.on_action.clone();
    move |_: MouseEvent| {
      on_action.emit(FilterAction::Reset)
    }
  };

  html! {
      <div class="filter-pills">
          <span class="visible-count">
              { format!("{} events shown", props.visible_count) }
          </span>
          {
              for props.pills.iter().map(|pill| {
                  let on_action = props.on_action.clone();
                  let remove = pill.remove.clone();
                  html! {
                      <span class="pill">
                          { pill.label.clone() }
                          <button
                              class="pill-remove"
                              title="Remove filter"
                              onclick={move |_| on_action.emit(remove.clone())}
                          >{ "×" }</button>
                      </span>
                  }
              })
          }
          {
              if props.pills.is_empty() {
                  html! {}
              } else {
                  html! {
                      <button class="btn ghost" onclick={on_reset}>{ "Clear all" }</button>
                  }
              }
          }
      </div>
  }
}
