use sage_core::pills::LegendEntry;
use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct LegendProps {
  pub entries: Vec<LegendEntry>
}

#[function_component(Legend)]
pub fn legend(props: &LegendProps) -> Html {
  html! {
      <div class="calendar-legend">
          {
              for props.entries.iter().map(|entry| {
                  let swatch = match entry.marker {
                      | Some(kind) => html! {
                          <span
                              class={format!("legend-line {}", kind.as_class())}
                              style={format!("border-color:{};", entry.color)}
                          ></span>
                      },
                      | None => html! {
                          <span
                              class="legend-swatch"
                              style={format!("background:{};", entry.color)}
                          ></span>
                      }
                  };
                  html! {
                      <span class="legend-entry">
                          { swatch }
                          <span>{ entry.label.clone() }</span>
                      </span>
                  }
              })
          }
          <span class="legend-entry">
              <span class="legend-swatch estimated"></span>
              <span>{ "Estimated date" }</span>
          </span>
          <span class="legend-entry">
              <span class="legend-swatch school-year"></span>
              <span>{ "School in session" }</span>
          </span>
      </div>
  }
}
