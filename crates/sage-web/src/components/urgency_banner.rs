use sage_core::urgency::UrgencySummary;
use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct UrgencyBannerProps {
  pub summary: UrgencySummary
}

#[function_component(UrgencyBanner)]
pub fn urgency_banner(
  props: &UrgencyBannerProps
) -> Html {
  let summary = &props.summary;
  if summary.is_empty() {
    return html! {};
  }

  html! {
      <div class="urgency-banner" role="status">
          {
              match summary.headline() {
                  | Some(headline) => html! {
                      <strong class="urgency-count">{ headline }</strong>
                  },
                  | None => html! {}
              }
          }
          {
              match summary.governance_line() {
                  | Some(line) => html! {
                      <span class="urgency-governance">{ line }</span>
                  },
                  | None => html! {}
              }
          }
      </div>
  }
}
