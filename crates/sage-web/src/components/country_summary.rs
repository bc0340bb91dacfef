use sage_core::aggregate::{
  DashboardRollup,
  format_amount,
  format_rate
};
use yew::{
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct CountrySummaryProps {
  pub rollup: DashboardRollup
}

#[function_component(CountrySummary)]
pub fn country_summary(
  props: &CountrySummaryProps
) -> Html {
  let rollup = &props.rollup;
  if rollup.is_empty() {
    return html! {};
  }
  let budget = &rollup.budget;

  html! {
      <section class="panel country-summary">
          <div class="header">
              <span>{ "Portfolio by country" }</span>
              <span class="budget-line">
                  {
                      format!(
                          "{} of {} spent ({})",
                          format_amount(budget.spent),
                          format_amount(budget.allocated),
                          format_rate(budget.burn_rate)
                      )
                  }
              </span>
          </div>
          <table class="summary-table">
              <thead>
                  <tr>
                      <th>{ "Country" }</th>
                      <th>{ "Assignments" }</th>
                      <th>{ "Active" }</th>
                      <th>{ "Spent / budget" }</th>
                      <th>{ "Burn" }</th>
                      <th>{ "Donors" }</th>
                      <th>{ "Committed" }</th>
                  </tr>
              </thead>
              <tbody>
                  {
                      for rollup.country_rows().into_iter().map(|row| {
                          let burn = row.assignments.burn_rate();
                          let over = burn.is_some_and(|rate| rate > 1.0);
                          html! {
                              <tr key={row.country.clone()}>
                                  <td>{ row.country.clone() }</td>
                                  <td>{ row.assignments.count.to_string() }</td>
                                  <td>{ row.assignments.active.to_string() }</td>
                                  <td>
                                      {
                                          format!(
                                              "{} / {}",
                                              format_amount(row.assignments.spent),
                                              format_amount(row.assignments.budget)
                                          )
                                      }
                                  </td>
                                  <td class={classes!(over.then_some("over-budget"))}>
                                      { format_rate(burn) }
                                  </td>
                                  <td title={row.donors.donors.iter().cloned().collect::<Vec<_>>().join(", ")}>
                                      { row.donors.donors.len().to_string() }
                                  </td>
                                  <td>{ format_amount(row.donors.committed) }</td>
                              </tr>
                          }
                      })
                  }
              </tbody>
          </table>
          {
              if budget.over_budget.is_empty() {
                  html! {}
              } else {
                  html! {
                      <div class="badge urgent">
                          { format!("Over budget: {}", budget.over_budget.join(", ")) }
                      </div>
                  }
              }
          }
      </section>
  }
}
