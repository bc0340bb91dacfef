use gloo::net::http::Request;
use sage_core::aggregate::{
  Assignment,
  BudgetLine,
  DashboardRollup,
  DonorProject
};
use sage_core::api::{
  ApiError,
  RETRY_LIMIT,
  api_path,
  endpoints
};
use sage_core::{
  CalendarEvent,
  EventCatalog
};
use serde::de::DeserializeOwned;

use crate::session;

async fn send_get(
  url: &str
) -> Result<String, ApiError> {
  let mut request = Request::get(url)
    .header("Accept", "application/json");
  if let Some(token) = session::load_token()
  {
    request = request.header(
      "Authorization",
      &format!("Bearer {token}")
    );
  }

  let response =
    request.send().await.map_err(|err| {
      ApiError::Network(err.to_string())
    })?;
  let status = response.status();
  let body =
    response.text().await.map_err(|err| {
      ApiError::Decode(err.to_string())
    })?;

  if (200..300).contains(&status) {
    Ok(body)
  } else {
    Err(ApiError::from_status(status, &body))
  }
}

/// GET under `/api`, retried once on
/// network or server failures. A 401
/// ends the session.
pub async fn fetch_json<T>(
  resource: &str
) -> Result<T, ApiError>
where
  T: DeserializeOwned
{
  let url = api_path(resource);
  let mut attempt = 0_u32;

  let body = loop {
    match send_get(&url).await {
      | Ok(body) => break body,
      | Err(err)
        if err.is_retryable()
          && attempt < RETRY_LIMIT =>
      {
        attempt += 1;
        tracing::warn!(url = %url, attempt, error = %err, "retrying request");
      }
      | Err(err) => {
        if err.forces_logout() {
          session::expire_session();
        }
        tracing::error!(url = %url, error = ?err, "request failed");
        return Err(err);
      }
    }
  };

  serde_json::from_str(&body).map_err(
    |err| ApiError::Decode(err.to_string())
  )
}

pub async fn fetch_calendar_events()
-> Result<EventCatalog, ApiError> {
  let events: Vec<CalendarEvent> =
    fetch_json(endpoints::CALENDAR_EVENTS)
      .await?;
  tracing::info!(
    count = events.len(),
    "fetched calendar events"
  );
  EventCatalog::new(events).map_err(
    |err| ApiError::Decode(err.to_string())
  )
}

/// Assignments, budget lines and donor
/// projects rolled up per country.
pub async fn fetch_dashboard()
-> Result<DashboardRollup, ApiError> {
  let assignments: Vec<Assignment> =
    fetch_json(endpoints::ASSIGNMENTS)
      .await?;
  let budget_lines: Vec<BudgetLine> =
    fetch_json(endpoints::BUDGETS).await?;
  let projects: Vec<DonorProject> =
    fetch_json(endpoints::DONOR_PROJECTS)
      .await?;
  tracing::info!(
    assignments = assignments.len(),
    budget_lines = budget_lines.len(),
    projects = projects.len(),
    "fetched dashboard records"
  );
  Ok(DashboardRollup::from_records(
    &assignments,
    &budget_lines,
    &projects
  ))
}
