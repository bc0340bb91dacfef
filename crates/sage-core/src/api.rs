//! Status normalisation for the REST
//! backend and the endpoint paths the
//! front end calls.

use serde::Deserialize;
use thiserror::Error;

pub const API_PREFIX: &str = "/api";
pub const LOGIN_PATH: &str = "/login";

/// Failed requests are retried this many
/// times before surfacing.
pub const RETRY_LIMIT: u32 = 1;

pub const FORBIDDEN_MESSAGE: &str =
  "You do not have permission to \
   perform this action.";
pub const NOT_FOUND_MESSAGE: &str =
  "The requested resource was not \
   found.";
pub const CONFLICT_MESSAGE: &str =
  "This change conflicts with the \
   current state of the record.";
pub const VALIDATION_MESSAGE: &str =
  "Some fields are invalid. Please \
   check your input.";
pub const SERVER_MESSAGE: &str =
  "The server encountered an error. \
   Please try again later.";

#[derive(
  Debug, Clone, PartialEq, Eq, Error,
)]
pub enum ApiError {
  #[error(
    "Your session has expired. Please \
     sign in again."
  )]
  Unauthorized,
  #[error("{0}")]
  Forbidden(String),
  #[error("{0}")]
  NotFound(String),
  #[error("{0}")]
  Conflict(String),
  #[error("{0}")]
  Validation(String),
  #[error("{message}")]
  Server {
    status:  u16,
    message: String
  },
  #[error("{message}")]
  Other {
    status:  u16,
    message: String
  },
  #[error(
    "Unable to reach the server. Check \
     your connection and try again."
  )]
  Network(String),
  #[error(
    "Unexpected response from the \
     server."
  )]
  Decode(String)
}

#[derive(Deserialize)]
struct ErrorBody {
  #[serde(default)]
  detail:  Option<serde_json::Value>,
  #[serde(default)]
  message: Option<String>
}

/// Human-readable message the backend put
/// in the body, if it is a plain string.
fn server_detail(
  body: &str
) -> Option<String> {
  let parsed: ErrorBody =
    serde_json::from_str(body).ok()?;
  let detail = parsed.detail.and_then(
    |value| {
      value.as_str().map(str::to_string)
    }
  );
  detail
    .or(parsed.message)
    .map(|text| text.trim().to_string())
    .filter(|text| !text.is_empty())
}

impl ApiError {
  #[tracing::instrument(skip(body))]
  pub fn from_status(
    status: u16,
    body: &str
  ) -> Self {
    if status == 401 {
      return Self::Unauthorized;
    }

    let detail = server_detail(body);
    let or_fallback =
      |fallback: &str| {
        detail.clone().unwrap_or_else(
          || fallback.to_string()
        )
      };

    match status {
      | 403 => Self::Forbidden(
        or_fallback(FORBIDDEN_MESSAGE)
      ),
      | 404 => Self::NotFound(
        or_fallback(NOT_FOUND_MESSAGE)
      ),
      | 409 => Self::Conflict(
        or_fallback(CONFLICT_MESSAGE)
      ),
      | 422 => Self::Validation(
        or_fallback(VALIDATION_MESSAGE)
      ),
      | 500..=599 => Self::Server {
        status,
        message: SERVER_MESSAGE
          .to_string()
      },
      | _ => Self::Other {
        status,
        message: or_fallback(&format!(
          "Request failed with status \
           {status}."
        ))
      }
    }
  }

  /// A 401 clears the session and sends
  /// the user to the login page.
  pub fn forces_logout(&self) -> bool {
    matches!(self, Self::Unauthorized)
  }

  pub fn is_retryable(&self) -> bool {
    matches!(
      self,
      Self::Server { .. }
        | Self::Network(_)
    )
  }

  pub fn user_message(&self) -> String {
    self.to_string()
  }
}

pub fn api_path(resource: &str) -> String {
  format!(
    "{API_PREFIX}/{}",
    resource.trim_start_matches('/')
  )
}

pub mod endpoints {
  pub const CALENDAR_EVENTS: &str =
    "calendar/events";
  pub const ASSIGNMENTS: &str =
    "assignments";
  pub const BUDGETS: &str = "budgets";
  pub const DONOR_PROJECTS: &str =
    "donors/projects";
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unauthorized_forces_logout() {
    let err = ApiError::from_status(
      401,
      r#"{"detail":"Token expired"}"#
    );
    assert_eq!(err, ApiError::Unauthorized);
    assert!(err.forces_logout());
    assert!(!err.is_retryable());
  }

  #[test]
  fn fixed_fallbacks_per_status() {
    assert_eq!(
      ApiError::from_status(403, "")
        .user_message(),
      FORBIDDEN_MESSAGE
    );
    assert_eq!(
      ApiError::from_status(404, "<html>")
        .user_message(),
      NOT_FOUND_MESSAGE
    );
    assert_eq!(
      ApiError::from_status(409, "{}")
        .user_message(),
      CONFLICT_MESSAGE
    );
    assert_eq!(
      ApiError::from_status(
        422,
        r#"{"detail":[{"loc":["body","name"]}]}"#
      )
      .user_message(),
      VALIDATION_MESSAGE
    );
    let server =
      ApiError::from_status(503, "");
    assert_eq!(
      server.user_message(),
      SERVER_MESSAGE
    );
    assert!(server.is_retryable());
  }

  #[test]
  fn server_detail_preferred_for_client_errors(
  ) {
    let err = ApiError::from_status(
      409,
      r#"{"detail":"Assignment already closed"}"#
    );
    assert_eq!(
      err.user_message(),
      "Assignment already closed"
    );

    let other = ApiError::from_status(
      418,
      r#"{"message":"teapot"}"#
    );
    assert_eq!(
      other.user_message(),
      "teapot"
    );
  }

  #[test]
  fn builds_api_paths() {
    assert_eq!(
      api_path(endpoints::CALENDAR_EVENTS),
      "/api/calendar/events"
    );
    assert_eq!(
      api_path("/budgets"),
      "/api/budgets"
    );
  }
}
