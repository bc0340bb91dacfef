use std::fmt::Debug;

use sage_core::api::LOGIN_PATH;
use serde::{
  Deserialize,
  Serialize
};
use web_sys::Storage;

const TOKEN_STORAGE_KEY: &str =
  "sage.auth.token";
const USER_STORAGE_KEY: &str =
  "sage.auth.user";
const SESSION_KEYS: [&str; 2] =
  [TOKEN_STORAGE_KEY, USER_STORAGE_KEY];

/// User blob written by the login page.
#[derive(
  Clone,
  Debug,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct SessionUser {
  pub id:    String,
  pub name:  String,
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub role:  Option<String>
}

fn local_storage() -> Option<Storage> {
  web_sys::window().and_then(|window| {
    window
      .local_storage()
      .ok()
      .flatten()
  })
}

pub fn load_token() -> Option<String> {
  local_storage()
    .and_then(|storage| {
      storage
        .get_item(TOKEN_STORAGE_KEY)
        .ok()
        .flatten()
    })
    .filter(|token| !token.is_empty())
}

pub fn load_user() -> Option<SessionUser> {
  let raw = local_storage().and_then(
    |storage| {
      storage
        .get_item(USER_STORAGE_KEY)
        .ok()
        .flatten()
    }
  )?;

  match serde_json::from_str(&raw) {
    | Ok(user) => Some(user),
    | Err(err) => {
      tracing::warn!(error = %err, "discarding unreadable session user");
      None
    }
  }
}

/// Removes every session key, logging
/// the ones storage refuses. Returns how
/// many failed.
fn remove_session_keys<E: Debug>(
  mut remove: impl FnMut(&str) -> Result<(), E>
) -> usize {
  let mut failed = 0_usize;
  for key in SESSION_KEYS {
    if let Err(err) = remove(key) {
      tracing::warn!(key, error = ?err, "failed to clear session key");
      failed += 1;
    }
  }
  failed
}

pub fn clear_session() {
  if let Some(storage) = local_storage() {
    remove_session_keys(|key| {
      storage.remove_item(key)
    });
  }
}

/// Drops the stored session and sends the
/// browser to the login page.
pub fn expire_session() {
  clear_session();
  tracing::info!("session expired; redirecting to login");
  if let Some(window) = web_sys::window()
    && let Err(err) =
      window.location().set_href(LOGIN_PATH)
  {
    tracing::error!(error = ?err, "login redirect failed");
  }
}
