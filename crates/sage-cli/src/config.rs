use std::ffi::OsString;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::Context;
use sage_core::{
  CalendarConfig,
  EventCatalog
};
use serde::de::DeserializeOwned;
use tracing::info;

pub const CONFIG_ENV: &str =
  "SAGE_CALENDAR_CONFIG";

/// `--config`, then the environment, then
/// `~/.config/sage/calendar.toml` if it
/// exists. `None` means the embedded
/// configuration.
pub fn resolve_config_path(
  override_path: Option<&Path>,
  env_value: Option<OsString>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(path.to_path_buf());
  }

  if let Some(value) = env_value
    && !value.is_empty()
  {
    return Some(PathBuf::from(value));
  }

  let candidate = dirs::config_dir()?
    .join("sage")
    .join("calendar.toml");
  candidate.exists().then_some(candidate)
}

pub fn load_calendar_config(
  path: Option<&Path>
) -> anyhow::Result<CalendarConfig> {
  let Some(path) = path else {
    info!("using embedded calendar configuration");
    return Ok(CalendarConfig::embedded());
  };

  info!(config = %path.display(), "loading calendar configuration");
  let text = fs::read_to_string(path)
    .with_context(|| {
      format!(
        "failed to read {}",
        path.display()
      )
    })?;
  let name = path.display().to_string();
  CalendarConfig::from_toml_str(
    &text, &name
  )
  .with_context(|| {
    format!(
      "invalid calendar configuration \
       in {name}"
    )
  })
}

/// Seed events, or a TOML/JSON events
/// file chosen by extension.
pub fn load_catalog(
  path: Option<&Path>
) -> anyhow::Result<EventCatalog> {
  let Some(path) = path else {
    return EventCatalog::embedded()
      .context(
        "embedded seed events are \
         invalid"
      );
  };

  info!(events = %path.display(), "loading events file");
  let text = fs::read_to_string(path)
    .with_context(|| {
      format!(
        "failed to read {}",
        path.display()
      )
    })?;
  let name = path.display().to_string();
  let is_json = path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| {
      ext.eq_ignore_ascii_case("json")
    });

  let catalog = if is_json {
    EventCatalog::from_json_str(
      &text, &name
    )
  } else {
    EventCatalog::from_toml_str(
      &text, &name
    )
  };
  catalog.with_context(|| {
    format!("invalid events in {name}")
  })
}

/// A JSON array of dashboard records;
/// no path means no records.
pub fn load_records<T>(
  path: Option<&Path>
) -> anyhow::Result<Vec<T>>
where
  T: DeserializeOwned
{
  let Some(path) = path else {
    return Ok(Vec::new());
  };

  info!(records = %path.display(), "loading dashboard records");
  let text = fs::read_to_string(path)
    .with_context(|| {
      format!(
        "failed to read {}",
        path.display()
      )
    })?;
  serde_json::from_str(&text).with_context(
    || {
      format!(
        "invalid records in {}",
        path.display()
      )
    }
  )
}

#[cfg(test)]
mod tests {
  use tempfile::tempdir;

  use super::*;

  #[test]
  fn override_beats_environment() {
    let resolved = resolve_config_path(
      Some(Path::new("/tmp/a.toml")),
      Some(OsString::from("/tmp/b.toml"))
    );
    assert_eq!(
      resolved,
      Some(PathBuf::from("/tmp/a.toml"))
    );

    let from_env = resolve_config_path(
      None,
      Some(OsString::from("/tmp/b.toml"))
    );
    assert_eq!(
      from_env,
      Some(PathBuf::from("/tmp/b.toml"))
    );
  }

  #[test]
  fn loads_and_sanitizes_config_file() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("calendar.toml");
    fs::write(
      &path,
      "[urgency]\nlookahead_days = -4\n\n\
       [layout]\npx_per_day = 3.0\n"
    )
    .expect("write config");

    let config =
      load_calendar_config(Some(&path))
        .expect("load config");
    assert_eq!(config.layout.px_per_day, 3.0);
    assert_eq!(
      config.urgency.lookahead_days,
      90
    );
  }

  #[test]
  fn missing_config_reports_path() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("nope.toml");
    let err = load_calendar_config(Some(&path))
      .expect_err("missing file");
    assert!(
      format!("{err:#}").contains("nope.toml")
    );
  }

  #[test]
  fn loads_json_events_file() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("events.json");
    fs::write(
      &path,
      r#"[{
        "id": "kh-forum",
        "name": "Cambodia TVET forum",
        "eventType": "NATIONAL_POLICY",
        "geography": ["CAMBODIA"],
        "startDate": "2026-12-01",
        "endDate": "2026-12-02",
        "dateStatus": "CONFIRMED"
      }]"#
    )
    .expect("write events");

    let catalog = load_catalog(Some(&path))
      .expect("load events");
    assert_eq!(catalog.len(), 1);
    assert!(catalog.get("kh-forum").is_some());
  }

  #[test]
  fn rejects_inverted_event_dates() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("events.toml");
    fs::write(
      &path,
      "[[event]]\nid = \"bad\"\nname = \"Bad\"\n\
       eventType = \"ASEAN_SOM\"\ngeography = [\"REGIONAL\"]\n\
       startDate = \"2026-12-05\"\nendDate = \"2026-12-01\"\n\
       dateStatus = \"ESTIMATED\"\n"
    )
    .expect("write events");

    assert!(load_catalog(Some(&path)).is_err());
  }

  #[test]
  fn loads_dashboard_records() {
    use sage_core::aggregate::{
      Assignment,
      AssignmentStatus
    };

    let temp = tempdir().expect("tempdir");
    let path =
      temp.path().join("assignments.json");
    fs::write(
      &path,
      r#"[{
        "id": "a1",
        "title": "Curriculum review",
        "country": "Cambodia",
        "status": "ACTIVE",
        "budget": 1000,
        "spent": 250
      }]"#
    )
    .expect("write records");

    let records: Vec<Assignment> =
      load_records(Some(&path))
        .expect("load records");
    assert_eq!(records.len(), 1);
    assert_eq!(
      records[0].status,
      AssignmentStatus::Active
    );

    let none: Vec<Assignment> =
      load_records(None).expect("no path");
    assert!(none.is_empty());

    fs::write(&path, "{\"id\": 1}")
      .expect("write bad records");
    let err = load_records::<Assignment>(
      Some(&path)
    )
    .expect_err("not an array");
    assert!(
      format!("{err:#}")
        .contains("assignments.json")
    );
  }
}
