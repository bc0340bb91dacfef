use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use chrono::NaiveDate;
use clap::{
  ArgAction,
  Parser,
  Subcommand
};
use sage_core::event::{
  EventType,
  Geography
};
use sage_core::filter::{
  TimeRange,
  parse_date_input
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
  name = "sage",
  version,
  about = "SAGE programme calendar: \
           lanes, urgency and Gantt \
           export"
)]
pub struct GlobalCli {
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true
  )]
  pub verbose: u8,

  #[arg(
    short = 'q',
    long = "quiet",
    action = ArgAction::Count,
    global = true
  )]
  pub quiet: u8,

  /// Calendar configuration TOML.
  #[arg(long = "config", global = true)]
  pub config: Option<PathBuf>,

  /// Events file (TOML `[[event]]`
  /// tables or a JSON array).
  #[arg(long = "events", global = true)]
  pub events: Option<PathBuf>,

  #[arg(
    long = "reference",
    value_parser = parse_reference,
    global = true
  )]
  pub reference: Option<NaiveDate>,

  #[arg(
    long = "range",
    value_parser = parse_range,
    default_value = "full",
    global = true
  )]
  pub range: TimeRange,

  #[arg(long = "preset", global = true)]
  pub preset: Option<String>,

  #[arg(
    long = "confirmed-only",
    global = true
  )]
  pub confirmed_only: bool,

  #[arg(
    long = "hide-type",
    value_parser = parse_event_type,
    action = ArgAction::Append,
    global = true
  )]
  pub hide_types: Vec<EventType>,

  #[arg(
    long = "hide-geography",
    value_parser = parse_geography,
    action = ArgAction::Append,
    global = true
  )]
  pub hide_geographies: Vec<Geography>,

  #[command(subcommand)]
  pub command: Command
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
  /// Visible events in the current view.
  List,
  /// Visible lanes and their event
  /// counts.
  Lanes,
  /// Urgency banner for the reference
  /// date.
  Banner,
  /// Details for one event.
  Show { id: String },
  /// Available view presets.
  Presets,
  /// Gantt chart as SVG.
  Render {
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>
  },
  /// Per-country rollup of dashboard
  /// exports (JSON arrays).
  Dashboard {
    #[arg(long = "assignments")]
    assignments: Option<PathBuf>,
    #[arg(long = "budgets")]
    budgets:     Option<PathBuf>,
    #[arg(long = "donors")]
    donors:      Option<PathBuf>
  }
}

fn normalize_key(raw: &str) -> String {
  raw
    .trim()
    .replace('-', "_")
    .to_ascii_uppercase()
}

pub fn parse_event_type(
  raw: &str
) -> Result<EventType, String> {
  EventType::from_key(&normalize_key(raw))
    .ok_or_else(|| {
      format!("unknown event type: {raw}")
    })
}

pub fn parse_geography(
  raw: &str
) -> Result<Geography, String> {
  Geography::from_key(&normalize_key(raw))
    .ok_or_else(|| {
      format!("unknown geography: {raw}")
    })
}

pub fn parse_range(
  raw: &str
) -> Result<TimeRange, String> {
  TimeRange::from_key(
    &raw.trim().to_ascii_lowercase()
  )
  .ok_or_else(|| {
    format!(
      "unknown range: {raw} (expected \
       6m, 12m or full)"
    )
  })
}

pub fn parse_reference(
  raw: &str
) -> Result<NaiveDate, String> {
  parse_date_input(raw).ok_or_else(|| {
    format!(
      "expected YYYY-MM-DD, got: {raw}"
    )
  })
}

pub fn init_tracing(
  verbose: u8,
  quiet: u8
) -> anyhow::Result<()> {
  let default_level = if quiet >= 2 {
    "error"
  } else if quiet == 1 {
    "warn"
  } else if verbose >= 3 {
    "trace"
  } else if verbose == 2 {
    "debug"
  } else if verbose == 1 {
    "info"
  } else {
    "warn"
  };

  let env_filter =
    EnvFilter::try_from_default_env()
      .or_else(|_| {
        EnvFilter::try_new(default_level)
      })
      .map_err(|e| {
        anyhow!(
          "invalid RUST_LOG / log \
           filter: {e}"
        )
      })?;

  let init_result =
    tracing_subscriber::fmt()
      .with_env_filter(env_filter)
      .with_target(true)
      .with_level(true)
      .with_writer(std::io::stderr)
      .with_ansi(
        std::io::stderr().is_terminal()
      )
      .try_init();

  if let Err(err) = init_result {
    debug!(error = %err, "tracing subscriber already set, continuing");
  }

  Ok(())
}
