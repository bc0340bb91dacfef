pub mod cli;
pub mod config;
pub mod render;

use std::ffi::OsString;
use std::fs;
use std::io::{
  self,
  Write
};
use std::path::Path;

use anyhow::{
  Context,
  anyhow
};
use clap::Parser;
use sage_core::aggregate::DashboardRollup;
use sage_core::details::event_details;
use sage_core::svg::render_svg;
use sage_core::urgency::summarize;
use sage_core::{
  CalendarConfig,
  FilterAction,
  FilterState,
  SchoolCalendar,
  layout_gantt
};
use tracing::{
  debug,
  info
};

use crate::cli::{
  Command,
  GlobalCli
};

/// Runs every view flag through the same
/// reducer the web page uses.
pub fn view_state(
  cli: &GlobalCli,
  config: &CalendarConfig
) -> anyhow::Result<FilterState> {
  let reference = cli
    .reference
    .unwrap_or_else(|| config.today());
  let mut state = FilterState::new(reference);

  if let Some(id) = &cli.preset {
    if config.preset(id).is_none() {
      return Err(anyhow!(
        "unknown preset: {id}"
      ));
    }
    state = state.apply(
      FilterAction::ApplyPreset(id.clone()),
      config
    );
  }

  let mut actions = vec![
    FilterAction::SetTimeRange(cli.range),
  ];
  if cli.confirmed_only {
    actions.push(
      FilterAction::SetShowEstimated(false)
    );
  }
  for event_type in &cli.hide_types {
    if state
      .selected_event_types
      .contains(event_type)
    {
      actions.push(
        FilterAction::ToggleEventType(
          *event_type
        )
      );
    }
  }
  for geography in &cli.hide_geographies {
    if state
      .selected_geographies
      .contains(geography)
    {
      actions.push(
        FilterAction::ToggleGeography(
          *geography
        )
      );
    }
  }

  for action in actions {
    state = state.apply(action, config);
  }
  debug!(?state, "resolved view state");
  Ok(state)
}

/// Reads whichever dashboard exports
/// were given and rolls them up per
/// country.
pub fn load_dashboard(
  assignments: Option<&Path>,
  budgets: Option<&Path>,
  donors: Option<&Path>
) -> anyhow::Result<DashboardRollup> {
  if assignments.is_none()
    && budgets.is_none()
    && donors.is_none()
  {
    return Err(anyhow!(
      "dashboard needs --assignments, \
       --budgets or --donors"
    ));
  }
  let rollup = DashboardRollup::from_records(
    &config::load_records(assignments)?,
    &config::load_records(budgets)?,
    &config::load_records(donors)?
  );
  debug!(
    countries = rollup.country_rows().len(),
    "built dashboard rollup"
  );
  Ok(rollup)
}

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli = GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting sage CLI"
  );

  let config_path =
    config::resolve_config_path(
      cli.config.as_deref(),
      std::env::var_os(config::CONFIG_ENV)
    );
  let calendar =
    config::load_calendar_config(
      config_path.as_deref()
    )?;
  let catalog = config::load_catalog(
    cli.events.as_deref()
  )?;

  let state = view_state(&cli, &calendar)?;
  let applied = state.applied(&calendar);
  let visible =
    applied.visible_events(catalog.events());
  let reference = state.reference_date;

  let stdout = io::stdout();
  match &cli.command {
    | Command::List => {
      render::print_event_table(
        stdout.lock(),
        &visible,
        &calendar,
        reference
      )?;
    }
    | Command::Lanes => {
      render::print_lane_table(
        stdout.lock(),
        &visible,
        &applied,
        &calendar
      )?;
    }
    | Command::Banner => {
      let summary = summarize(
        visible.iter().copied(),
        reference,
        calendar.urgency.lookahead_days
      );
      render::print_banner(
        stdout.lock(),
        &summary
      )?;
    }
    | Command::Show { id } => {
      let details = event_details(
        &catalog, id, reference, &calendar
      )
      .ok_or_else(|| {
        anyhow!("no event with id {id}")
      })?;
      render::print_details(
        stdout.lock(),
        &details
      )?;
    }
    | Command::Presets => {
      render::print_preset_table(
        stdout.lock(),
        &calendar
      )?;
    }
    | Command::Render { output } => {
      let school = SchoolCalendar::embedded()
        .context(
          "embedded school calendars are \
           invalid"
        )?;
      let layout = layout_gantt(
        catalog.events(),
        &applied,
        reference,
        &calendar,
        &school
      );
      let svg = render_svg(&layout, &calendar);

      if let Some(path) = output {
        fs::write(path, &svg).with_context(
          || {
            format!(
              "failed to write {}",
              path.display()
            )
          }
        )?;
        info!(
          path = %path.display(),
          bars = layout.bars.len(),
          "wrote gantt chart"
        );
      } else {
        let mut out = stdout.lock();
        out
          .write_all(svg.as_bytes())
          .context(
            "failed to write svg to stdout"
          )?;
      }
    }
    | Command::Dashboard {
      assignments,
      budgets,
      donors
    } => {
      let rollup = load_dashboard(
        assignments.as_deref(),
        budgets.as_deref(),
        donors.as_deref()
      )?;
      render::print_dashboard(
        stdout.lock(),
        &rollup
      )?;
    }
  }

  info!("done");
  Ok(())
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use sage_core::event::{
    EventType,
    Geography
  };
  use sage_core::filter::TimeRange;

  use super::*;

  fn parse(args: &[&str]) -> GlobalCli {
    GlobalCli::parse_from(
      std::iter::once("sage")
        .chain(args.iter().copied())
    )
  }

  #[test]
  fn flags_become_reducer_actions() {
    let config = CalendarConfig::embedded();
    let cli = parse(&[
      "--reference",
      "2026-10-19",
      "--range",
      "6m",
      "--confirmed-only",
      "--hide-type",
      "asean_summit",
      "list",
    ]);
    let state =
      view_state(&cli, &config).expect("state");

    assert_eq!(
      state.reference_date,
      NaiveDate::from_ymd_opt(2026, 10, 19)
        .expect("valid date")
    );
    assert_eq!(
      state.time_range,
      TimeRange::SixMonths
    );
    assert!(!state.show_estimated);
    assert!(
      !state
        .selected_event_types
        .contains(&EventType::AseanSummit)
    );
  }

  #[test]
  fn preset_flag_applies_preset() {
    let config = CalendarConfig::embedded();
    let cli = parse(&[
      "--reference",
      "2026-10-19",
      "--preset",
      "cambodia-track",
      "lanes",
    ]);
    let state =
      view_state(&cli, &config).expect("state");
    assert_eq!(
      state.selected_preset.as_deref(),
      Some("cambodia-track")
    );
    assert_eq!(
      state.selected_geographies.len(),
      2
    );
    assert!(
      state
        .selected_geographies
        .contains(&Geography::Cambodia)
    );
  }

  #[test]
  fn unknown_preset_is_an_error() {
    let config = CalendarConfig::embedded();
    let cli = parse(&[
      "--preset",
      "nowhere",
      "list",
    ]);
    assert!(view_state(&cli, &config).is_err());
  }

  #[test]
  fn dashboard_needs_at_least_one_export(
  ) {
    let err = load_dashboard(None, None, None)
      .expect_err("no inputs");
    assert!(
      err.to_string().contains("--assignments")
    );
  }

  #[test]
  fn dashboard_rolls_up_given_exports() {
    let temp =
      tempfile::tempdir().expect("tempdir");
    let donors = temp.path().join("donors.json");
    fs::write(
      &donors,
      r#"[{
        "id": "p1",
        "donor": "DFAT",
        "name": "Teacher quality",
        "countries": ["Timor-Leste", "Philippines"],
        "committed": 9000
      }]"#
    )
    .expect("write donors");

    let rollup =
      load_dashboard(None, None, Some(&donors))
        .expect("rollup");
    assert_eq!(rollup.donors.len(), 2);
    assert_eq!(
      rollup.donors["Timor-Leste"].committed,
      4_500.0
    );
    assert!(rollup.assignments.is_empty());
  }

  #[test]
  fn dashboard_flags_parse() {
    let cli = parse(&[
      "dashboard",
      "--assignments",
      "a.json",
      "--donors",
      "d.json",
    ]);
    match cli.command {
      | Command::Dashboard {
        assignments,
        budgets,
        donors
      } => {
        assert_eq!(
          assignments,
          Some("a.json".into())
        );
        assert_eq!(budgets, None);
        assert_eq!(
          donors,
          Some("d.json".into())
        );
      }
      | other => {
        panic!("unexpected command: {other:?}")
      }
    }
  }
}
