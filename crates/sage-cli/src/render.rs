use std::io::Write;

use sage_core::CalendarEvent;
use sage_core::aggregate::{
  DashboardRollup,
  format_amount,
  format_rate
};
use sage_core::config::CalendarConfig;
use sage_core::details::EventDetails;
use sage_core::filter::AppliedFilters;
use sage_core::lane::event_lane;
use sage_core::urgency::{
  UrgencySummary,
  is_urgent
};
use unicode_width::UnicodeWidthStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[tracing::instrument(skip_all, fields(count = events.len()))]
pub fn print_event_table<W: Write>(
  writer: W,
  events: &[&CalendarEvent],
  config: &CalendarConfig,
  reference: chrono::NaiveDate
) -> anyhow::Result<()> {
  let headers = vec![
    "ID".to_string(),
    "Start".to_string(),
    "End".to_string(),
    "Lane".to_string(),
    "Type".to_string(),
    "Status".to_string(),
    "Name".to_string(),
  ];

  let rows = events
    .iter()
    .map(|event| {
      let mut status = event
        .date_status
        .label()
        .to_string();
      if is_urgent(
        event,
        reference,
        config.urgency.lookahead_days
      ) {
        status.push_str(" !");
      }
      vec![
        event.id.clone(),
        event
          .start_date
          .format(DATE_FORMAT)
          .to_string(),
        event
          .end_date
          .format(DATE_FORMAT)
          .to_string(),
        config
          .lane_label(event_lane(event))
          .to_string(),
        event.event_type.label().to_string(),
        status,
        event.name.clone(),
      ]
    })
    .collect();

  write_table(writer, headers, rows)
}

pub fn print_lane_table<W: Write>(
  writer: W,
  events: &[&CalendarEvent],
  applied: &AppliedFilters,
  config: &CalendarConfig
) -> anyhow::Result<()> {
  let headers = vec![
    "Lane".to_string(),
    "Key".to_string(),
    "Events".to_string(),
  ];
  let rows = applied
    .visible_lanes()
    .into_iter()
    .map(|lane| {
      let count = events
        .iter()
        .filter(|event| {
          event_lane(event) == lane
        })
        .count();
      vec![
        config.lane_label(lane).to_string(),
        lane.as_key().to_string(),
        count.to_string(),
      ]
    })
    .collect();

  write_table(writer, headers, rows)
}

pub fn print_preset_table<W: Write>(
  writer: W,
  config: &CalendarConfig
) -> anyhow::Result<()> {
  let headers = vec![
    "ID".to_string(),
    "Label".to_string(),
    "Description".to_string(),
  ];
  let rows = config
    .presets
    .iter()
    .map(|preset| {
      vec![
        preset.id.clone(),
        preset.label.clone(),
        preset
          .description
          .clone()
          .unwrap_or_default(),
      ]
    })
    .collect();

  write_table(writer, headers, rows)
}

pub fn print_banner<W: Write>(
  mut writer: W,
  summary: &UrgencySummary
) -> anyhow::Result<()> {
  if summary.is_empty() {
    writeln!(writer, "No upcoming events.")?;
    return Ok(());
  }
  if let Some(headline) = summary.headline() {
    writeln!(writer, "{headline}")?;
  }
  if let Some(line) =
    summary.governance_line()
  {
    writeln!(writer, "{line}")?;
  }
  Ok(())
}

pub fn print_details<W: Write>(
  mut writer: W,
  details: &EventDetails
) -> anyhow::Result<()> {
  let event = &details.event;
  writeln!(writer, "{}", event.name)?;
  writeln!(
    writer,
    "  {} to {} ({} days, {})",
    event.start_date.format(DATE_FORMAT),
    event.end_date.format(DATE_FORMAT),
    details.duration_days,
    event.date_status.label()
  )?;
  writeln!(
    writer,
    "  Type: {}",
    event.event_type.label()
  )?;
  writeln!(
    writer,
    "  Lane: {}",
    details.lane_label
  )?;
  let geographies: Vec<&str> = event
    .geography
    .iter()
    .map(|geo| geo.label())
    .collect();
  writeln!(
    writer,
    "  Geography: {}",
    geographies.join(", ")
  )?;
  if let Some(workstream) = &event.workstream
  {
    writeln!(
      writer,
      "  Workstream: {workstream}"
    )?;
  }
  if details.urgent {
    writeln!(writer, "  Upcoming soon")?;
  }
  if let Some(description) =
    &event.description
  {
    writeln!(writer)?;
    writeln!(writer, "  {description}")?;
  }
  if !details.related.is_empty() {
    writeln!(writer)?;
    writeln!(writer, "  Related:")?;
    for related in &details.related {
      writeln!(
        writer,
        "    {} ({})",
        related.name, related.id
      )?;
    }
  }
  Ok(())
}

pub fn print_dashboard<W: Write>(
  mut writer: W,
  rollup: &DashboardRollup
) -> anyhow::Result<()> {
  if rollup.is_empty() {
    writeln!(writer, "No dashboard records.")?;
    return Ok(());
  }

  let headers = vec![
    "Country".to_string(),
    "Assignments".to_string(),
    "Active".to_string(),
    "Budget".to_string(),
    "Spent".to_string(),
    "Burn".to_string(),
    "Donors".to_string(),
    "Committed".to_string(),
  ];
  let rows = rollup
    .country_rows()
    .into_iter()
    .map(|row| {
      vec![
        row.country,
        row.assignments.count.to_string(),
        row.assignments.active.to_string(),
        format_amount(row.assignments.budget),
        format_amount(row.assignments.spent),
        format_rate(
          row.assignments.burn_rate()
        ),
        row.donors.donors.len().to_string(),
        format_amount(row.donors.committed),
      ]
    })
    .collect();
  write_table(&mut writer, headers, rows)?;

  let budget = &rollup.budget;
  writeln!(writer)?;
  writeln!(
    writer,
    "Budget: {} allocated, {} spent, {} \
     remaining (burn {})",
    format_amount(budget.allocated),
    format_amount(budget.spent),
    format_amount(budget.remaining),
    format_rate(budget.burn_rate)
  )?;
  if !budget.over_budget.is_empty() {
    writeln!(
      writer,
      "Over budget: {}",
      budget.over_budget.join(", ")
    )?;
  }
  writer.flush()?;
  Ok(())
}

fn pad(cell: &str, width: usize) -> String {
  let fill = width
    .saturating_sub(UnicodeWidthStr::width(cell));
  format!("{cell}{}", " ".repeat(fill))
}

fn write_table<W: Write>(
  mut writer: W,
  headers: Vec<String>,
  rows: Vec<Vec<String>>
) -> anyhow::Result<()> {
  let column_count = headers.len();
  let mut widths = vec![0usize; column_count];

  for (idx, header) in
    headers.iter().enumerate()
  {
    widths[idx] = widths[idx].max(
      UnicodeWidthStr::width(
        header.as_str()
      )
    );
  }

  for row in &rows {
    for (idx, cell) in
      row.iter().enumerate().take(column_count)
    {
      widths[idx] = widths[idx].max(
        UnicodeWidthStr::width(
          cell.as_str()
        )
      );
    }
  }

  let header_line: Vec<String> = headers
    .iter()
    .zip(&widths)
    .map(|(header, width)| pad(header, *width))
    .collect();
  writeln!(
    writer,
    "{}",
    header_line.join(" ").trim_end()
  )?;

  let rule: Vec<String> = widths
    .iter()
    .map(|width| "-".repeat(*width))
    .collect();
  writeln!(writer, "{}", rule.join(" "))?;

  for row in rows {
    let line: Vec<String> = row
      .iter()
      .zip(&widths)
      .map(|(cell, width)| pad(cell, *width))
      .collect();
    writeln!(
      writer,
      "{}",
      line.join(" ").trim_end()
    )?;
  }

  writer.flush()?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn table_columns_align_on_display_width(
  ) {
    let mut out = Vec::new();
    write_table(
      &mut out,
      vec!["Name".to_string(), "N".to_string()],
      vec![
        vec!["Đà Lạt".to_string(), "1".to_string()],
        vec!["Phnom Penh".to_string(), "22".to_string()],
      ]
    )
    .expect("write table");
    let text =
      String::from_utf8(out).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Name       N");
    assert_eq!(lines[1], "---------- --");
    assert_eq!(lines[2], "Đà Lạt     1");
    assert_eq!(lines[3], "Phnom Penh 22");
  }

  #[test]
  fn empty_banner_says_so() {
    let mut out = Vec::new();
    print_banner(
      &mut out,
      &UrgencySummary {
        upcoming_count:  0,
        lookahead_days:  90,
        next_governance: None
      }
    )
    .expect("banner");
    assert_eq!(
      String::from_utf8(out).expect("utf8"),
      "No upcoming events.\n"
    );
  }

  #[test]
  fn dashboard_lists_countries_then_budget(
  ) {
    use sage_core::aggregate::{
      BudgetLine,
      DonorProject
    };

    let rollup =
      DashboardRollup::from_records(
        &[],
        &[BudgetLine {
          id:         "b1".to_string(),
          workstream: "TVET".to_string(),
          country:    None,
          allocated:  1_000.0,
          spent:      1_250.0
        }],
        &[DonorProject {
          id:        "p1".to_string(),
          donor:     "FCDO".to_string(),
          name:      "SAGE".to_string(),
          countries: vec![
            "Lao PDR".to_string(),
          ],
          committed: 40_000.0
        }]
      );
    let mut out = Vec::new();
    print_dashboard(&mut out, &rollup)
      .expect("dashboard");
    let text =
      String::from_utf8(out).expect("utf8");
    let lines: Vec<&str> =
      text.lines().collect();

    assert!(lines[0].starts_with("Country"));
    assert!(lines[2].starts_with("Lao PDR"));
    assert!(lines[2].ends_with("40,000"));
    assert_eq!(
      lines[4],
      "Budget: 1,000 allocated, 1,250 \
       spent, -250 remaining (burn 125%)"
    );
    assert_eq!(lines[5], "Over budget: b1");
  }

  #[test]
  fn empty_dashboard_says_so() {
    let mut out = Vec::new();
    print_dashboard(
      &mut out,
      &DashboardRollup::default()
    )
    .expect("dashboard");
    assert_eq!(
      String::from_utf8(out).expect("utf8"),
      "No dashboard records.\n"
    );
  }
}
