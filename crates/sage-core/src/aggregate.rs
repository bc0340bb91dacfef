//! Dashboard records as the REST API
//! returns them, and the per-country
//! rollups derived from them.

use std::collections::{
  BTreeMap,
  BTreeSet
};

use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize
};

/// Key used for records with no country.
pub const UNASSIGNED_COUNTRY: &str =
  "Unassigned";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
  Planned,
  Active,
  Completed,
  Cancelled
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
  pub id:         String,
  pub title:      String,
  #[serde(default)]
  pub country:    Option<String>,
  #[serde(default)]
  pub consultant: Option<String>,
  pub status:     AssignmentStatus,
  #[serde(default)]
  pub budget:     f64,
  #[serde(default)]
  pub spent:      f64,
  #[serde(default)]
  pub start_date: Option<NaiveDate>,
  #[serde(default)]
  pub end_date:   Option<NaiveDate>
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
  pub id:         String,
  pub workstream: String,
  #[serde(default)]
  pub country:    Option<String>,
  #[serde(default)]
  pub allocated:  f64,
  #[serde(default)]
  pub spent:      f64
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct DonorProject {
  pub id:        String,
  pub donor:     String,
  pub name:      String,
  #[serde(default)]
  pub countries: Vec<String>,
  #[serde(default)]
  pub committed: f64
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
)]
pub struct CountryAssignments {
  pub count:  usize,
  pub active: usize,
  pub budget: f64,
  pub spent:  f64
}

impl CountryAssignments {
  pub fn burn_rate(&self) -> Option<f64> {
    burn_rate(self.spent, self.budget)
  }
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
)]
pub struct CountryDonors {
  pub donors:    BTreeSet<String>,
  pub projects:  usize,
  pub committed: f64
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
)]
pub struct BudgetSummary {
  pub allocated:   f64,
  pub spent:       f64,
  pub remaining:   f64,
  pub burn_rate:   Option<f64>,
  /// Lines whose spend exceeds their
  /// allocation.
  pub over_budget: Vec<String>
}

/// One country's assignments and donor
/// commitments side by side.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
)]
pub struct CountryRow {
  pub country:     String,
  pub assignments: CountryAssignments,
  pub donors:      CountryDonors
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
)]
pub struct DashboardRollup {
  pub assignments:
    BTreeMap<String, CountryAssignments>,
  pub donors:
    BTreeMap<String, CountryDonors>,
  pub budget:      BudgetSummary
}

impl DashboardRollup {
  pub fn from_records(
    assignments: &[Assignment],
    budget_lines: &[BudgetLine],
    projects: &[DonorProject]
  ) -> Self {
    Self {
      assignments: assignments_by_country(
        assignments
      ),
      donors: donors_by_country(projects),
      budget: budget_summary(budget_lines)
    }
  }

  pub fn is_empty(&self) -> bool {
    self.assignments.is_empty()
      && self.donors.is_empty()
      && self.budget.allocated == 0.0
      && self.budget.spent == 0.0
  }

  /// Every country seen in either
  /// rollup, in name order with
  /// `Unassigned` last.
  pub fn country_rows(
    &self
  ) -> Vec<CountryRow> {
    let countries: BTreeSet<&String> = self
      .assignments
      .keys()
      .chain(self.donors.keys())
      .collect();
    let (mut named, unassigned): (
      Vec<&String>,
      Vec<&String>
    ) = countries.into_iter().partition(
      |name| {
        name.as_str() != UNASSIGNED_COUNTRY
      }
    );
    named.extend(unassigned);

    named
      .into_iter()
      .map(|country| CountryRow {
        country:     country.clone(),
        assignments: self
          .assignments
          .get(country)
          .cloned()
          .unwrap_or_default(),
        donors:      self
          .donors
          .get(country)
          .cloned()
          .unwrap_or_default()
      })
      .collect()
  }
}

fn country_key(
  country: Option<&str>
) -> String {
  country
    .map(str::trim)
    .filter(|name| !name.is_empty())
    .unwrap_or(UNASSIGNED_COUNTRY)
    .to_string()
}

/// `spent / allocated`, or `None` when
/// nothing was allocated.
pub fn burn_rate(
  spent: f64,
  allocated: f64
) -> Option<f64> {
  (allocated > 0.0)
    .then(|| spent / allocated)
}

/// Whole-unit amount with thousands
/// separators.
pub fn format_amount(amount: f64) -> String {
  let rounded = amount.round();
  let digits =
    format!("{:.0}", rounded.abs());
  let mut grouped = String::new();
  for (idx, ch) in digits.chars().enumerate()
  {
    if idx > 0
      && (digits.len() - idx) % 3 == 0
    {
      grouped.push(',');
    }
    grouped.push(ch);
  }
  if rounded < 0.0 {
    format!("-{grouped}")
  } else {
    grouped
  }
}

pub fn format_rate(
  rate: Option<f64>
) -> String {
  match rate {
    | Some(rate) => {
      format!("{:.0}%", rate * 100.0)
    }
    | None => "-".to_string()
  }
}

pub fn assignments_by_country(
  assignments: &[Assignment]
) -> BTreeMap<String, CountryAssignments> {
  let mut out: BTreeMap<
    String,
    CountryAssignments
  > = BTreeMap::new();
  for assignment in assignments {
    let entry = out
      .entry(country_key(
        assignment.country.as_deref()
      ))
      .or_default();
    entry.count += 1;
    if assignment.status
      == AssignmentStatus::Active
    {
      entry.active += 1;
    }
    entry.budget += assignment.budget;
    entry.spent += assignment.spent;
  }
  out
}

/// Multi-country projects split their
/// commitment evenly so totals still add
/// up to the portfolio.
pub fn donors_by_country(
  projects: &[DonorProject]
) -> BTreeMap<String, CountryDonors> {
  let mut out: BTreeMap<
    String,
    CountryDonors
  > = BTreeMap::new();
  for project in projects {
    let countries: Vec<String> =
      if project.countries.is_empty() {
        vec![
          UNASSIGNED_COUNTRY.to_string(),
        ]
      } else {
        project
          .countries
          .iter()
          .map(|name| {
            country_key(Some(name))
          })
          .collect::<BTreeSet<_>>()
          .into_iter()
          .collect()
      };
    let share = project.committed
      / countries.len() as f64;
    for country in countries {
      let entry =
        out.entry(country).or_default();
      entry
        .donors
        .insert(project.donor.clone());
      entry.projects += 1;
      entry.committed += share;
    }
  }
  out
}

pub fn budget_summary(
  lines: &[BudgetLine]
) -> BudgetSummary {
  let allocated: f64 = lines
    .iter()
    .map(|line| line.allocated)
    .sum();
  let spent: f64 = lines
    .iter()
    .map(|line| line.spent)
    .sum();
  let over_budget = lines
    .iter()
    .filter(|line| {
      line.spent > line.allocated
    })
    .map(|line| line.id.clone())
    .collect();

  BudgetSummary {
    allocated,
    spent,
    remaining: allocated - spent,
    burn_rate: burn_rate(
      spent, allocated
    ),
    over_budget
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn assignment(
    id: &str,
    country: Option<&str>,
    status: AssignmentStatus,
    budget: f64,
    spent: f64
  ) -> Assignment {
    Assignment {
      id: id.to_string(),
      title: format!("Assignment {id}"),
      country: country
        .map(str::to_string),
      consultant: None,
      status,
      budget,
      spent,
      start_date: None,
      end_date: None
    }
  }

  fn project(
    id: &str,
    donor: &str,
    countries: &[&str],
    committed: f64
  ) -> DonorProject {
    DonorProject {
      id: id.to_string(),
      donor: donor.to_string(),
      name: format!("Project {id}"),
      countries: countries
        .iter()
        .map(|name| name.to_string())
        .collect(),
      committed
    }
  }

  #[test]
  fn burn_rate_requires_allocation() {
    assert_eq!(
      burn_rate(50.0, 200.0),
      Some(0.25)
    );
    assert_eq!(burn_rate(50.0, 0.0), None);
    assert_eq!(
      burn_rate(0.0, -10.0),
      None
    );
  }

  #[test]
  fn groups_assignments_by_country() {
    let rows = vec![
      assignment(
        "a1",
        Some("Cambodia"),
        AssignmentStatus::Active,
        10_000.0,
        2_500.0
      ),
      assignment(
        "a2",
        Some("Cambodia"),
        AssignmentStatus::Completed,
        5_000.0,
        5_000.0
      ),
      assignment(
        "a3",
        None,
        AssignmentStatus::Planned,
        1_000.0,
        0.0
      ),
    ];
    let grouped =
      assignments_by_country(&rows);

    let cambodia = &grouped["Cambodia"];
    assert_eq!(cambodia.count, 2);
    assert_eq!(cambodia.active, 1);
    assert_eq!(cambodia.budget, 15_000.0);
    assert_eq!(
      cambodia.burn_rate(),
      Some(0.5)
    );
    assert_eq!(
      grouped[UNASSIGNED_COUNTRY].count,
      1
    );
  }

  #[test]
  fn splits_multi_country_commitments() {
    let projects = vec![
      project(
        "p1",
        "FCDO",
        &["Cambodia", "Lao PDR"],
        1_000.0
      ),
      project(
        "p2",
        "DFAT",
        &["Cambodia"],
        300.0
      ),
    ];
    let grouped =
      donors_by_country(&projects);

    let cambodia = &grouped["Cambodia"];
    assert_eq!(cambodia.projects, 2);
    assert_eq!(cambodia.donors.len(), 2);
    assert_eq!(cambodia.committed, 800.0);
    assert_eq!(
      grouped["Lao PDR"].committed,
      500.0
    );
  }

  #[test]
  fn summarises_budget_lines() {
    let lines = vec![
      BudgetLine {
        id:         "b1".to_string(),
        workstream: "Governance"
          .to_string(),
        country:    None,
        allocated:  400.0,
        spent:      100.0
      },
      BudgetLine {
        id:         "b2".to_string(),
        workstream: "Research"
          .to_string(),
        country:    Some(
          "Philippines".to_string()
        ),
        allocated:  100.0,
        spent:      150.0
      },
    ];
    let summary = budget_summary(&lines);
    assert_eq!(summary.allocated, 500.0);
    assert_eq!(summary.remaining, 250.0);
    assert_eq!(
      summary.burn_rate,
      Some(0.5)
    );
    assert_eq!(
      summary.over_budget,
      vec!["b2"]
    );
    assert_eq!(
      budget_summary(&[]).burn_rate,
      None
    );
  }

  #[test]
  fn rollup_merges_countries_with_unassigned_last(
  ) {
    let rollup =
      DashboardRollup::from_records(
        &[
          assignment(
            "a1",
            Some("Philippines"),
            AssignmentStatus::Active,
            800.0,
            200.0
          ),
          assignment(
            "a2",
            Some("  "),
            AssignmentStatus::Planned,
            100.0,
            0.0
          ),
        ],
        &[],
        &[project(
          "p1",
          "ADB",
          &["Cambodia"],
          2_000.0
        )]
      );

    let countries: Vec<String> = rollup
      .country_rows()
      .into_iter()
      .map(|row| row.country)
      .collect();
    assert_eq!(
      countries,
      vec![
        "Cambodia",
        "Philippines",
        UNASSIGNED_COUNTRY,
      ]
    );

    let rows = rollup.country_rows();
    assert_eq!(rows[0].assignments.count, 0);
    assert_eq!(
      rows[0].donors.committed,
      2_000.0
    );
    assert_eq!(rows[1].donors.projects, 0);
    assert!(!rollup.is_empty());
    assert!(
      DashboardRollup::default().is_empty()
    );
  }

  #[test]
  fn amounts_and_rates_format_for_tables(
  ) {
    assert_eq!(format_amount(0.0), "0");
    assert_eq!(format_amount(999.4), "999");
    assert_eq!(
      format_amount(1_234_567.8),
      "1,234,568"
    );
    assert_eq!(
      format_amount(-12_500.0),
      "-12,500"
    );
    assert_eq!(
      format_rate(Some(0.25)),
      "25%"
    );
    assert_eq!(format_rate(None), "-");
  }

  #[test]
  fn deserialises_api_payload() {
    let json = r#"{
      "id": "a9",
      "title": "TVET review",
      "country": "Timor-Leste",
      "status": "ACTIVE",
      "budget": 1200.5,
      "startDate": "2026-11-02"
    }"#;
    let parsed: Assignment =
      serde_json::from_str(json)
        .expect("assignment json");
    assert_eq!(
      parsed.status,
      AssignmentStatus::Active
    );
    assert_eq!(parsed.spent, 0.0);
    assert_eq!(
      parsed.start_date,
      NaiveDate::from_ymd_opt(2026, 11, 2)
    );
  }
}
