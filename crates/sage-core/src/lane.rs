use serde::{
  Deserialize,
  Serialize
};

use crate::event::{
  CalendarEvent,
  EventType,
  Geography
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lane {
  AseanGovernance,
  Cambodia,
  LaoPdr,
  TimorLeste,
  Philippines,
  InternationalConferences,
  Internal
}

impl Lane {
  /// Display order, top to bottom.
  pub const ALL: [Self; 7] = [
    Self::AseanGovernance,
    Self::Cambodia,
    Self::LaoPdr,
    Self::TimorLeste,
    Self::Philippines,
    Self::InternationalConferences,
    Self::Internal
  ];

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::AseanGovernance => {
        "ASEAN_GOVERNANCE"
      }
      | Self::Cambodia => "CAMBODIA",
      | Self::LaoPdr => "LAO_PDR",
      | Self::TimorLeste => {
        "TIMOR_LESTE"
      }
      | Self::Philippines => {
        "PHILIPPINES"
      }
      | Self::InternationalConferences => {
        "INTERNATIONAL_CONFERENCES"
      }
      | Self::Internal => "INTERNAL"
    }
  }

  pub fn default_label(
    self
  ) -> &'static str {
    match self {
      | Self::AseanGovernance => {
        "ASEAN Governance"
      }
      | Self::Cambodia => "Cambodia",
      | Self::LaoPdr => "Lao PDR",
      | Self::TimorLeste => {
        "Timor-Leste"
      }
      | Self::Philippines => {
        "Philippines"
      }
      | Self::InternationalConferences => {
        "International Conferences"
      }
      | Self::Internal => "Internal"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    Self::ALL
      .into_iter()
      .find(|lane| lane.as_key() == key)
  }

  pub fn for_country(
    geography: Geography
  ) -> Option<Self> {
    match geography {
      | Geography::Cambodia => {
        Some(Self::Cambodia)
      }
      | Geography::LaoPdr => {
        Some(Self::LaoPdr)
      }
      | Geography::TimorLeste => {
        Some(Self::TimorLeste)
      }
      | Geography::Philippines => {
        Some(Self::Philippines)
      }
      | Geography::Regional
      | Geography::Other => None
    }
  }

  /// Focus country whose school year
  /// shades this lane, if any.
  pub fn country(
    self
  ) -> Option<Geography> {
    match self {
      | Self::Cambodia => {
        Some(Geography::Cambodia)
      }
      | Self::LaoPdr => {
        Some(Geography::LaoPdr)
      }
      | Self::TimorLeste => {
        Some(Geography::TimorLeste)
      }
      | Self::Philippines => {
        Some(Geography::Philippines)
      }
      | Self::AseanGovernance
      | Self::InternationalConferences
      | Self::Internal => None
    }
  }
}

/// Classifies an event into exactly one
/// lane.
///
/// Precedence: internal planning, then
/// conferences, then a focus country
/// (only when the event is not also
/// tagged `REGIONAL`), otherwise ASEAN
/// governance. A country event that is
/// also regional lands on the
/// governance lane.
pub fn event_lane(
  event: &CalendarEvent
) -> Lane {
  if event.event_type
    == EventType::InternalPlanning
  {
    return Lane::Internal;
  }

  if event.event_type
    == EventType::RegionalConference
  {
    return Lane::InternationalConferences;
  }

  if !event
    .has_geography(Geography::Regional)
    && let Some(lane) = event
      .geography
      .iter()
      .find_map(|geo| {
        Lane::for_country(*geo)
      })
  {
    return lane;
  }

  Lane::AseanGovernance
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::event::{
    DateStatus,
    EventCatalog
  };

  fn event(
    event_type: EventType,
    geography: Vec<Geography>
  ) -> CalendarEvent {
    let day =
      NaiveDate::from_ymd_opt(2026, 7, 1)
        .expect("valid date");
    CalendarEvent {
      id: "probe".to_string(),
      name: "probe".to_string(),
      event_type,
      geography,
      start_date: day,
      end_date: day,
      date_status:
        DateStatus::Confirmed,
      description: None,
      workstream: None,
      related_to: vec![]
    }
  }

  #[test]
  fn internal_planning_wins_over_geography(
  ) {
    let probe = event(
      EventType::InternalPlanning,
      vec![Geography::Cambodia],
    );
    assert_eq!(
      event_lane(&probe),
      Lane::Internal
    );
  }

  #[test]
  fn conferences_go_to_conference_lane(
  ) {
    let probe = event(
      EventType::RegionalConference,
      vec![Geography::LaoPdr],
    );
    assert_eq!(
      event_lane(&probe),
      Lane::InternationalConferences
    );
  }

  #[test]
  fn country_events_use_country_lane() {
    let probe = event(
      EventType::NationalPolicy,
      vec![
        Geography::Other,
        Geography::TimorLeste,
      ],
    );
    assert_eq!(
      event_lane(&probe),
      Lane::TimorLeste
    );
  }

  #[test]
  fn regional_tag_overrides_country_tag(
  ) {
    for country in
      Geography::FOCUS_COUNTRIES
    {
      let probe = event(
        EventType::NationalPolicy,
        vec![
          country,
          Geography::Regional,
        ],
      );
      assert_eq!(
        event_lane(&probe),
        Lane::AseanGovernance
      );
    }
  }

  #[test]
  fn fallback_is_governance_lane() {
    let probe = event(
      EventType::ProgrammeMilestone,
      vec![Geography::Other],
    );
    assert_eq!(
      event_lane(&probe),
      Lane::AseanGovernance
    );
  }

  #[test]
  fn every_seed_event_gets_a_defined_lane(
  ) {
    let catalog = EventCatalog::embedded()
      .expect("embedded seed");
    for ev in catalog.events() {
      let lane = event_lane(ev);
      assert!(Lane::ALL.contains(&lane));
      assert_eq!(lane, event_lane(ev));
    }

    let tvet = catalog
      .get("asean-tvet-council-2026")
      .expect("tvet council");
    assert_eq!(
      event_lane(tvet),
      Lane::AseanGovernance
    );
  }
}
