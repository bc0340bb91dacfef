use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  warn
};

use crate::error::CalendarError;

const EVENTS_TOML: &str =
  include_str!("../assets/events.toml");

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
pub enum EventType {
  AseanMinisterial,
  AseanSom,
  AseanSummit,
  AseanWorkingGroup,
  NationalPolicy,
  RegionalConference,
  ProgrammeMilestone,
  InternalPlanning
}

impl EventType {
  pub const ALL: [Self; 8] = [
    Self::AseanMinisterial,
    Self::AseanSom,
    Self::AseanSummit,
    Self::AseanWorkingGroup,
    Self::NationalPolicy,
    Self::RegionalConference,
    Self::ProgrammeMilestone,
    Self::InternalPlanning
  ];

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::AseanMinisterial => {
        "ASEAN_MINISTERIAL"
      }
      | Self::AseanSom => "ASEAN_SOM",
      | Self::AseanSummit => {
        "ASEAN_SUMMIT"
      }
      | Self::AseanWorkingGroup => {
        "ASEAN_WORKING_GROUP"
      }
      | Self::NationalPolicy => {
        "NATIONAL_POLICY"
      }
      | Self::RegionalConference => {
        "REGIONAL_CONFERENCE"
      }
      | Self::ProgrammeMilestone => {
        "PROGRAMME_MILESTONE"
      }
      | Self::InternalPlanning => {
        "INTERNAL_PLANNING"
      }
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::AseanMinisterial => {
        "ASEAN Ministerial"
      }
      | Self::AseanSom => {
        "Senior Officials Meeting"
      }
      | Self::AseanSummit => {
        "ASEAN Summit"
      }
      | Self::AseanWorkingGroup => {
        "ASEAN Working Group"
      }
      | Self::NationalPolicy => {
        "National Policy"
      }
      | Self::RegionalConference => {
        "Conference"
      }
      | Self::ProgrammeMilestone => {
        "Programme Milestone"
      }
      | Self::InternalPlanning => {
        "Internal Planning"
      }
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    Self::ALL
      .into_iter()
      .find(|ty| ty.as_key() == key)
  }

  /// Ministerial, senior-officials and
  /// summit meetings.
  pub fn is_governance(self) -> bool {
    matches!(
      self,
      Self::AseanMinisterial
        | Self::AseanSom
        | Self::AseanSummit
    )
  }
}

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
pub enum Geography {
  Regional,
  Cambodia,
  LaoPdr,
  TimorLeste,
  Philippines,
  Other
}

impl Geography {
  pub const ALL: [Self; 6] = [
    Self::Regional,
    Self::Cambodia,
    Self::LaoPdr,
    Self::TimorLeste,
    Self::Philippines,
    Self::Other
  ];

  pub const FOCUS_COUNTRIES: [Self; 4] = [
    Self::Cambodia,
    Self::LaoPdr,
    Self::TimorLeste,
    Self::Philippines
  ];

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Regional => "REGIONAL",
      | Self::Cambodia => "CAMBODIA",
      | Self::LaoPdr => "LAO_PDR",
      | Self::TimorLeste => {
        "TIMOR_LESTE"
      }
      | Self::Philippines => {
        "PHILIPPINES"
      }
      | Self::Other => "OTHER"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::Regional => "Regional",
      | Self::Cambodia => "Cambodia",
      | Self::LaoPdr => "Lao PDR",
      | Self::TimorLeste => {
        "Timor-Leste"
      }
      | Self::Philippines => {
        "Philippines"
      }
      | Self::Other => "Other"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    Self::ALL
      .into_iter()
      .find(|geo| geo.as_key() == key)
  }

  pub fn is_focus_country(
    self
  ) -> bool {
    Self::FOCUS_COUNTRIES
      .contains(&self)
  }
}

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
pub enum DateStatus {
  Confirmed,
  Estimated
}

impl DateStatus {
  pub fn label(self) -> &'static str {
    match self {
      | Self::Confirmed => "Confirmed",
      | Self::Estimated => "Estimated"
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
  pub id:          String,
  pub name:        String,
  pub event_type:  EventType,
  pub geography:   Vec<Geography>,
  pub start_date:  NaiveDate,
  pub end_date:    NaiveDate,
  pub date_status: DateStatus,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub workstream:  Option<String>,
  #[serde(default)]
  pub related_to:  Vec<String>
}

impl CalendarEvent {
  pub fn is_estimated(&self) -> bool {
    self.date_status
      == DateStatus::Estimated
  }

  pub fn has_geography(
    &self,
    geography: Geography
  ) -> bool {
    self.geography.contains(&geography)
  }

  /// Inclusive of both end days.
  pub fn duration_days(&self) -> i64 {
    (self.end_date - self.start_date)
      .num_days()
      + 1
  }

  pub fn overlaps(
    &self,
    window_start: NaiveDate,
    window_end: NaiveDate
  ) -> bool {
    self.start_date <= window_end
      && self.end_date >= window_start
  }
}

#[derive(Deserialize)]
struct EventSeedFile {
  #[serde(rename = "event", default)]
  events: Vec<CalendarEvent>
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventCatalog {
  events: Vec<CalendarEvent>
}

impl EventCatalog {
  pub fn new(
    events: Vec<CalendarEvent>
  ) -> Result<Self, CalendarError> {
    let catalog = Self {
      events
    };
    catalog.validate()?;
    Ok(catalog)
  }

  /// Seed events compiled into the
  /// binary.
  pub fn embedded()
  -> Result<Self, CalendarError> {
    Self::from_toml_str(
      EVENTS_TOML,
      "events.toml"
    )
  }

  #[tracing::instrument(skip(text))]
  pub fn from_toml_str(
    text: &str,
    source_name: &str
  ) -> Result<Self, CalendarError> {
    let seed: EventSeedFile =
      toml::from_str(text).map_err(
        |err| {
          CalendarError::parse(
            source_name,
            err
          )
        }
      )?;
    debug!(
      count = seed.events.len(),
      "parsed seed events"
    );
    Self::new(seed.events)
  }

  /// Accepts the JSON array served by
  /// `GET /api/calendar/events`.
  #[tracing::instrument(skip(text))]
  pub fn from_json_str(
    text: &str,
    source_name: &str
  ) -> Result<Self, CalendarError> {
    let events: Vec<CalendarEvent> =
      serde_json::from_str(text)
        .map_err(|err| {
          CalendarError::parse(
            source_name,
            err
          )
        })?;
    Self::new(events)
  }

  pub fn events(
    &self
  ) -> &[CalendarEvent] {
    &self.events
  }

  pub fn len(&self) -> usize {
    self.events.len()
  }

  pub fn is_empty(&self) -> bool {
    self.events.is_empty()
  }

  pub fn get(
    &self,
    id: &str
  ) -> Option<&CalendarEvent> {
    self
      .events
      .iter()
      .find(|event| event.id == id)
  }

  fn validate(
    &self
  ) -> Result<(), CalendarError> {
    let mut seen = BTreeSet::new();
    for event in &self.events {
      if !seen.insert(event.id.as_str())
      {
        return Err(
          CalendarError::DuplicateEventId(
            event.id.clone()
          )
        );
      }
      if event.geography.is_empty() {
        return Err(
          CalendarError::EmptyGeography(
            event.id.clone()
          )
        );
      }
      if event.start_date
        > event.end_date
      {
        return Err(
          CalendarError::InvertedRange {
            id:    event.id.clone(),
            start: event.start_date,
            end:   event.end_date
          }
        );
      }
    }

    for event in &self.events {
      for related in &event.related_to {
        if !seen.contains(
          related.as_str()
        ) {
          warn!(
            event = %event.id,
            related = %related,
            "related event id does not exist"
          );
        }
      }
    }

    Ok(())
  }
}
