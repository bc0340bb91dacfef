use std::collections::BTreeSet;

use chrono::{
  Months,
  NaiveDate
};
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  info
};

use crate::config::{
  CalendarConfig,
  ProgrammeBounds
};
use crate::event::{
  CalendarEvent,
  EventType,
  Geography
};
use crate::lane::{
  Lane,
  event_lane
};

pub const DATE_INPUT_FORMAT: &str =
  "%Y-%m-%d";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
)]
pub enum TimeRange {
  SixMonths,
  TwelveMonths,
  #[default]
  Full
}

impl TimeRange {
  pub const ALL: [Self; 3] = [
    Self::SixMonths,
    Self::TwelveMonths,
    Self::Full
  ];

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::SixMonths => "6m",
      | Self::TwelveMonths => "12m",
      | Self::Full => "full"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::SixMonths => "6 months",
      | Self::TwelveMonths => {
        "12 months"
      }
      | Self::Full => "Full programme"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key {
      | "6m" => Some(Self::SixMonths),
      | "12m" => {
        Some(Self::TwelveMonths)
      }
      | "full" => Some(Self::Full),
      | _ => None
    }
  }

  pub fn months(self) -> Option<u32> {
    match self {
      | Self::SixMonths => Some(6),
      | Self::TwelveMonths => Some(12),
      | Self::Full => None
    }
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
pub struct VisibleWindow {
  pub start: NaiveDate,
  pub end:   NaiveDate
}

impl VisibleWindow {
  /// Length in days; zero for a
  /// single-day window.
  pub fn days(self) -> i64 {
    (self.end - self.start).num_days()
  }

  pub fn contains(
    self,
    day: NaiveDate
  ) -> bool {
    self.start <= day && day <= self.end
  }

  pub fn strictly_contains(
    self,
    day: NaiveDate
  ) -> bool {
    self.start < day && day < self.end
  }
}

/// Window shown for `range` anchored at
/// `reference`, clamped to the
/// programme.
pub fn visible_window(
  range: TimeRange,
  reference: NaiveDate,
  programme: &ProgrammeBounds
) -> VisibleWindow {
  let Some(months) = range.months()
  else {
    return VisibleWindow {
      start: programme.start,
      end:   programme.end
    };
  };

  let raw_end = reference
    .checked_add_months(Months::new(
      months
    ))
    .unwrap_or(programme.end);

  VisibleWindow {
    start: reference
      .clamp(programme.start, programme.end),
    end:   raw_end
      .clamp(programme.start, programme.end)
  }
}

pub fn parse_date_input(
  raw: &str
) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(
    raw.trim(),
    DATE_INPUT_FORMAT
  )
  .ok()
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum FilterAction {
  ToggleEventType(EventType),
  ToggleGeography(Geography),
  SelectAllEventTypes,
  ClearEventTypes,
  SelectAllGeographies,
  ClearGeographies,
  SetShowEstimated(bool),
  SetTimeRange(TimeRange),
  SetReferenceDate(NaiveDate),
  /// Raw text from a date picker.
  SetReferenceDateInput(String),
  /// Moves the reference date by whole
  /// window lengths.
  ShiftReference(i32),
  ApplyPreset(String),
  ClearPreset,
  SelectEvent(String),
  CloseDetails,
  Reset
}

/// Page-owned calendar state. Every
/// change produces a new value through
/// [`FilterState::apply`].
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct FilterState {
  pub selected_event_types:
    BTreeSet<EventType>,
  pub selected_geographies:
    BTreeSet<Geography>,
  pub show_estimated:  bool,
  pub time_range:      TimeRange,
  pub reference_date:  NaiveDate,
  pub selected_preset: Option<String>,
  pub selected_event:  Option<String>
}

impl FilterState {
  pub fn new(
    reference_date: NaiveDate
  ) -> Self {
    Self {
      selected_event_types: EventType::ALL
        .into_iter()
        .collect(),
      selected_geographies: Geography::ALL
        .into_iter()
        .collect(),
      show_estimated: true,
      time_range: TimeRange::Full,
      reference_date,
      selected_preset: None,
      selected_event: None
    }
  }

  #[tracing::instrument(skip(
    self, config
  ))]
  pub fn apply(
    &self,
    action: FilterAction,
    config: &CalendarConfig
  ) -> Self {
    let mut next = self.clone();

    match action {
      | FilterAction::ToggleEventType(
        event_type
      ) => {
        if !next
          .selected_event_types
          .remove(&event_type)
        {
          next
            .selected_event_types
            .insert(event_type);
        }
        next.selected_preset = None;
      }
      | FilterAction::ToggleGeography(
        geography
      ) => {
        if !next
          .selected_geographies
          .remove(&geography)
        {
          next
            .selected_geographies
            .insert(geography);
        }
        next.selected_preset = None;
      }
      | FilterAction::SelectAllEventTypes => {
        next.selected_event_types =
          EventType::ALL
            .into_iter()
            .collect();
        next.selected_preset = None;
      }
      | FilterAction::ClearEventTypes => {
        next
          .selected_event_types
          .clear();
        next.selected_preset = None;
      }
      | FilterAction::SelectAllGeographies => {
        next.selected_geographies =
          Geography::ALL
            .into_iter()
            .collect();
        next.selected_preset = None;
      }
      | FilterAction::ClearGeographies => {
        next
          .selected_geographies
          .clear();
        next.selected_preset = None;
      }
      | FilterAction::SetShowEstimated(
        show
      ) => {
        next.show_estimated = show;
      }
      | FilterAction::SetTimeRange(
        range
      ) => {
        next.time_range = range;
      }
      | FilterAction::SetReferenceDate(
        day
      ) => {
        next.reference_date = day;
      }
      | FilterAction::SetReferenceDateInput(
        raw
      ) => {
        match parse_date_input(&raw) {
          | Some(day) => {
            next.reference_date = day;
          }
          | None => {
            debug!(input = %raw, "rejected malformed reference date");
          }
        }
      }
      | FilterAction::ShiftReference(
        steps
      ) => {
        if let Some(months) =
          next.time_range.months()
        {
          let delta =
            months.saturating_mul(
              steps.unsigned_abs()
            );
          let shifted = if steps >= 0 {
            next
              .reference_date
              .checked_add_months(
                Months::new(delta)
              )
          } else {
            next
              .reference_date
              .checked_sub_months(
                Months::new(delta)
              )
          };
          if let Some(day) = shifted {
            next.reference_date = day;
          }
        }
      }
      | FilterAction::ApplyPreset(id) => {
        match config.preset(&id) {
          | Some(preset) => {
            if let Some(types) =
              &preset.event_type_filters
            {
              next.selected_event_types =
                types.clone();
            }
            if let Some(geos) =
              &preset.geography_filters
            {
              next.selected_geographies =
                geos.clone();
            }
            info!(preset = %id, "applied view preset");
            next.selected_preset =
              Some(id);
          }
          | None => {
            debug!(preset = %id, "unknown view preset ignored");
          }
        }
      }
      | FilterAction::ClearPreset => {
        next.selected_preset = None;
      }
      | FilterAction::SelectEvent(id) => {
        next.selected_event = Some(id);
      }
      | FilterAction::CloseDetails => {
        next.selected_event = None;
      }
      | FilterAction::Reset => {
        next = Self::new(
          self.reference_date
        );
      }
    }

    next
  }

  pub fn window(
    &self,
    config: &CalendarConfig
  ) -> VisibleWindow {
    visible_window(
      self.time_range,
      self.reference_date,
      &config.programme
    )
  }

  /// Derived filters the chart renders
  /// with.
  pub fn applied(
    &self,
    config: &CalendarConfig
  ) -> AppliedFilters {
    let lanes = self
      .selected_preset
      .as_deref()
      .and_then(|id| config.preset(id))
      .and_then(|preset| {
        preset.lanes.clone()
      })
      .unwrap_or_else(|| {
        Lane::ALL.into_iter().collect()
      });

    AppliedFilters {
      event_types: self
        .selected_event_types
        .clone(),
      geographies: self
        .selected_geographies
        .clone(),
      show_estimated: self
        .show_estimated,
      window: self.window(config),
      lanes
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct AppliedFilters {
  pub event_types:    BTreeSet<EventType>,
  pub geographies:    BTreeSet<Geography>,
  pub show_estimated: bool,
  pub window:         VisibleWindow,
  pub lanes:          BTreeSet<Lane>
}

impl AppliedFilters {
  /// Type, geography, date status and
  /// window overlap, all required.
  pub fn matches(
    &self,
    event: &CalendarEvent
  ) -> bool {
    self
      .event_types
      .contains(&event.event_type)
      && event.geography.iter().any(
        |geo| {
          self.geographies.contains(geo)
        }
      )
      && (self.show_estimated
        || !event.is_estimated())
      && event.overlaps(
        self.window.start,
        self.window.end
      )
  }

  pub fn shows_lane(
    &self,
    lane: Lane
  ) -> bool {
    self.lanes.contains(&lane)
  }

  /// Lanes in display order.
  pub fn visible_lanes(
    &self
  ) -> Vec<Lane> {
    Lane::ALL
      .into_iter()
      .filter(|lane| {
        self.shows_lane(*lane)
      })
      .collect()
  }

  pub fn visible_events<'a>(
    &self,
    events: &'a [CalendarEvent]
  ) -> Vec<&'a CalendarEvent> {
    events
      .iter()
      .filter(|event| {
        self.matches(event)
          && self
            .shows_lane(event_lane(event))
      })
      .collect()
  }
}
