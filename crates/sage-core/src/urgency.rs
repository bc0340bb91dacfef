use chrono::{
  NaiveDate,
  TimeDelta
};
use serde::Serialize;

use crate::event::CalendarEvent;

/// `reference < start < reference +
/// lookahead`, both bounds exclusive.
///
/// A horizon past the last representable
/// date leaves the upper bound open.
pub fn is_urgent(
  event: &CalendarEvent,
  reference: NaiveDate,
  lookahead_days: i64
) -> bool {
  let horizon =
    TimeDelta::try_days(lookahead_days)
      .and_then(|delta| {
        reference.checked_add_signed(delta)
      });
  reference < event.start_date
    && horizon.is_none_or(|horizon| {
      event.start_date < horizon
    })
}

#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct NextGovernance {
  pub event_id:   String,
  pub name:       String,
  pub start_date: NaiveDate,
  pub days_until: i64
}

#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct UrgencySummary {
  pub upcoming_count:  usize,
  pub lookahead_days:  i64,
  pub next_governance: Option<NextGovernance>
}

impl UrgencySummary {
  /// Nothing to show: no urgent events
  /// and no governance meeting ahead.
  pub fn is_empty(&self) -> bool {
    self.upcoming_count == 0
      && self.next_governance.is_none()
  }

  pub fn headline(
    &self
  ) -> Option<String> {
    if self.upcoming_count == 0 {
      return None;
    }
    let noun = if self.upcoming_count == 1
    {
      "event"
    } else {
      "events"
    };
    Some(format!(
      "{} {noun} in next {} days",
      self.upcoming_count,
      self.lookahead_days
    ))
  }

  pub fn governance_line(
    &self
  ) -> Option<String> {
    self.next_governance.as_ref().map(
      |next| {
        format!(
          "Next governance meeting: {} \
           on {} ({} days)",
          next.name,
          next.start_date
            .format("%d %b %Y"),
          next.days_until
        )
      }
    )
  }
}

/// Counts urgent events and finds the
/// nearest governance meeting after
/// `reference`.
pub fn summarize<'a, I>(
  events: I,
  reference: NaiveDate,
  lookahead_days: i64
) -> UrgencySummary
where
  I: IntoIterator<
    Item = &'a CalendarEvent
  >
{
  let mut upcoming_count = 0_usize;
  let mut governance: Vec<
    &CalendarEvent
  > = Vec::new();

  for event in events {
    if is_urgent(
      event,
      reference,
      lookahead_days
    ) {
      upcoming_count =
        upcoming_count.saturating_add(1);
    }
    if event.event_type.is_governance() {
      governance.push(event);
    }
  }

  governance.sort_by_key(|event| {
    event.start_date
  });
  let next_governance = governance
    .into_iter()
    .find(|event| {
      event.start_date > reference
    })
    .map(|event| NextGovernance {
      event_id:   event.id.clone(),
      name:       event.name.clone(),
      start_date: event.start_date,
      days_until: (event.start_date
        - reference)
        .num_days()
    });

  UrgencySummary {
    upcoming_count,
    lookahead_days,
    next_governance
  }
}
