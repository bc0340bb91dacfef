use serde::Serialize;

use crate::config::CalendarConfig;
use crate::event::{
  CalendarEvent,
  EventCatalog
};
use crate::lane::{
  Lane,
  event_lane
};
use crate::urgency::is_urgent;

#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct RelatedEvent {
  pub id:    String,
  pub name:  String,
  pub lane:  Lane,
  pub color: String
}

/// Everything the details drawer shows
/// for one event.
#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct EventDetails {
  pub event:         CalendarEvent,
  pub lane:          Lane,
  pub lane_label:    String,
  pub color:         String,
  pub duration_days: i64,
  pub urgent:        bool,
  pub related:       Vec<RelatedEvent>
}

pub fn event_details(
  catalog: &EventCatalog,
  event_id: &str,
  reference: chrono::NaiveDate,
  config: &CalendarConfig
) -> Option<EventDetails> {
  let event = catalog.get(event_id)?;
  let lane = event_lane(event);

  let related = event
    .related_to
    .iter()
    .filter_map(|id| catalog.get(id))
    .map(|other| {
      let other_lane = event_lane(other);
      RelatedEvent {
        id:    other.id.clone(),
        name:  other.name.clone(),
        lane:  other_lane,
        color: config
          .color_for(other.event_type)
          .to_string()
      }
    })
    .collect();

  Some(EventDetails {
    event: event.clone(),
    lane,
    lane_label: config
      .lane_label(lane)
      .to_string(),
    color: config
      .color_for(event.event_type)
      .to_string(),
    duration_days: event.duration_days(),
    urgent: is_urgent(
      event,
      reference,
      config.urgency.lookahead_days
    ),
    related
  })
}
