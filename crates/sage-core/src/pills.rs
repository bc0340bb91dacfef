use crate::config::CalendarConfig;
use crate::event::{
  EventType,
  Geography
};
use crate::filter::{
  FilterAction,
  FilterState,
  TimeRange
};
use crate::gantt::MarkerKind;

/// One active constraint, with the action
/// that removes it.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct FilterPill {
  pub label:  String,
  pub remove: FilterAction
}

pub fn filter_pills(
  state: &FilterState,
  config: &CalendarConfig
) -> Vec<FilterPill> {
  let mut pills = Vec::new();

  if let Some(id) =
    state.selected_preset.as_deref()
  {
    let label = config
      .preset(id)
      .map(|preset| preset.label.clone())
      .unwrap_or_else(|| id.to_string());
    pills.push(FilterPill {
      label:  format!("Preset: {label}"),
      remove: FilterAction::ClearPreset
    });
  }

  for event_type in EventType::ALL {
    if !state
      .selected_event_types
      .contains(&event_type)
    {
      pills.push(FilterPill {
        label:  format!(
          "Hiding {}",
          event_type.label()
        ),
        remove:
          FilterAction::ToggleEventType(
            event_type
          )
      });
    }
  }

  for geography in Geography::ALL {
    if !state
      .selected_geographies
      .contains(&geography)
    {
      pills.push(FilterPill {
        label:  format!(
          "Hiding {}",
          geography.label()
        ),
        remove:
          FilterAction::ToggleGeography(
            geography
          )
      });
    }
  }

  if !state.show_estimated {
    pills.push(FilterPill {
      label:  "Confirmed dates only"
        .to_string(),
      remove:
        FilterAction::SetShowEstimated(
          true
        )
    });
  }

  if state.time_range != TimeRange::Full
  {
    pills.push(FilterPill {
      label:  format!(
        "Next {} from {}",
        state.time_range.label(),
        state
          .reference_date
          .format("%d %b %Y")
      ),
      remove: FilterAction::SetTimeRange(
        TimeRange::Full
      )
    });
  }

  pills
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct LegendEntry {
  pub label:  String,
  pub color:  String,
  pub marker: Option<MarkerKind>
}

/// Event-type swatches followed by the
/// boundary marker kinds.
pub fn legend_entries(
  config: &CalendarConfig
) -> Vec<LegendEntry> {
  let mut entries: Vec<LegendEntry> =
    EventType::ALL
      .into_iter()
      .map(|event_type| LegendEntry {
        label:  event_type
          .label()
          .to_string(),
        color:  config
          .color_for(event_type)
          .to_string(),
        marker: None
      })
      .collect();

  let markers = [
    (
      MarkerKind::FiscalYear,
      "UK fiscal year",
      &config.markers.fiscal_year
    ),
    (
      MarkerKind::CalendarYear,
      "Calendar year",
      &config.markers.calendar_year
    ),
    (
      MarkerKind::AseanYear,
      "ASEAN working year",
      &config.markers.asean_year
    ),
  ];
  for (kind, label, style) in markers {
    entries.push(LegendEntry {
      label:  label.to_string(),
      color:  style.color.clone(),
      marker: Some(kind)
    });
  }

  entries
}
