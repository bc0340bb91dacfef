//! Pixel layout for the programme Gantt
//! chart.
//!
//! Coordinates are in timeline space:
//! `x = 0` is the window start and
//! `y = 0` is the top of the first lane.
//! Renderers offset by the label column
//! and header themselves.

use std::collections::BTreeMap;

use chrono::{
  Datelike,
  Months,
  NaiveDate
};
use serde::Serialize;

use crate::config::{
  CalendarConfig,
  LayoutConfig
};
use crate::event::CalendarEvent;
use crate::filter::{
  AppliedFilters,
  VisibleWindow
};
use crate::lane::{
  Lane,
  event_lane
};
use crate::school_year::SchoolCalendar;
use crate::urgency::is_urgent;

const ROW_GAP: f64 = 6.0;
const BAR_SPACING: f64 = 2.0;

#[derive(
  Debug, Clone, Copy, PartialEq,
)]
pub struct TimelineScale {
  window: VisibleWindow,
  width:  f64
}

impl TimelineScale {
  pub fn new(
    window: VisibleWindow,
    layout: &LayoutConfig
  ) -> Self {
    let natural = window.days() as f64
      * layout.px_per_day;
    Self {
      window,
      width: natural
        .max(layout.min_timeline_width)
    }
  }

  pub fn width(&self) -> f64 {
    self.width
  }

  pub fn window(&self) -> VisibleWindow {
    self.window
  }

  /// Linear position of `day` across the
  /// window. A single-day window divides
  /// by one day.
  pub fn x(&self, day: NaiveDate) -> f64 {
    let span =
      self.window.days().max(1) as f64;
    let offset = (day
      - self.window.start)
      .num_days()
      as f64;
    offset / span * self.width
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
  Serialize,
)]
pub enum MarkerKind {
  Month,
  FiscalYear,
  CalendarYear,
  AseanYear
}

impl MarkerKind {
  pub fn as_class(self) -> &'static str {
    match self {
      | Self::Month => "marker-month",
      | Self::FiscalYear => {
        "marker-fiscal-year"
      }
      | Self::CalendarYear => {
        "marker-calendar-year"
      }
      | Self::AseanYear => {
        "marker-asean-year"
      }
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct BoundaryMarker {
  pub kind:  MarkerKind,
  pub date:  NaiveDate,
  pub x:     f64,
  pub label: String
}

/// Month gridlines plus UK fiscal year
/// (1 April), calendar year and ASEAN
/// working year (both 1 January)
/// boundaries inside the window.
pub fn boundary_markers(
  scale: &TimelineScale
) -> Vec<BoundaryMarker> {
  let window = scale.window();
  let mut markers = Vec::new();

  let mut month = NaiveDate::from_ymd_opt(
    window.start.year(),
    window.start.month(),
    1
  );
  while let Some(day) = month {
    if day > window.end {
      break;
    }
    if window.contains(day) {
      markers.push(BoundaryMarker {
        kind:  MarkerKind::Month,
        date:  day,
        x:     scale.x(day),
        label: day
          .format("%b")
          .to_string()
      });
    }
    month =
      day.checked_add_months(Months::new(1));
  }

  for year in
    window.start.year()..=window.end.year()
  {
    if let Some(new_year) =
      NaiveDate::from_ymd_opt(year, 1, 1)
      && window.contains(new_year)
    {
      let x = scale.x(new_year);
      markers.push(BoundaryMarker {
        kind: MarkerKind::CalendarYear,
        date: new_year,
        x,
        label: year.to_string()
      });
      markers.push(BoundaryMarker {
        kind: MarkerKind::AseanYear,
        date: new_year,
        x,
        label: format!("ASEAN {year}")
      });
    }

    if let Some(fiscal) =
      NaiveDate::from_ymd_opt(year, 4, 1)
      && window.contains(fiscal)
    {
      markers.push(BoundaryMarker {
        kind:  MarkerKind::FiscalYear,
        date:  fiscal,
        x:     scale.x(fiscal),
        label: format!(
          "FY{:02}/{:02}",
          year.rem_euclid(100),
          (year + 1).rem_euclid(100)
        )
      });
    }
  }

  markers.sort_by(|a, b| {
    a.date
      .cmp(&b.date)
      .then(a.kind.cmp(&b.kind))
  });
  markers
}

#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct SchoolBand {
  pub start:       NaiveDate,
  pub end:         NaiveDate,
  pub x:           f64,
  pub width:       f64,
  pub description: Option<String>
}

#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct LaneBand {
  pub lane:         Lane,
  pub label:        String,
  pub y:            f64,
  pub height:       f64,
  pub rows:         usize,
  pub school_bands: Vec<SchoolBand>
}

#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct EventBar {
  pub event_id:  String,
  pub name:      String,
  pub lane:      Lane,
  pub row:       usize,
  /// Left edge on the timeline. A bar
  /// widened to the minimum width near
  /// the window end is shifted left so it
  /// ends at the timeline edge; `x` is
  /// then before its start date.
  pub x:         f64,
  pub y:         f64,
  pub width:     f64,
  pub height:    f64,
  pub color:     String,
  pub estimated: bool,
  pub urgent:    bool,
  pub tooltip:   String
}

#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct GanttLayout {
  pub window:         VisibleWindow,
  pub width:          f64,
  pub height:         f64,
  pub label_width:    f64,
  pub header_height:  f64,
  pub lanes:          Vec<LaneBand>,
  pub bars:           Vec<EventBar>,
  pub markers:        Vec<BoundaryMarker>,
  pub reference_date: NaiveDate,
  pub reference_x:    Option<f64>
}

impl GanttLayout {
  pub fn bar(
    &self,
    event_id: &str
  ) -> Option<&EventBar> {
    self.bars.iter().find(|bar| {
      bar.event_id == event_id
    })
  }

  pub fn lane(
    &self,
    lane: Lane
  ) -> Option<&LaneBand> {
    self
      .lanes
      .iter()
      .find(|band| band.lane == lane)
  }
}

fn tooltip_for(
  event: &CalendarEvent,
  lane_label: &str
) -> String {
  let dates = if event.start_date
    == event.end_date
  {
    event
      .start_date
      .format("%d %b %Y")
      .to_string()
  } else {
    format!(
      "{} to {}",
      event.start_date.format("%d %b %Y"),
      event.end_date.format("%d %b %Y")
    )
  };
  format!(
    "{}\n{} ({})\n{} | {}",
    event.name,
    dates,
    event.date_status.label(),
    event.event_type.label(),
    lane_label
  )
}

struct PlacedBar<'a> {
  event: &'a CalendarEvent,
  x:     f64,
  width: f64,
  row:   usize
}

/// Greedy first-fit of bars into rows so
/// bars in the same row never overlap.
fn stack_rows<'a>(
  mut bars: Vec<PlacedBar<'a>>
) -> (Vec<PlacedBar<'a>>, usize) {
  bars.sort_by(|a, b| {
    a.x
      .total_cmp(&b.x)
      .then(
        a.event
          .end_date
          .cmp(&b.event.end_date)
      )
      .then(
        a.event.id.cmp(&b.event.id)
      )
  });

  let mut row_ends: Vec<f64> = Vec::new();
  for bar in &mut bars {
    let slot =
      row_ends.iter().position(|end| {
        bar.x >= *end + BAR_SPACING
      });
    let row = match slot {
      | Some(row) => row,
      | None => {
        row_ends.push(f64::MIN);
        row_ends.len() - 1
      }
    };
    row_ends[row] = bar.x + bar.width;
    bar.row = row;
  }

  let rows = row_ends.len().max(1);
  (bars, rows)
}

/// Lays out every event that passes
/// `applied` onto its lane.
#[tracing::instrument(skip_all, fields(
  start = %applied.window.start,
  end = %applied.window.end
))]
pub fn layout_gantt(
  events: &[CalendarEvent],
  applied: &AppliedFilters,
  reference: NaiveDate,
  config: &CalendarConfig,
  school: &SchoolCalendar
) -> GanttLayout {
  let layout = &config.layout;
  let window = applied.window;
  let scale =
    TimelineScale::new(window, layout);
  let timeline_width = scale.width();

  let mut by_lane: BTreeMap<
    Lane,
    Vec<PlacedBar<'_>>
  > = BTreeMap::new();
  for event in
    applied.visible_events(events)
  {
    let start =
      event.start_date.max(window.start);
    let end =
      event.end_date.min(window.end);
    let x0 = scale.x(start);
    let width = (scale.x(end) - x0)
      .max(layout.min_bar_width);
    let x = if x0 + width > timeline_width
    {
      (timeline_width - width).max(0.0)
    } else {
      x0
    };
    by_lane
      .entry(event_lane(event))
      .or_default()
      .push(PlacedBar {
        event,
        x,
        width,
        row: 0
      });
  }

  let row_pitch =
    layout.bar_height + ROW_GAP;
  let top_pad = (layout.lane_height
    - layout.bar_height)
    / 2.0;

  let mut lanes = Vec::new();
  let mut bars = Vec::new();
  let mut y = 0.0_f64;

  for lane in applied.visible_lanes() {
    let placed = by_lane
      .remove(&lane)
      .unwrap_or_default();
    let (placed, rows) =
      stack_rows(placed);
    let height = layout.lane_height
      + (rows - 1) as f64 * row_pitch;
    let label =
      config.lane_label(lane).to_string();

    for bar in placed {
      let event = bar.event;
      bars.push(EventBar {
        event_id:  event.id.clone(),
        name:      event.name.clone(),
        lane,
        row:       bar.row,
        x:         bar.x,
        y:         y
          + top_pad
          + bar.row as f64 * row_pitch,
        width:     bar.width,
        height:    layout.bar_height,
        color:     config
          .color_for(event.event_type)
          .to_string(),
        estimated: event.is_estimated(),
        urgent:    is_urgent(
          event,
          reference,
          config.urgency.lookahead_days
        ),
        tooltip:   tooltip_for(
          event, &label
        )
      });
    }

    let school_bands = lane
      .country()
      .map(|country| {
        school
          .overlapping(
            country,
            window.start,
            window.end
          )
          .into_iter()
          .filter_map(|period| {
            let (start, end) = period
              .clip(
                window.start,
                window.end
              )?;
            let x = scale.x(start);
            Some(SchoolBand {
              start,
              end,
              x,
              width: (scale.x(end) - x)
                .max(1.0),
              description: period
                .description
                .clone()
            })
          })
          .collect()
      })
      .unwrap_or_default();

    lanes.push(LaneBand {
      lane,
      label,
      y,
      height,
      rows,
      school_bands
    });
    y += height;
  }

  let reference_x = window
    .strictly_contains(reference)
    .then(|| scale.x(reference));

  tracing::debug!(
    lanes = lanes.len(),
    bars = bars.len(),
    width = timeline_width,
    "laid out gantt chart"
  );

  GanttLayout {
    window,
    width: timeline_width,
    height: y,
    label_width: layout.label_width,
    header_height: layout.header_height,
    lanes,
    bars,
    markers: boundary_markers(&scale),
    reference_date: reference,
    reference_x
  }
}
