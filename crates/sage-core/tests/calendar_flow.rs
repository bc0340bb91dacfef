use chrono::NaiveDate;
use sage_core::event::{
  DateStatus,
  EventType,
  Geography
};
use sage_core::filter::TimeRange;
use sage_core::lane::{
  Lane,
  event_lane
};
use sage_core::school_year::SchoolCalendar;
use sage_core::svg::render_svg;
use sage_core::urgency::summarize;
use sage_core::{
  CalendarConfig,
  CalendarEvent,
  EventCatalog,
  FilterAction,
  FilterState,
  layout_gantt
};

fn date(
  y: i32,
  m: u32,
  d: u32
) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d)
    .expect("valid date")
}

fn event(
  id: &str,
  event_type: EventType,
  geography: Vec<Geography>,
  start: NaiveDate,
  end: NaiveDate
) -> CalendarEvent {
  CalendarEvent {
    id: id.to_string(),
    name: id.to_string(),
    event_type,
    geography,
    start_date: start,
    end_date: end,
    date_status: DateStatus::Confirmed,
    description: None,
    workstream: None,
    related_to: Vec::new()
  }
}

#[test]
fn every_seed_event_lands_in_one_lane() {
  let catalog =
    EventCatalog::embedded().expect("seed");
  for event in catalog.events() {
    let lane = event_lane(event);
    assert!(Lane::ALL.contains(&lane));
    if event
      .has_geography(Geography::Regional)
      && event.event_type
        != EventType::InternalPlanning
      && event.event_type
        != EventType::RegionalConference
    {
      assert_eq!(
        lane,
        Lane::AseanGovernance,
        "{} should sit in governance",
        event.id
      );
    }
  }
}

#[test]
fn visibility_follows_all_four_conditions() {
  let config = CalendarConfig::embedded();
  let catalog =
    EventCatalog::embedded().expect("seed");
  let reference = date(2026, 10, 19);

  let state = FilterState::new(reference)
    .apply(
      FilterAction::SetTimeRange(
        TimeRange::TwelveMonths
      ),
      &config
    )
    .apply(
      FilterAction::ToggleGeography(
        Geography::Other
      ),
      &config
    );
  let applied = state.applied(&config);
  let window = applied.window;

  for event in catalog.events() {
    let expected = applied
      .event_types
      .contains(&event.event_type)
      && event.geography.iter().any(|geo| {
        applied.geographies.contains(geo)
      })
      && (applied.show_estimated
        || event.date_status
          == DateStatus::Confirmed)
      && event.start_date <= window.end
      && event.end_date >= window.start;
    assert_eq!(
      applied.matches(event),
      expected,
      "{}",
      event.id
    );
  }
}

#[test]
fn full_programme_places_ased_in_governance_lane(
) {
  let config = CalendarConfig::embedded();
  let catalog =
    EventCatalog::embedded().expect("seed");
  let school = SchoolCalendar::embedded()
    .expect("school years");
  let reference = date(2026, 10, 19);
  let applied = FilterState::new(reference)
    .applied(&config);

  assert_eq!(
    applied.window.start,
    date(2026, 4, 1)
  );
  assert_eq!(
    applied.window.end,
    date(2029, 3, 31)
  );

  let layout = layout_gantt(
    catalog.events(),
    &applied,
    reference,
    &config,
    &school
  );
  let bar = layout
    .bar("ased-2026")
    .expect("ased bar");
  assert_eq!(
    bar.lane,
    Lane::AseanGovernance
  );
  let expected =
    167.0 / 1095.0 * layout.width;
  assert!((bar.x - expected).abs() < 1e-6);

  let svg = render_svg(&layout, &config);
  assert!(svg.contains("ased-2026"));
}

#[test]
fn hiding_estimates_keeps_only_confirmed() {
  let config = CalendarConfig::embedded();
  let catalog =
    EventCatalog::embedded().expect("seed");
  let state =
    FilterState::new(date(2026, 10, 19))
      .apply(
        FilterAction::SetShowEstimated(
          false
        ),
        &config
      );
  let applied = state.applied(&config);
  let visible =
    applied.visible_events(catalog.events());

  assert!(visible.iter().all(|event| {
    event.date_status
      == DateStatus::Confirmed
  }));
  let ids: Vec<&str> = visible
    .iter()
    .map(|event| event.id.as_str())
    .collect();
  assert!(
    ids.contains(&"logframe-review-2026")
  );
  assert!(!ids.contains(&"ased-2026"));
}

#[test]
fn presets_overwrite_only_what_they_define() {
  let config = CalendarConfig::embedded();
  let start =
    FilterState::new(date(2026, 10, 19))
      .apply(
        FilterAction::ToggleGeography(
          Geography::Philippines
        ),
        &config
      );

  let types_only = start.apply(
    FilterAction::ApplyPreset(
      "programme-management".to_string()
    ),
    &config
  );
  assert_eq!(
    types_only.selected_geographies,
    start.selected_geographies
  );

  let cambodia = start.apply(
    FilterAction::ApplyPreset(
      "cambodia-track".to_string()
    ),
    &config
  );
  assert_eq!(
    cambodia
      .selected_geographies
      .iter()
      .copied()
      .collect::<Vec<_>>(),
    vec![
      Geography::Regional,
      Geography::Cambodia,
    ]
  );
  assert_eq!(
    cambodia
      .applied(&config)
      .visible_lanes(),
    vec![
      Lane::AseanGovernance,
      Lane::Cambodia,
    ]
  );
}

#[test]
fn banner_counts_events_strictly_inside_lookahead(
) {
  let reference = date(2026, 10, 19);
  let events = vec![
    event(
      "on-reference",
      EventType::NationalPolicy,
      vec![Geography::Cambodia],
      reference,
      reference
    ),
    event(
      "soon",
      EventType::NationalPolicy,
      vec![Geography::LaoPdr],
      date(2026, 11, 2),
      date(2026, 11, 3)
    ),
    event(
      "later",
      EventType::ProgrammeMilestone,
      vec![Geography::Regional],
      date(2027, 1, 10),
      date(2027, 1, 10)
    ),
    event(
      "on-horizon",
      EventType::NationalPolicy,
      vec![Geography::Philippines],
      date(2027, 1, 17),
      date(2027, 1, 17)
    ),
  ];

  let summary =
    summarize(&events, reference, 90);
  assert_eq!(
    summary.headline().as_deref(),
    Some("2 events in next 90 days")
  );

  let quiet = summarize(
    &events[..1],
    reference,
    90
  );
  assert!(quiet.is_empty());
  assert!(quiet.headline().is_none());
}
