use std::collections::{
  BTreeMap,
  BTreeSet
};

use chrono::{
  NaiveDate,
  Utc
};
use chrono_tz::Tz;
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  error,
  info,
  warn
};

use crate::error::CalendarError;
use crate::event::{
  EventType,
  Geography
};
use crate::lane::Lane;

const CALENDAR_CONFIG_TOML: &str =
  include_str!("../assets/calendar.toml");
const DEFAULT_CALENDAR_TIMEZONE: &str =
  "Asia/Phnom_Penh";
const FALLBACK_EVENT_COLOR: &str =
  "#7f8691";
const MAX_LOOKAHEAD_DAYS: i64 = 3650;

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct CalendarConfig {
  #[serde(default)]
  pub version:     u32,
  #[serde(
    default = "calendar_default_timezone"
  )]
  pub timezone:    String,
  #[serde(default)]
  pub programme:   ProgrammeBounds,
  #[serde(default)]
  pub urgency:     UrgencyPolicy,
  #[serde(default)]
  pub layout:      LayoutConfig,
  #[serde(default)]
  pub colors:      BTreeMap<EventType, String>,
  #[serde(default)]
  pub lanes:       BTreeMap<Lane, String>,
  #[serde(default)]
  pub markers:     MarkerStyles,
  #[serde(default)]
  pub school_year: BandStyle,
  #[serde(default, rename = "preset")]
  pub presets:     Vec<ViewPreset>
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
pub struct ProgrammeBounds {
  pub start: NaiveDate,
  pub end:   NaiveDate
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
pub struct UrgencyPolicy {
  #[serde(
    default = "calendar_default_lookahead_days"
  )]
  pub lookahead_days: i64
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct LayoutConfig {
  #[serde(
    default = "calendar_default_px_per_day"
  )]
  pub px_per_day:         f64,
  #[serde(
    default = "calendar_default_min_timeline_width"
  )]
  pub min_timeline_width: f64,
  #[serde(
    default = "calendar_default_lane_height"
  )]
  pub lane_height:        f64,
  #[serde(
    default = "calendar_default_bar_height"
  )]
  pub bar_height:         f64,
  #[serde(
    default = "calendar_default_min_bar_width"
  )]
  pub min_bar_width:      f64,
  #[serde(
    default = "calendar_default_label_width"
  )]
  pub label_width:        f64,
  #[serde(
    default = "calendar_default_header_height"
  )]
  pub header_height:      f64
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct MarkerStyle {
  pub color:   String,
  #[serde(default = "calendar_one")]
  pub width:   f64,
  #[serde(default)]
  pub dash:    Option<String>,
  #[serde(default = "calendar_one")]
  pub opacity: f64,
  #[serde(default)]
  pub label:   Option<String>
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct MarkerStyles {
  pub fiscal_year:   MarkerStyle,
  pub calendar_year: MarkerStyle,
  pub asean_year:    MarkerStyle,
  pub month:         MarkerStyle,
  pub reference:     MarkerStyle
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct BandStyle {
  pub fill:    String,
  #[serde(
    default = "calendar_default_band_opacity"
  )]
  pub opacity: f64
}

/// Named filter combination. Dimensions
/// left as `None` keep the current
/// selection when the preset is applied.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct ViewPreset {
  pub id:                 String,
  pub label:              String,
  #[serde(default)]
  pub description:        Option<String>,
  #[serde(default)]
  pub event_type_filters:
    Option<BTreeSet<EventType>>,
  #[serde(default)]
  pub geography_filters:
    Option<BTreeSet<Geography>>,
  #[serde(default)]
  pub lanes:
    Option<BTreeSet<Lane>>
}

fn calendar_default_timezone() -> String
{
  DEFAULT_CALENDAR_TIMEZONE.to_string()
}

fn calendar_default_lookahead_days()
-> i64 {
  90
}

fn calendar_default_px_per_day() -> f64
{
  2.4
}

fn calendar_default_min_timeline_width()
-> f64 {
  960.0
}

fn calendar_default_lane_height() -> f64
{
  56.0
}

fn calendar_default_bar_height() -> f64
{
  18.0
}

fn calendar_default_min_bar_width()
-> f64 {
  6.0
}

fn calendar_default_label_width() -> f64
{
  180.0
}

fn calendar_default_header_height()
-> f64 {
  40.0
}

fn calendar_default_band_opacity()
-> f64 {
  0.12
}

fn calendar_one() -> f64 {
  1.0
}

fn default_event_color(
  event_type: EventType
) -> &'static str {
  match event_type {
    | EventType::AseanMinisterial => {
      "#1f4e79"
    }
    | EventType::AseanSom => "#2e75b6",
    | EventType::AseanSummit => {
      "#0b2545"
    }
    | EventType::AseanWorkingGroup => {
      "#5b9bd5"
    }
    | EventType::NationalPolicy => {
      "#548235"
    }
    | EventType::RegionalConference => {
      "#c55a11"
    }
    | EventType::ProgrammeMilestone => {
      "#7030a0"
    }
    | EventType::InternalPlanning => {
      "#7f7f7f"
    }
  }
}

fn date_or_min(
  year: i32,
  month: u32,
  day: u32
) -> NaiveDate {
  NaiveDate::from_ymd_opt(
    year, month, day
  )
  .unwrap_or(NaiveDate::MIN)
}

impl Default for ProgrammeBounds {
  fn default() -> Self {
    Self {
      start: date_or_min(2026, 4, 1),
      end:   date_or_min(2029, 3, 31)
    }
  }
}

impl Default for UrgencyPolicy {
  fn default() -> Self {
    Self {
      lookahead_days:
        calendar_default_lookahead_days(
        )
    }
  }
}

impl Default for LayoutConfig {
  fn default() -> Self {
    Self {
      px_per_day:
        calendar_default_px_per_day(),
      min_timeline_width:
        calendar_default_min_timeline_width(
        ),
      lane_height:
        calendar_default_lane_height(),
      bar_height:
        calendar_default_bar_height(),
      min_bar_width:
        calendar_default_min_bar_width(),
      label_width:
        calendar_default_label_width(),
      header_height:
        calendar_default_header_height()
    }
  }
}

impl MarkerStyle {
  fn solid(
    color: &str,
    width: f64
  ) -> Self {
    Self {
      color: color.to_string(),
      width,
      dash: None,
      opacity: 1.0,
      label: None
    }
  }

  fn dashed(
    color: &str,
    dash: &str,
    label: &str
  ) -> Self {
    Self {
      color:   color.to_string(),
      width:   1.5,
      dash:    Some(dash.to_string()),
      opacity: 0.9,
      label:   Some(label.to_string())
    }
  }
}

impl Default for MarkerStyles {
  fn default() -> Self {
    Self {
      fiscal_year:   MarkerStyle::dashed(
        "#c00000",
        "6 3",
        "UK FY"
      ),
      calendar_year: MarkerStyle::dashed(
        "#404040",
        "2 2",
        "Year"
      ),
      asean_year:    MarkerStyle::dashed(
        "#1f4e79",
        "1 4",
        "ASEAN year"
      ),
      month:         MarkerStyle {
        opacity: 0.35,
        ..MarkerStyle::solid(
          "#bfbfbf", 0.5
        )
      },
      reference:     MarkerStyle {
        label: Some("Today".to_string()),
        ..MarkerStyle::solid(
          "#e81123", 2.0
        )
      }
    }
  }
}

impl Default for BandStyle {
  fn default() -> Self {
    Self {
      fill:    "#ffd966".to_string(),
      opacity:
        calendar_default_band_opacity()
    }
  }
}

impl Default for CalendarConfig {
  fn default() -> Self {
    let mut config = Self {
      version:     1,
      timezone:
        calendar_default_timezone(),
      programme:
        ProgrammeBounds::default(),
      urgency:
        UrgencyPolicy::default(),
      layout:      LayoutConfig::default(),
      colors:      BTreeMap::new(),
      lanes:       BTreeMap::new(),
      markers:     MarkerStyles::default(),
      school_year: BandStyle::default(),
      presets:     vec![]
    };
    config.sanitize();
    config
  }
}

impl CalendarConfig {
  /// Configuration compiled into the
  /// binary; falls back to defaults if
  /// the embedded document is broken.
  pub fn embedded() -> Self {
    match Self::from_toml_str(
      CALENDAR_CONFIG_TOML,
      "calendar.toml"
    ) {
      | Ok(config) => config,
      | Err(err) => {
        error!(error = %err, "failed parsing calendar config; using defaults");
        Self::default()
      }
    }
  }

  #[tracing::instrument(skip(text))]
  pub fn from_toml_str(
    text: &str,
    source_name: &str
  ) -> Result<Self, CalendarError> {
    let mut config: Self =
      toml::from_str(text).map_err(
        |err| {
          CalendarError::parse(
            source_name,
            err
          )
        }
      )?;
    config.sanitize();
    info!(
      version = config.version,
      timezone = %config.timezone,
      presets = config.presets.len(),
      "loaded calendar config"
    );
    Ok(config)
  }

  fn sanitize(&mut self) {
    if self.programme.end
      < self.programme.start
    {
      warn!(
        start = %self.programme.start,
        end = %self.programme.end,
        "programme bounds inverted; using defaults"
      );
      self.programme =
        ProgrammeBounds::default();
    }

    if self.urgency.lookahead_days <= 0
    {
      self.urgency.lookahead_days =
        calendar_default_lookahead_days(
        );
    } else if self.urgency.lookahead_days
      > MAX_LOOKAHEAD_DAYS
    {
      warn!(
        lookahead_days =
          self.urgency.lookahead_days,
        max = MAX_LOOKAHEAD_DAYS,
        "urgency lookahead too large; capping"
      );
      self.urgency.lookahead_days =
        MAX_LOOKAHEAD_DAYS;
    }

    let defaults =
      LayoutConfig::default();
    let layout = &mut self.layout;
    if !(layout.px_per_day > 0.0) {
      layout.px_per_day =
        defaults.px_per_day;
    }
    if !(layout.min_timeline_width
      > 0.0)
    {
      layout.min_timeline_width =
        defaults.min_timeline_width;
    }
    if !(layout.lane_height > 0.0) {
      layout.lane_height =
        defaults.lane_height;
    }
    if !(layout.bar_height > 0.0)
      || layout.bar_height
        > layout.lane_height
    {
      layout.bar_height = layout
        .lane_height
        .min(defaults.bar_height);
    }
    if layout.min_bar_width < 1.0 {
      layout.min_bar_width =
        defaults.min_bar_width;
    }
    if layout.label_width < 0.0 {
      layout.label_width =
        defaults.label_width;
    }
    if layout.header_height < 0.0 {
      layout.header_height =
        defaults.header_height;
    }

    for event_type in EventType::ALL {
      self
        .colors
        .entry(event_type)
        .or_insert_with(|| {
          default_event_color(
            event_type
          )
          .to_string()
        });
    }
    for lane in Lane::ALL {
      self
        .lanes
        .entry(lane)
        .or_insert_with(|| {
          lane.default_label().to_string()
        });
    }

    let mut seen = BTreeSet::new();
    self.presets.retain(|preset| {
      let fresh =
        seen.insert(preset.id.clone());
      if !fresh {
        warn!(preset = %preset.id, "duplicate view preset id; dropping");
      }
      fresh
    });
  }

  pub fn color_for(
    &self,
    event_type: EventType
  ) -> &str {
    self
      .colors
      .get(&event_type)
      .map(String::as_str)
      .unwrap_or(FALLBACK_EVENT_COLOR)
  }

  pub fn lane_label(
    &self,
    lane: Lane
  ) -> &str {
    self
      .lanes
      .get(&lane)
      .map(String::as_str)
      .unwrap_or_else(|| {
        lane.default_label()
      })
  }

  pub fn preset(
    &self,
    id: &str
  ) -> Option<&ViewPreset> {
    self
      .presets
      .iter()
      .find(|preset| preset.id == id)
  }

  pub fn resolve_timezone(&self) -> Tz {
    parse_timezone(&self.timezone)
      .or_else(|| {
        parse_timezone(
          DEFAULT_CALENDAR_TIMEZONE
        )
      })
      .unwrap_or(chrono_tz::UTC)
  }

  /// Today's date in the programme
  /// timezone, the default reference
  /// date.
  pub fn today(&self) -> NaiveDate {
    Utc::now()
      .with_timezone(
        &self.resolve_timezone()
      )
      .date_naive()
  }
}

fn parse_timezone(
  raw: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => Some(tz),
    | Err(error) => {
      error!(
        timezone = %trimmed,
        error = %error,
        "invalid timezone id"
      );
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_config_has_programme_bounds_and_presets(
  ) {
    let config =
      CalendarConfig::embedded();
    assert_eq!(
      config.programme.start,
      date_or_min(2026, 4, 1)
    );
    assert_eq!(
      config.programme.end,
      date_or_min(2029, 3, 31)
    );
    assert_eq!(
      config.urgency.lookahead_days,
      90
    );

    let track = config
      .preset("cambodia-track")
      .expect("cambodia preset");
    assert_eq!(
      track.geography_filters,
      Some(BTreeSet::from([
        Geography::Cambodia,
        Geography::Regional
      ]))
    );
    assert_eq!(
      track.lanes,
      Some(BTreeSet::from([
        Lane::AseanGovernance,
        Lane::Cambodia
      ]))
    );
  }

  #[test]
  fn sanitize_repairs_bad_values() {
    let config =
      CalendarConfig::from_toml_str(
        r#"
timezone = "Not/AZone"

[programme]
start = "2029-01-01"
end = "2026-01-01"

[urgency]
lookahead_days = 0

[layout]
px_per_day = -1.0
bar_height = 500.0

[[preset]]
id = "dup"
label = "One"

[[preset]]
id = "dup"
label = "Two"
"#,
        "test"
      )
      .expect("parse config");

    assert_eq!(
      config.programme,
      ProgrammeBounds::default()
    );
    assert_eq!(
      config.urgency.lookahead_days,
      90
    );
    assert!(config.layout.px_per_day > 0.0);
    assert!(
      config.layout.bar_height
        <= config.layout.lane_height
    );
    assert_eq!(config.presets.len(), 1);
    assert_eq!(
      config.presets[0].label,
      "One"
    );
    assert_eq!(
      config.resolve_timezone(),
      chrono_tz::Asia::Phnom_Penh
    );
  }

  #[test]
  fn sanitize_caps_huge_lookahead() {
    let config =
      CalendarConfig::from_toml_str(
        "[urgency]\nlookahead_days = 9223372036854775807\n",
        "test"
      )
      .expect("parse config");
    assert_eq!(
      config.urgency.lookahead_days,
      MAX_LOOKAHEAD_DAYS
    );
  }

  #[test]
  fn every_type_and_lane_has_a_color_and_label(
  ) {
    let config = CalendarConfig::default();
    for event_type in EventType::ALL {
      assert!(
        config
          .color_for(event_type)
          .starts_with('#')
      );
    }
    for lane in Lane::ALL {
      assert!(
        !config.lane_label(lane).is_empty()
      );
    }
  }
}
