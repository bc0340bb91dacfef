use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize
};

use crate::error::CalendarError;
use crate::event::Geography;

const SCHOOL_YEARS_TOML: &str =
  include_str!(
    "../assets/school_years.toml"
  );

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct SchoolYearPeriod {
  pub country:          Geography,
  pub year:             i32,
  pub in_session_start: NaiveDate,
  pub in_session_end:   NaiveDate,
  #[serde(default)]
  pub description:      Option<String>
}

impl SchoolYearPeriod {
  pub fn overlaps(
    &self,
    start: NaiveDate,
    end: NaiveDate
  ) -> bool {
    self.in_session_start <= end
      && self.in_session_end >= start
  }

  /// The part of this period that falls
  /// inside `[start, end]`.
  pub fn clip(
    &self,
    start: NaiveDate,
    end: NaiveDate
  ) -> Option<(NaiveDate, NaiveDate)> {
    if !self.overlaps(start, end) {
      return None;
    }
    Some((
      self.in_session_start.max(start),
      self.in_session_end.min(end)
    ))
  }
}

#[derive(Deserialize)]
struct SchoolYearFile {
  #[serde(rename = "period", default)]
  periods: Vec<SchoolYearPeriod>
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchoolCalendar {
  periods: Vec<SchoolYearPeriod>
}

impl SchoolCalendar {
  pub fn new(
    mut periods: Vec<SchoolYearPeriod>
  ) -> Result<Self, CalendarError> {
    for period in &periods {
      if !period
        .country
        .is_focus_country()
      {
        return Err(
          CalendarError::NonFocusCountry(
            period
              .country
              .as_key()
              .to_string()
          )
        );
      }
      if period.in_session_start
        > period.in_session_end
      {
        return Err(
          CalendarError::InvertedPeriod {
            country: period
              .country
              .label()
              .to_string(),
            year:    period.year
          }
        );
      }
    }
    periods.sort_by_key(|period| {
      (
        period.country,
        period.in_session_start
      )
    });
    Ok(Self {
      periods
    })
  }

  pub fn embedded()
  -> Result<Self, CalendarError> {
    Self::from_toml_str(
      SCHOOL_YEARS_TOML,
      "school_years.toml"
    )
  }

  pub fn from_toml_str(
    text: &str,
    source_name: &str
  ) -> Result<Self, CalendarError> {
    let file: SchoolYearFile =
      toml::from_str(text).map_err(
        |err| {
          CalendarError::parse(
            source_name,
            err
          )
        }
      )?;
    Self::new(file.periods)
  }

  pub fn periods_for(
    &self,
    country: Geography
  ) -> impl Iterator<Item = &SchoolYearPeriod>
  {
    self.periods.iter().filter(
      move |period| {
        period.country == country
      }
    )
  }

  /// Periods of `country` that overlap
  /// `[start, end]`, in date order.
  pub fn overlapping(
    &self,
    country: Geography,
    start: NaiveDate,
    end: NaiveDate
  ) -> Vec<&SchoolYearPeriod> {
    self
      .periods_for(country)
      .filter(|period| {
        period.overlaps(start, end)
      })
      .collect()
  }

  pub fn in_session(
    &self,
    country: Geography,
    day: NaiveDate
  ) -> bool {
    self
      .periods_for(country)
      .any(|period| {
        period.overlaps(day, day)
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn embedded_calendar_covers_every_focus_country(
  ) {
    let calendar =
      SchoolCalendar::embedded()
        .expect("embedded school years");
    for country in
      Geography::FOCUS_COUNTRIES
    {
      assert!(
        calendar
          .periods_for(country)
          .count()
          > 0,
        "{country:?} has no periods"
      );
    }
  }

  #[test]
  fn overlap_query_is_per_country() {
    let calendar =
      SchoolCalendar::embedded()
        .expect("embedded school years");
    let start = date(2026, 12, 1);
    let end = date(2026, 12, 31);

    let lao = calendar.overlapping(
      Geography::LaoPdr,
      start,
      end
    );
    assert!(!lao.is_empty());
    assert!(lao.iter().all(|period| {
      period.country == Geography::LaoPdr
    }));

    assert!(calendar.in_session(
      Geography::Philippines,
      date(2026, 9, 1)
    ));
    assert!(!calendar.in_session(
      Geography::Philippines,
      date(2026, 5, 1)
    ));
  }

  #[test]
  fn clip_limits_band_to_window() {
    let period = SchoolYearPeriod {
      country:          Geography::Cambodia,
      year:             2026,
      in_session_start: date(2026, 11, 2),
      in_session_end:   date(2027, 8, 20),
      description:      None
    };
    assert_eq!(
      period.clip(
        date(2027, 1, 1),
        date(2027, 3, 31)
      ),
      Some((
        date(2027, 1, 1),
        date(2027, 3, 31)
      ))
    );
    assert_eq!(
      period.clip(
        date(2026, 1, 1),
        date(2026, 6, 1)
      ),
      None
    );
  }

  #[test]
  fn rejects_regional_periods() {
    let period = SchoolYearPeriod {
      country:          Geography::Regional,
      year:             2026,
      in_session_start: date(2026, 1, 1),
      in_session_end:   date(2026, 6, 1),
      description:      None
    };
    assert!(matches!(
      SchoolCalendar::new(vec![period]),
      Err(CalendarError::NonFocusCountry(_))
    ));
  }
}
