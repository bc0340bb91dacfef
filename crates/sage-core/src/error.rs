use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalendarError {
  #[error(
    "failed to parse {source_name}: \
     {message}"
  )]
  Parse {
    source_name: String,
    message:     String
  },

  #[error("duplicate event id: {0}")]
  DuplicateEventId(String),

  #[error(
    "event {0} has no geography tags"
  )]
  EmptyGeography(String),

  #[error(
    "event {id} ends before it starts \
     ({start} > {end})"
  )]
  InvertedRange {
    id:    String,
    start: NaiveDate,
    end:   NaiveDate
  },

  #[error(
    "school-year period for \
     {country} {year} ends before it \
     starts"
  )]
  InvertedPeriod {
    country: String,
    year:    i32
  },

  #[error(
    "school-year period uses \
     non-focus geography {0}"
  )]
  NonFocusCountry(String)
}

impl CalendarError {
  pub(crate) fn parse(
    source_name: &str,
    err: impl std::fmt::Display
  ) -> Self {
    Self::Parse {
      source_name: source_name
        .to_string(),
      message:     err.to_string()
    }
  }
}
