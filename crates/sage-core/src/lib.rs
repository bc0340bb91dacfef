pub mod aggregate;
pub mod api;
pub mod config;
pub mod details;
pub mod error;
pub mod event;
pub mod filter;
pub mod gantt;
pub mod lane;
pub mod pills;
pub mod school_year;
pub mod svg;
pub mod urgency;

pub use config::CalendarConfig;
pub use error::CalendarError;
pub use event::{
  CalendarEvent,
  EventCatalog
};
pub use filter::{
  AppliedFilters,
  FilterAction,
  FilterState
};
pub use gantt::{
  GanttLayout,
  layout_gantt
};
pub use school_year::SchoolCalendar;
