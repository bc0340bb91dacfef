mod country_summary;
mod event_drawer;
mod filter_panel;
mod filter_pills;
mod gantt_chart;
mod legend;
mod notice;
mod toolbar;
mod urgency_banner;

pub use country_summary::CountrySummary;
pub use event_drawer::EventDrawer;
pub use filter_panel::FilterPanel;
pub use filter_pills::FilterPills;
pub use gantt_chart::GanttChart;
pub use legend::Legend;
pub use notice::Notice;
pub use toolbar::Toolbar;
pub use urgency_banner::UrgencyBanner;
