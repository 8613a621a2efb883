//! The reshaping pipeline: cumulative readings in, calendar-aligned
//! production tables out.

pub mod daily;
pub mod goal;
pub mod hourly;
pub mod period;
pub mod recent;
pub mod summary;

pub use self::{
    daily::DailyProduction,
    goal::GoalDay,
    hourly::HourlyProduction,
    period::PeriodProduction,
    recent::RecentHour,
    summary::ProductionSummary,
};
