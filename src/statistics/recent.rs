use chrono::{NaiveDate, Timelike};

use crate::{quantity::KilowattHours, statistics::hourly::HourlyProduction};

/// One hour of the recent window, reshaped for the small-multiple chart.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RecentHour {
    pub date: NaiveDate,
    pub hour_of_day: u32,

    /// Whole days before the most recent observed day, zero for that day
    /// itself.
    pub days_past: u32,
    pub energy: KilowattHours,
}

impl RecentHour {
    /// Keep the last `days` calendar days of hourly production.
    ///
    /// The window is anchored at the most recent observed day, not at the
    /// wall clock, so a stale database snapshot keeps producing the same
    /// report.
    pub fn window(hourly: &[HourlyProduction], days: u32) -> Vec<Self> {
        let Some(last_date) = hourly.last().map(|record| record.hour.date_naive()) else {
            return Vec::new();
        };
        hourly
            .iter()
            .filter_map(|record| {
                let date = record.hour.date_naive();
                let days_past = u32::try_from((last_date - date).num_days()).ok()?;
                (days_past < days).then(|| Self {
                    date,
                    hour_of_day: record.hour.hour(),
                    days_past,
                    energy: record.energy,
                })
            })
            .collect()
    }
}
