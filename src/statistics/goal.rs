use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    prelude::*,
    quantity::{KilowattHours, WattHours},
    series::Trailing,
    statistics::hourly::HourlyProduction,
};

const TRAILING_WINDOW: usize = 7;

/// One day of the goal report: how many hours cleared the threshold.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GoalDay {
    pub date: NaiveDate,
    pub reached_hours: u32,

    /// 7-day trailing mean of the count, rounded to one decimal.
    pub trailing_mean: f64,
}

impl GoalDay {
    /// Count, per day, the hours that produced at least `threshold`.
    ///
    /// The resulting series is contiguous and always runs through the last
    /// observed day. When no hour at all clears the threshold, the result is
    /// a lone zero day rather than an error. Negative deltas from meter
    /// resets never qualify.
    pub fn analyze(hourly: &[HourlyProduction], threshold: WattHours) -> Vec<Self> {
        let Some(last_observed) = hourly.last().map(|record| record.hour.date_naive()) else {
            return Vec::new();
        };
        let minimum = KilowattHours::from(threshold);

        let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        for record in hourly {
            if record.energy >= minimum {
                *counts.entry(record.hour.date_naive()).or_insert(0) += 1;
            }
        }
        if counts.is_empty() {
            warn!(%threshold, "no hour ever reached the target");
        }
        // The report ends at the data's end even when the last days came up empty.
        counts.entry(last_observed).or_insert(0);

        let first = counts.first_key_value().map_or(last_observed, |(&date, _)| date);
        let last = counts.last_key_value().map_or(last_observed, |(&date, _)| date);
        let days: Vec<(NaiveDate, u32)> = first
            .iter_days()
            .take_while(|date| *date <= last)
            .map(|date| (date, counts.get(&date).copied().unwrap_or(0)))
            .collect();

        days.iter()
            .map(|(_, count)| f64::from(*count))
            .trailing_mean(TRAILING_WINDOW)
            .zip(&days)
            .map(|(mean, &(date, reached_hours))| Self {
                date,
                reached_hours,
                trailing_mean: (mean * 10.0).round() / 10.0,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono_tz::Europe::Berlin;
    use itertools::Itertools;

    use super::*;

    fn hour(date: NaiveDate, hour: u32, energy: f64) -> HourlyProduction {
        HourlyProduction {
            hour: date.and_hms_opt(hour, 0, 0).unwrap().and_local_timezone(Berlin).unwrap(),
            energy: KilowattHours(energy),
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, day).unwrap()
    }

    #[test]
    fn test_analyze_counts_qualifying_hours() {
        let hourly =
            [hour(date(1), 10, 0.05), hour(date(1), 11, 0.15), hour(date(1), 12, 0.02)];

        let at_100 = GoalDay::analyze(&hourly, WattHours(100));
        assert_eq!(at_100.len(), 1);
        assert_eq!(at_100[0].reached_hours, 1);

        let at_50 = GoalDay::analyze(&hourly, WattHours(50));
        assert_eq!(at_50[0].reached_hours, 2);
    }

    #[test]
    fn test_analyze_first_mean_equals_count() {
        let hourly =
            [hour(date(1), 10, 0.2), hour(date(1), 11, 0.2), hour(date(1), 12, 0.2)];
        let days = GoalDay::analyze(&hourly, WattHours(100));
        assert_abs_diff_eq!(days[0].trailing_mean, f64::from(days[0].reached_hours));
    }

    #[test]
    fn test_analyze_runs_through_the_last_observed_day() {
        // The only qualifying hour is on the 1st, yet data continues to the 3rd.
        let days =
            GoalDay::analyze(&[hour(date(1), 12, 0.5), hour(date(3), 12, 0.01)], WattHours(100));

        assert_eq!(days.iter().map(|day| day.date).collect_vec(), vec![
            date(1),
            date(2),
            date(3),
        ]);
        assert_eq!(days.iter().map(|day| day.reached_hours).collect_vec(), vec![1, 0, 0]);
        // 1, (1 + 0) / 2, (1 + 0 + 0) / 3 rounded to one decimal.
        assert_eq!(days.iter().map(|day| day.trailing_mean).collect_vec(), vec![
            1.0, 0.5, 0.3,
        ]);
    }

    #[test]
    fn test_analyze_zero_matches_is_not_an_error() {
        let days = GoalDay::analyze(&[hour(date(1), 12, 0.01)], WattHours(100));
        assert_eq!(days, vec![GoalDay {
            date: date(1),
            reached_hours: 0,
            trailing_mean: 0.0,
        }]);
    }

    #[test]
    fn test_analyze_ignores_meter_resets() {
        let days = GoalDay::analyze(&[hour(date(1), 12, -98.0)], WattHours(0));
        assert_eq!(days[0].reached_hours, 0);
    }

    #[test]
    fn test_analyze_empty() {
        assert!(GoalDay::analyze(&[], WattHours(100)).is_empty());
    }
}
