use std::{collections::BTreeMap, fmt::Debug};

use chrono::{Datelike, NaiveDate, Weekday};

use crate::{prelude::*, quantity::KilowattHours, statistics::daily::DailyProduction};

/// Energy produced within one ISO week or one calendar month.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PeriodProduction {
    pub starts_on: NaiveDate,
    pub total: KilowattHours,
    pub per_day_mean: KilowattHours,
}

impl PeriodProduction {
    /// Roll daily production up into ISO weeks, keyed by each week's Monday.
    ///
    /// Grouping is on the full ISO year-week pair: around New Year the same
    /// week number belongs to two different years.
    pub fn by_week(days: &[DailyProduction]) -> Result<Vec<Self>> {
        Self::bucket(
            days,
            |date| date.iso_week(),
            |week| NaiveDate::from_isoywd_opt(week.year(), week.week(), Weekday::Mon),
        )
    }

    /// Roll daily production up into calendar months, keyed by the first of
    /// each month.
    pub fn by_month(days: &[DailyProduction]) -> Result<Vec<Self>> {
        Self::bucket(
            days,
            |date| (date.year(), date.month()),
            |(year, month)| NaiveDate::from_ymd_opt(year, month, 1),
        )
    }

    /// The shared bucketing step: group by a calendar key, then resolve the
    /// key to the date the period starts on.
    ///
    /// The mean is taken over the days actually present in the bucket, so
    /// partial edge periods are not diluted.
    fn bucket<K: Copy + Ord + Debug>(
        days: &[DailyProduction],
        group_key: impl Fn(NaiveDate) -> K,
        starts_on: impl Fn(K) -> Option<NaiveDate>,
    ) -> Result<Vec<Self>> {
        let mut buckets: BTreeMap<K, (KilowattHours, u32)> = BTreeMap::new();
        for day in days {
            let (total, n_days) =
                buckets.entry(group_key(day.date)).or_insert((KilowattHours::ZERO, 0));
            *total += day.energy;
            *n_days += 1;
        }
        buckets
            .into_iter()
            .map(|(key, (total, n_days))| {
                let starts_on = starts_on(key)
                    .with_context(|| format!("failed to resolve the start of period {key:?}"))?;
                Ok(Self { starts_on, total, per_day_mean: total / f64::from(n_days) })
            })
            .collect()
    }
}
