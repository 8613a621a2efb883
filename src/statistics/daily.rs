use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{quantity::KilowattHours, statistics::hourly::HourlyProduction};

/// Energy produced within one calendar day.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DailyProduction {
    pub date: NaiveDate,
    pub energy: KilowattHours,
}

impl DailyProduction {
    /// Sum hourly production per calendar day.
    ///
    /// The result covers every day between the first and the last observed
    /// one. Days without a single record carry zero, so the date range never
    /// has gaps.
    pub fn aggregate(hourly: &[HourlyProduction]) -> Vec<Self> {
        let mut totals: BTreeMap<NaiveDate, KilowattHours> = BTreeMap::new();
        for record in hourly {
            *totals.entry(record.hour.date_naive()).or_insert(KilowattHours::ZERO) +=
                record.energy;
        }
        let (Some((&first, _)), Some((&last, _))) =
            (totals.first_key_value(), totals.last_key_value())
        else {
            return Vec::new();
        };
        first
            .iter_days()
            .take_while(|date| *date <= last)
            .map(|date| Self {
                date,
                energy: totals.get(&date).copied().unwrap_or(KilowattHours::ZERO),
            })
            .collect()
    }
}
