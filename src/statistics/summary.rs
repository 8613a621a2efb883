use crate::{
    quantity::KilowattHours,
    statistics::{daily::DailyProduction, hourly::HourlyProduction},
};

/// Headline numbers over the whole history, logged and used for chart axis
/// scaling.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct ProductionSummary {
    pub total: KilowattHours,
    pub max_hour: KilowattHours,
    pub max_day: KilowattHours,

    /// Energy consumed in the house, clipped per hour at the own-use capacity.
    pub used: KilowattHours,

    /// Energy beyond the own-use capacity, fed into the grid.
    pub fed_in: KilowattHours,
}

impl ProductionSummary {
    pub fn new(
        hourly: &[HourlyProduction],
        daily: &[DailyProduction],
        own_use_capacity: KilowattHours,
    ) -> Self {
        let (used, fed_in) = hourly.iter().fold(
            (KilowattHours::ZERO, KilowattHours::ZERO),
            |(used, fed_in), record| {
                let own_use = record.energy.min(own_use_capacity);
                (used + own_use, fed_in + (record.energy - own_use))
            },
        );
        Self {
            total: daily.iter().map(|day| day.energy).sum(),
            max_hour: hourly
                .iter()
                .map(|record| record.energy)
                .max()
                .unwrap_or(KilowattHours::ZERO),
            max_day: daily.iter().map(|day| day.energy).max().unwrap_or(KilowattHours::ZERO),
            used,
            fed_in,
        }
    }
}
