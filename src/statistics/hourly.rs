use chrono::DateTime;
use chrono_tz::Tz;

use crate::{db::Observation, quantity::KilowattHours, series::Deltas};

/// Energy produced within one wall-clock hour.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HourlyProduction {
    pub hour: DateTime<Tz>,
    pub energy: KilowattHours,
}

impl HourlyProduction {
    /// Turn cumulative meter readings into per-hour production.
    ///
    /// Each reading is compared to its successor in insertion order, so the
    /// final reading yields no record. A meter reset shows up as a negative
    /// delta and is passed through as is.
    pub fn derive(
        observations: impl IntoIterator<Item = Observation>,
        time_zone: Tz,
    ) -> Vec<Self> {
        observations
            .into_iter()
            .map(|observation| (observation.read_at.with_timezone(&time_zone), observation.meter))
            .deltas()
            .map(|(hour, energy)| Self { hour, energy })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::Timelike;
    use chrono_tz::Europe::Berlin;

    use super::*;

    fn observation(timestamp: i64, meter: f64) -> Observation {
        Observation {
            read_at: DateTime::from_timestamp(timestamp, 0).unwrap(),
            meter: KilowattHours(meter),
        }
    }

    #[test]
    fn test_derive() {
        let hourly = HourlyProduction::derive(
            [observation(0, 100.0), observation(3600, 100.05), observation(7200, 100.20)],
            Berlin,
        );

        assert_eq!(hourly.len(), 2);
        assert_abs_diff_eq!(hourly[0].energy.0, 0.05, epsilon = 1e-9);
        assert_abs_diff_eq!(hourly[1].energy.0, 0.15, epsilon = 1e-9);
        // The epoch is 01:00 in Berlin.
        assert_eq!(hourly[0].hour.hour(), 1);
        assert_eq!(hourly[1].hour.hour(), 2);
    }

    #[test]
    fn test_meter_reset_yields_negative_delta() {
        let hourly =
            HourlyProduction::derive([observation(0, 100.0), observation(3600, 2.0)], Berlin);
        assert_eq!(hourly.len(), 1);
        assert_abs_diff_eq!(hourly[0].energy.0, -98.0);
    }

    #[test]
    fn test_too_few_observations() {
        assert!(HourlyProduction::derive([], Berlin).is_empty());
        assert!(HourlyProduction::derive([observation(0, 100.0)], Berlin).is_empty());
    }
}
