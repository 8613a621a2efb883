use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    ops::{Div, Mul},
};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Energy in kilowatt-hours, the unit the meter reports in.
#[repr(transparent)]
#[derive(
    Clone,
    Copy,
    Deserialize,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
pub struct KilowattHours(pub f64);

impl KilowattHours {
    pub const ZERO: Self = Self(0.0);

    /// Rounded to whole watt-hours, the precision the exports use.
    #[must_use]
    pub fn round_to_watt_hours(self) -> f64 {
        (self.0 * 1000.0).round() / 1000.0
    }
}

impl Display for KilowattHours {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{:.3} kWh", self.0)
    }
}

impl Debug for KilowattHours {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{:.3}kWh", self.0)
    }
}

impl PartialEq for KilowattHours {
    fn eq(&self, other: &Self) -> bool {
        OrderedFloat(self.0).eq(&OrderedFloat(other.0))
    }
}

impl Eq for KilowattHours {}

impl PartialOrd for KilowattHours {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for KilowattHours {
    fn cmp(&self, other: &Self) -> Ordering {
        OrderedFloat(self.0).cmp(&OrderedFloat(other.0))
    }
}

impl Mul<f64> for KilowattHours {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<f64> for KilowattHours {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl From<WattHours> for KilowattHours {
    fn from(value: WattHours) -> Self {
        Self(f64::from(value.0) / 1000.0)
    }
}

/// Energy in whole watt-hours, used for the goal thresholds and the own-use
/// capacity on the command line.
#[repr(transparent)]
#[derive(
    Clone,
    Copy,
    Deserialize,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Sub,
)]
pub struct WattHours(pub u32);

impl Display for WattHours {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{} Wh", self.0)
    }
}

impl Debug for WattHours {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}Wh", self.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_from_watt_hours() {
        assert_abs_diff_eq!(KilowattHours::from(WattHours(100)).0, 0.1);
        assert_abs_diff_eq!(KilowattHours::from(WattHours(50)).0, 0.05);
    }

    #[test]
    fn test_ordering() {
        assert!(KilowattHours(0.15) >= KilowattHours(0.1));
        assert!(KilowattHours(-0.1) < KilowattHours::ZERO);
        assert_eq!(
            KilowattHours(0.2).max(KilowattHours(0.1)),
            KilowattHours(0.2),
        );
    }

    #[test]
    fn test_round_to_watt_hours() {
        assert_abs_diff_eq!(KilowattHours(1.234_56).round_to_watt_hours(), 1.235);
        assert_abs_diff_eq!(KilowattHours(0.1 + 0.2).round_to_watt_hours(), 0.3);
    }

    #[test]
    fn test_parse() {
        assert_eq!("0.05".parse::<KilowattHours>().unwrap(), KilowattHours(0.05));
        assert_eq!("150".parse::<WattHours>().unwrap(), WattHours(150));
    }

    #[test]
    fn test_sum() {
        let total: KilowattHours =
            [KilowattHours(1.0), KilowattHours(0.5)].into_iter().sum();
        assert_abs_diff_eq!(total.0, 1.5);
    }
}
