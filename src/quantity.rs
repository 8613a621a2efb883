pub mod energy;

pub use self::energy::{KilowattHours, WattHours};
