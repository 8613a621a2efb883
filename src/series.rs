mod deltas;
mod median;
mod rolling;

pub use self::{deltas::Deltas, median::Median, rolling::Trailing};
