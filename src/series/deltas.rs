use std::ops::Sub;

use itertools::Itertools;

impl<T> Deltas for T where T: ?Sized {}

pub trait Deltas {
    /// Backward difference of a cumulative series: each value becomes the
    /// difference to its successor, keyed at the leading key. The final
    /// point has no successor and is dropped.
    fn deltas<K, V>(self) -> impl Iterator<Item = (K, <V as Sub>::Output)>
    where
        Self: Iterator<Item = (K, V)> + Sized,
        K: Clone,
        V: Clone + Sub,
    {
        self.tuple_windows()
            .map(|((key, from_value), (_, to_value))| (key, to_value - from_value))
    }
}
