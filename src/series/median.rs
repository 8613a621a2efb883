use std::cmp::Ordering;

use itertools::Itertools;

impl<T> Median for T where T: ?Sized {}

pub trait Median {
    #[must_use]
    fn median<V>(self) -> Option<V>
    where
        Self: Sized + Iterator<Item = V>,
        V: Copy + PartialOrd,
    {
        let mut values = self.collect_vec();
        if values.is_empty() {
            None
        } else {
            let index = values.len() / 2;
            Some(*values.select_nth_unstable_by(index, compare).1)
        }
    }
}

fn compare<V: PartialOrd>(lhs: &V, rhs: &V) -> Ordering {
    lhs.partial_cmp(rhs).unwrap()
}
