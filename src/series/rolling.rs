use std::collections::VecDeque;

impl<T> Trailing for T where T: ?Sized {}

pub trait Trailing {
    /// Trailing rolling mean over up to `window` points. Near the start of
    /// the series the mean covers however many points are available, so the
    /// first value always equals the first input.
    fn trailing_mean(self, window: usize) -> impl Iterator<Item = f64>
    where
        Self: Iterator<Item = f64> + Sized,
    {
        assert!(window > 0);
        let mut tail = VecDeque::with_capacity(window);
        let mut sum = 0.0;
        self.map(move |value| {
            if tail.len() == window {
                sum -= tail.pop_front().unwrap_or_default();
            }
            tail.push_back(value);
            sum += value;

            #[allow(clippy::cast_precision_loss)]
            let n = tail.len() as f64;
            sum / n
        })
    }
}
