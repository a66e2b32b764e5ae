use core::{cmp::Ordering, hash::Hash};
use std::collections::HashMap;

pub trait ModeExt: Iterator {
    /// The most frequent item.
    ///
    /// Ties go to the smallest item under `cmp`.
    ///
    /// # Option
    ///
    /// Return [`None`] if the iterator is empty
    fn mode_by<F>(self, cmp: F) -> Option<Self::Item>
    where
        Self: Sized,
        Self::Item: Hash + Eq,
        F: Fn(&Self::Item, &Self::Item) -> Ordering,
    {
        let mut counts: HashMap<Self::Item, usize> = HashMap::new();
        for x in self {
            *counts.entry(x).or_default() += 1;
        }
        counts
            .into_iter()
            .min_by(|(a, a_count), (b, b_count)| b_count.cmp(a_count).then_with(|| cmp(a, b)))
            .map(|(x, _)| x)
    }
}
impl<T: Iterator> ModeExt for T {}
