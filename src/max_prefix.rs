//! A sequence of weighted intervals answering maximum-prefix-sum queries.
//!
//! Intervals are kept in order of their `start`. Reading that order left to right, each
//! interval adds its weight to a running total; the tree maintains, for the whole sequence,
//! the largest running total ever reached and the `start` of the interval at which it is first
//! reached. Updates are O(log n) and the query is O(1).

use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;

use log::debug;

use crate::augment::Augmentation;
use crate::raw::{Handle, RawIter, RawRbTree};

/// A half-open interval `[start, end)` carrying a signed weight.
///
/// Intervals are ordered in a [`MaxPrefixTree`] by `start` alone. Weights are 32-bit while
/// sums are 64-bit, so no sequence a tree can hold overflows its running total.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
    pub weight: i32,
}

impl Interval {
    #[must_use]
    pub const fn new(start: i64, end: i64, weight: i32) -> Self {
        Self { start, end, weight }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
struct Prefix {
    value: i64,
    position: i64,
}

/// The aggregate of a run of intervals: total weight, and the best prefix.
///
/// Returned by [`MaxPrefixTree::query`].
///
/// # Examples
///
/// ```
/// use augmented_rbtree::{Interval, MaxPrefixTree};
///
/// let tree: MaxPrefixTree = [
///     Interval::new(0, 5, 10),
///     Interval::new(5, 10, -5),
///     Interval::new(10, 15, 8),
///     Interval::new(15, 20, -3),
/// ]
/// .into_iter()
/// .collect();
///
/// let summary = tree.query();
/// // Running totals are 10, 5, 13, 10.
/// assert_eq!(summary.sum(), 10);
/// assert_eq!(summary.best_prefix(), Some(13));
/// assert_eq!(summary.best_position(), Some(10));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Summary {
    sum: i64,
    // None plays the part of negative infinity: it loses every comparison.
    best: Option<Prefix>,
}

impl Summary {
    /// The summary of an empty sequence: zero sum and no best prefix.
    pub const EMPTY: Self = Self { sum: 0, best: None };

    /// Total weight of every interval.
    #[must_use]
    pub const fn sum(&self) -> i64 {
        self.sum
    }

    /// Largest running total over all non-empty prefixes, or `None` for an empty sequence.
    #[must_use]
    pub fn best_prefix(&self) -> Option<i64> {
        self.best.map(|prefix| prefix.value)
    }

    /// `start` of the interval closing the best prefix. When several prefixes reach the best
    /// value, the shortest one wins. `None` for an empty sequence.
    #[must_use]
    pub fn best_position(&self) -> Option<i64> {
        self.best.map(|prefix| prefix.position)
    }
}

impl Default for Summary {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Maximum-prefix-sum augmentation over intervals ordered by `start`.
pub(crate) struct MaxPrefix;

impl Augmentation for MaxPrefix {
    type Item = Interval;
    type Summary = Summary;

    fn compare(a: &Interval, b: &Interval) -> Ordering {
        a.start.cmp(&b.start)
    }

    fn empty() -> Summary {
        Summary::EMPTY
    }

    fn recompute(item: &Interval, left: &Summary, right: &Summary) -> Summary {
        let at_item = left.sum + i64::from(item.weight);

        // Candidates in sequence order; only a strict improvement replaces an earlier one.
        let mut best = left.best;
        if best.is_none_or(|prefix| at_item > prefix.value) {
            best = Some(Prefix {
                value: at_item,
                position: item.start,
            });
        }
        if let (Some(current), Some(right_best)) = (best, right.best) {
            let through = at_item + right_best.value;
            if through > current.value {
                best = Some(Prefix {
                    value: through,
                    position: right_best.position,
                });
            }
        }

        Summary {
            sum: at_item + right.sum,
            best,
        }
    }
}

/// An ordered collection of weighted intervals with an O(1) maximum-prefix-sum query.
///
/// Each `start` may appear at most once. Removal matches an interval on both `start` and
/// `end`.
///
/// # Examples
///
/// ```
/// use augmented_rbtree::{Interval, MaxPrefixTree};
///
/// let mut tree = MaxPrefixTree::new();
/// assert_eq!(tree.query().best_position(), None);
///
/// tree.insert(Interval::new(10, 15, 8));
/// tree.insert(Interval::new(0, 5, 10));
/// tree.insert(Interval::new(5, 10, -5));
/// assert_eq!(tree.query().best_prefix(), Some(13));
/// assert_eq!(tree.query().best_position(), Some(10));
///
/// tree.remove(&Interval::new(10, 15, 8));
/// assert_eq!(tree.query().best_prefix(), Some(10));
/// assert_eq!(tree.total_sum(), 5);
/// ```
pub struct MaxPrefixTree {
    raw: RawRbTree<MaxPrefix>,
}

impl MaxPrefixTree {
    /// Makes a new, empty `MaxPrefixTree`.
    #[must_use]
    pub fn new() -> Self {
        Self { raw: RawRbTree::new() }
    }

    /// Creates an empty tree with room for at least `capacity` intervals before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: RawRbTree::with_capacity(capacity),
        }
    }

    /// Returns the number of intervals in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree holds no intervals.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes every interval.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    fn find(&self, start: i64) -> Option<Handle> {
        self.raw.search_by(|item| start.cmp(&item.start))
    }

    /// Returns the interval beginning at `start`, if any.
    #[must_use]
    pub fn get(&self, start: i64) -> Option<&Interval> {
        self.find(start).map(|handle| self.raw.item(handle))
    }

    /// Adds an interval.
    ///
    /// Returns `false`, leaving the tree unchanged, if an interval with the same `start` is
    /// already present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, interval: Interval) -> bool {
        if self.find(interval.start).is_some() {
            debug!("max-prefix tree: interval starting at {} already present", interval.start);
            return false;
        }
        self.raw.insert(interval);
        true
    }

    /// Removes the interval with the same `start` and `end` as `interval`.
    ///
    /// Returns whether an interval was removed; a miss is a no-op.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, interval: &Interval) -> bool {
        match self.find(interval.start) {
            Some(handle) if self.raw.item(handle).end == interval.end => {
                self.raw.remove(handle);
                true
            }
            _ => {
                debug!(
                    "max-prefix tree: no interval [{}, {}) to remove",
                    interval.start, interval.end
                );
                false
            }
        }
    }

    /// Returns the aggregate of the whole sequence.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn query(&self) -> Summary {
        *self.raw.root_summary()
    }

    /// Returns the total weight of every interval; 0 when empty.
    #[must_use]
    pub fn total_sum(&self) -> i64 {
        self.raw.root_summary().sum()
    }

    /// Gets an iterator over the intervals in order of `start`.
    pub fn iter(&self) -> Iter<'_> {
        Iter { inner: self.raw.iter() }
    }
}

/// An iterator over the intervals of a [`MaxPrefixTree`], in order of `start`.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Clone)]
pub struct Iter<'a> {
    inner: RawIter<'a, MaxPrefix>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Interval;

    fn next(&mut self) -> Option<&'a Interval> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Iter<'_> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl FusedIterator for Iter<'_> {}

impl Default for MaxPrefixTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MaxPrefixTree {
    fn clone(&self) -> Self {
        Self { raw: self.raw.clone() }
    }
}

impl fmt::Debug for MaxPrefixTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl FromIterator<Interval> for MaxPrefixTree {
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl Extend<Interval> for MaxPrefixTree {
    fn extend<I: IntoIterator<Item = Interval>>(&mut self, iter: I) {
        for interval in iter {
            self.insert(interval);
        }
    }
}

impl<'a> IntoIterator for &'a MaxPrefixTree {
    type Item = &'a Interval;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Folds intervals in order, keeping the first prefix to reach each new maximum.
    fn brute_force<'a>(intervals: impl IntoIterator<Item = &'a Interval>) -> Summary {
        let mut summary = Summary::EMPTY;
        for interval in intervals {
            summary.sum += i64::from(interval.weight);
            if summary.best.is_none_or(|prefix| summary.sum > prefix.value) {
                summary.best = Some(Prefix {
                    value: summary.sum,
                    position: interval.start,
                });
            }
        }
        summary
    }

    fn assert_every_node_matches_brute_force(tree: &MaxPrefixTree) {
        tree.raw.validate_invariants();
        for handle in tree.raw.handles() {
            let items = tree.raw.subtree_items(Some(handle));
            assert_eq!(*tree.raw.summary(Some(handle)), brute_force(items));
        }
    }

    #[test]
    fn recompute_prefers_earliest_candidate_on_ties() {
        let left = brute_force(&[Interval::new(0, 1, 4)]);
        let right = brute_force(&[Interval::new(2, 3, 4)]);

        let summary = MaxPrefix::recompute(&Interval::new(1, 2, 0), &left, &right);
        assert_eq!(summary.best_prefix(), Some(8));
        assert_eq!(summary.best_position(), Some(2));

        // The prefix ending at the node ties the left best; the left one wins.
        let summary = MaxPrefix::recompute(&Interval::new(1, 2, 0), &left, &Summary::EMPTY);
        assert_eq!(summary.best_prefix(), Some(4));
        assert_eq!(summary.best_position(), Some(0));

        let negative = brute_force(&[Interval::new(2, 3, 0)]);
        let summary = MaxPrefix::recompute(&Interval::new(1, 2, 3), &Summary::EMPTY, &negative);
        assert_eq!(summary.best_position(), Some(1));
    }

    #[test]
    fn all_negative_weights_pick_the_first_interval() {
        let tree: MaxPrefixTree = (0..10).map(|i| Interval::new(i, i + 1, -1 - i as i32)).collect();
        assert_eq!(tree.query().best_prefix(), Some(-1));
        assert_eq!(tree.query().best_position(), Some(0));
        assert_every_node_matches_brute_force(&tree);
    }

    #[test]
    fn extreme_weights_do_not_overflow() {
        let mut tree = MaxPrefixTree::new();
        for start in 0..1_000 {
            tree.insert(Interval::new(start, start + 1, i32::MAX));
        }
        tree.insert(Interval::new(1_000, 1_001, 1));
        let top = 1_000 * i64::from(i32::MAX) + 1;
        assert_eq!(tree.query().sum(), top);
        assert_eq!(tree.query().best_prefix(), Some(top));
        assert_eq!(tree.query().best_position(), Some(1_000));

        for start in 1_001..2_001 {
            tree.insert(Interval::new(start, start + 1, i32::MIN));
        }
        assert_eq!(tree.total_sum(), top + 1_000 * i64::from(i32::MIN));
        assert_eq!(tree.query().best_prefix(), Some(top));
        assert_every_node_matches_brute_force(&tree);
    }

    #[test]
    fn remove_requires_matching_end() {
        let mut tree = MaxPrefixTree::new();
        tree.insert(Interval::new(0, 5, 10));
        assert!(!tree.remove(&Interval::new(0, 4, 10)));
        assert!(!tree.remove(&Interval::new(1, 5, 10)));
        assert!(tree.remove(&Interval::new(0, 5, 99)));
        assert!(tree.is_empty());
        assert_eq!(tree.query(), Summary::EMPTY);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i64, i32),
        Remove(i64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i64..200, -50i32..50).prop_map(|(start, weight)| Op::Insert(start, weight)),
            2 => (0i64..200).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn every_node_summary_matches_brute_force(ops in prop::collection::vec(op_strategy(), 0..300)) {
            let mut tree = MaxPrefixTree::new();
            for op in ops {
                match op {
                    Op::Insert(start, weight) => {
                        tree.insert(Interval::new(start, start + 1, weight));
                    }
                    Op::Remove(start) => {
                        tree.remove(&Interval::new(start, start + 1, 0));
                    }
                }
                assert_every_node_matches_brute_force(&tree);
                prop_assert_eq!(tree.query(), brute_force(tree.iter()));
            }
        }
    }
}
