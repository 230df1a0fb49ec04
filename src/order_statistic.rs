//! An ordered set with O(log n) selection and ranking.

use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use log::debug;

use crate::Error;
use crate::augment::Augmentation;
use crate::raw::{Handle, RawIter, RawRbTree};

/// Subtree-size augmentation: every node counts the nodes below it, itself included.
pub(crate) struct OrderStatistic<T>(PhantomData<T>);

impl<T: Ord> Augmentation for OrderStatistic<T> {
    type Item = T;
    type Summary = usize;

    fn compare(a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }

    fn empty() -> usize {
        0
    }

    fn recompute(_: &T, left: &usize, right: &usize) -> usize {
        1 + left + right
    }
}

/// An ordered set based on a red-black tree augmented with subtree sizes.
///
/// Besides the usual set operations it answers two positional queries in O(log n):
/// [`select`](OrderStatisticTree::select) returns the k-th smallest value and
/// [`rank`](OrderStatisticTree::rank) returns the position of a value. Both positions are
/// 1-indexed.
///
/// It is a logic error for a value to be modified in such a way that its ordering relative to
/// any other value, as determined by the [`Ord`] trait, changes while it is in the set.
///
/// # Examples
///
/// ```
/// use augmented_rbtree::{Error, OrderStatisticTree};
///
/// let mut set = OrderStatisticTree::new();
/// for value in [15, 10, 20, 8, 12, 16, 25] {
///     set.insert(value);
/// }
///
/// assert_eq!(set.select(1), Ok(&8));
/// assert_eq!(set.select(7), Ok(&25));
/// assert_eq!(set.rank(&20), Ok(6));
///
/// assert_eq!(set.select(8), Err(Error::OutOfRange { k: 8, len: 7 }));
/// assert_eq!(set.rank(&11), Err(Error::NotFound));
///
/// set.remove(&15);
/// assert_eq!(set.select(4), Ok(&16));
/// ```
pub struct OrderStatisticTree<T: Ord> {
    raw: RawRbTree<OrderStatistic<T>>,
}

impl<T: Ord> OrderStatisticTree<T> {
    /// Makes a new, empty `OrderStatisticTree`.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub fn new() -> Self {
        Self { raw: RawRbTree::new() }
    }

    /// Creates an empty set with room for at least `capacity` values before reallocating.
    ///
    /// # Examples
    ///
    /// ```
    /// use augmented_rbtree::OrderStatisticTree;
    ///
    /// let set: OrderStatisticTree<i32> = OrderStatisticTree::with_capacity(16);
    /// assert!(set.is_empty());
    /// assert!(set.capacity() >= 16);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: RawRbTree::with_capacity(capacity),
        }
    }

    /// Returns the number of values the set can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the number of values in the set.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the set contains no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the set, removing all values.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    fn find<Q>(&self, value: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search_by(|item| value.cmp(item.borrow()))
    }

    /// Returns the size of the subtree hanging off `handle`'s left side.
    fn left_size(&self, handle: Handle) -> usize {
        *self.raw.summary(self.raw.left(handle))
    }

    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. A value already present is left untouched
    /// and `false` is returned.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) -> bool {
        if self.find(&value).is_some() {
            debug!("order-statistic tree: ignoring duplicate insert ({} values)", self.len());
            return false;
        }
        self.raw.insert(value);
        true
    }

    /// Removes a value from the set. Returns whether the value was present.
    ///
    /// Removing an absent value is a no-op.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.take(value).is_some()
    }

    /// Removes and returns the value in the set, if any, that is equal to the given one.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(handle) = self.find(value) else {
            debug!("order-statistic tree: remove of absent value ignored ({} values)", self.len());
            return None;
        };
        Some(self.raw.remove(handle))
    }

    /// Returns `true` if the set contains an element equal to the value.
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.find(value).is_some()
    }

    /// Returns the `k`-th smallest value, counting from 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `k` is 0 or greater than [`len`](Self::len), including
    /// on an empty set.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn select(&self, k: usize) -> Result<&T, Error> {
        let len = self.len();
        if k == 0 || k > len {
            return Err(Error::OutOfRange { k, len });
        }

        let mut remaining = k;
        let mut cursor = self.raw.root();
        while let Some(handle) = cursor {
            // Position of `handle` within its own subtree.
            let here = self.left_size(handle) + 1;
            cursor = match remaining.cmp(&here) {
                Ordering::Equal => return Ok(self.raw.item(handle)),
                Ordering::Less => self.raw.left(handle),
                Ordering::Greater => {
                    remaining -= here;
                    self.raw.right(handle)
                }
            };
        }

        panic!("`OrderStatisticTree::select()` - subtree sizes disagree with len ({len})!");
    }

    /// Returns the 1-indexed position of `value` in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the value is not in the set.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn rank<Q>(&self, value: &Q) -> Result<usize, Error>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.find(value).ok_or(Error::NotFound)?;

        let mut rank = self.left_size(handle) + 1;
        let mut current = handle;
        while let Some(parent) = self.raw.parent(current) {
            // Coming up from the right, the parent and its left subtree all precede us.
            if self.raw.right(parent) == Some(current) {
                rank += self.left_size(parent) + 1;
            }
            current = parent;
        }
        Ok(rank)
    }

    /// Returns the smallest value, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first().map(|handle| self.raw.item(handle))
    }

    /// Returns the largest value, if any.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last().map(|handle| self.raw.item(handle))
    }

    /// Gets an iterator that visits the values in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use augmented_rbtree::OrderStatisticTree;
    ///
    /// let set = OrderStatisticTree::from([3, 1, 2]);
    /// let mut iter = set.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next_back(), Some(&3));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { inner: self.raw.iter() }
    }
}

/// An iterator over the values of an [`OrderStatisticTree`], in ascending order.
///
/// This `struct` is created by the [`iter`](OrderStatisticTree::iter) method.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: Ord> {
    inner: RawIter<'a, OrderStatistic<T>>,
}

impl<'a, T: Ord> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: Ord> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T: Ord> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T: Ord> FusedIterator for Iter<'_, T> {}

impl<T: Ord> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Ord> Default for OrderStatisticTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> Clone for OrderStatisticTree<T> {
    fn clone(&self) -> Self {
        Self { raw: self.raw.clone() }
    }
}

impl<T: Ord + fmt::Debug> fmt::Debug for OrderStatisticTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> PartialEq for OrderStatisticTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Ord> Eq for OrderStatisticTree<T> {}

impl<T: Ord> FromIterator<T> for OrderStatisticTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for OrderStatisticTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for OrderStatisticTree<T> {
    /// Converts a `[T; N]` into an `OrderStatisticTree<T>`; duplicates are dropped.
    fn from(arr: [T; N]) -> Self {
        let mut set = Self::with_capacity(N);
        set.extend(arr);
        set
    }
}

impl<'a, T: Ord> IntoIterator for &'a OrderStatisticTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..500).prop_map(Op::Insert),
            2 => (0i32..500).prop_map(Op::Remove),
        ]
    }

    #[test]
    fn sizes_track_every_mutation() {
        let mut set = OrderStatisticTree::new();
        for value in [15, 10, 20, 8, 12, 16, 25, 11, 13] {
            set.insert(value);
            set.raw.validate_invariants();
        }
        for value in [15, 8, 25, 99, 10] {
            set.remove(&value);
            set.raw.validate_invariants();
        }
        assert_eq!(*set.raw.root_summary(), set.len());
    }

    #[test]
    fn failed_select_leaves_set_untouched() {
        let set = OrderStatisticTree::from([3, 1, 2]);
        let before = set.clone();
        assert_eq!(set.select(0), Err(Error::OutOfRange { k: 0, len: 3 }));
        assert_eq!(set.select(4), Err(Error::OutOfRange { k: 4, len: 3 }));
        assert_eq!(set, before);
        set.raw.validate_invariants();
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn size_invariant_holds_after_operations(ops in prop::collection::vec(op_strategy(), 0..500)) {
            let mut set = OrderStatisticTree::new();
            for op in ops {
                match op {
                    Op::Insert(value) => {
                        set.insert(value);
                    }
                    Op::Remove(value) => {
                        set.remove(&value);
                    }
                }
                set.raw.validate_invariants();
            }
        }

        #[test]
        fn select_and_rank_are_inverse(values in prop::collection::vec(-1000i32..1000, 1..300)) {
            let set: OrderStatisticTree<i32> = values.into_iter().collect();
            let sorted: Vec<i32> = set.iter().copied().collect();

            for (index, expected) in sorted.iter().enumerate() {
                let selected = set.select(index + 1);
                prop_assert_eq!(selected, Ok(expected));
                prop_assert_eq!(set.rank(expected), Ok(index + 1));
            }
        }
    }
}
