//! Counting-out (Josephus) permutations.
//!
//! `n` members numbered `0..n` stand in a circle. Counting starts at member 0; every `m`-th
//! surviving member is eliminated, and counting resumes with the member after them. The
//! elimination order is a permutation of `0..n`.
//!
//! [`generate`] runs in O(n log n) by keeping the survivors in an [`OrderStatisticTree`] and
//! selecting each victim by position. [`generate_naive`] walks a circle of liveness flags in
//! O(n·m) and exists to cross-check it.

use alloc::vec;
use alloc::vec::Vec;

use log::debug;

use crate::{Error, OrderStatisticTree};

fn check(n: usize, m: usize) -> Result<(), Error> {
    if n == 0 || m == 0 {
        return Err(Error::InvalidInput { n, m });
    }
    Ok(())
}

/// Returns the elimination order for `n` members eliminating every `m`-th survivor.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `n` or `m` is 0.
///
/// # Examples
///
/// ```
/// use augmented_rbtree::josephus;
///
/// assert_eq!(josephus::generate(7, 3), Ok(vec![2, 5, 1, 6, 4, 0, 3]));
/// assert!(josephus::generate(0, 3).is_err());
/// ```
///
/// # Complexity
///
/// O(n log n)
pub fn generate(n: usize, m: usize) -> Result<Vec<usize>, Error> {
    check(n, m)?;
    debug!("josephus: generating permutation for n={n}, m={m}");

    let mut survivors = OrderStatisticTree::with_capacity(n);
    survivors.extend(0..n);

    let mut order = Vec::with_capacity(n);
    // 0-based position, among the survivors, where counting resumes.
    let mut cursor = 0;

    while !survivors.is_empty() {
        let len = survivors.len();
        cursor = (cursor + (m - 1) % len) % len;

        let victim = *survivors.select(cursor + 1)?;
        order.push(victim);
        survivors.remove(&victim);

        // The member after the victim slid into `cursor`; wrap if the victim was last.
        if !survivors.is_empty() {
            cursor %= survivors.len();
        }
    }

    Ok(order)
}

/// Returns the same order as [`generate`] by stepping around a circle of liveness flags.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `n` or `m` is 0.
///
/// # Complexity
///
/// O(n·m)
pub fn generate_naive(n: usize, m: usize) -> Result<Vec<usize>, Error> {
    check(n, m)?;

    let mut alive = vec![true; n];
    let mut order = Vec::with_capacity(n);
    let mut current = 0;

    while order.len() < n {
        let mut counted = 0;
        loop {
            if alive[current] {
                counted += 1;
                if counted == m {
                    break;
                }
            }
            current = (current + 1) % n;
        }

        alive[current] = false;
        order.push(current);

        if order.len() < n {
            while !alive[current] {
                current = (current + 1) % n;
            }
        }
    }

    Ok(order)
}

/// Returns whether [`generate`] and [`generate_naive`] agree for `(n, m)`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `n` or `m` is 0.
pub fn verify(n: usize, m: usize) -> Result<bool, Error> {
    Ok(generate(n, m)? == generate_naive(n, m)?)
}
