//! Augmented red-black trees for Rust.
//!
//! This crate provides two collections built on one generic red-black engine whose nodes carry
//! a summary of their subtree, kept current through every insertion, removal and rotation:
//!
//! - [`OrderStatisticTree`] - an ordered set with O(log n)
//!   [`select`](OrderStatisticTree::select) (k-th smallest) and
//!   [`rank`](OrderStatisticTree::rank) (position of a value)
//! - [`MaxPrefixTree`] - a sequence of weighted intervals ordered by start, answering
//!   "which prefix has the largest total weight, and where does it end" in O(1)
//!
//! The [`josephus`] module uses the order-statistic tree to generate counting-out
//! (Josephus) permutations in O(n log n).
//!
//! # Example
//!
//! ```
//! use augmented_rbtree::{Interval, MaxPrefixTree, OrderStatisticTree};
//!
//! let set = OrderStatisticTree::from([15, 10, 20, 8, 12, 16, 25]);
//! assert_eq!(set.select(4), Ok(&15)); // 1-indexed
//! assert_eq!(set.rank(&20), Ok(6));
//!
//! let mut profile = MaxPrefixTree::new();
//! profile.insert(Interval::new(0, 5, 10));
//! profile.insert(Interval::new(5, 10, -5));
//! profile.insert(Interval::new(10, 15, 8));
//!
//! let summary = profile.query();
//! assert_eq!(summary.sum(), 13);
//! assert_eq!(summary.best_prefix(), Some(13));
//! assert_eq!(summary.best_position(), Some(10));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Arena storage** - Nodes live in one vector and link by index; removed slots are reused
//! - **O(log n) updates** - At most two rotations per insertion and three per removal
//!
//! # Implementation
//!
//! Both collections are thin instantiations of one red-black tree parameterized by a key
//! ordering and a pure `recompute(item, left, right)` function. The engine calls that function
//! bottom-up on exactly the nodes whose subtree changed, so every node's summary is correct
//! whenever control returns to the caller.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod augment;
mod error;
mod raw;

pub mod josephus;
pub mod max_prefix;
pub mod order_statistic;

pub use error::Error;
pub use max_prefix::{Interval, MaxPrefixTree, Summary};
pub use order_statistic::OrderStatisticTree;
