use core::fmt;

/// Errors reported by the tree queries and the Josephus generator.
///
/// Every error is returned before the structure is touched, so a failed call never leaves a
/// tree modified.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Error {
    /// [`select`](crate::OrderStatisticTree::select) was asked for a position outside
    /// `1..=len`.
    OutOfRange {
        /// The requested 1-indexed position.
        k: usize,
        /// The number of elements at the time of the call.
        len: usize,
    },
    /// [`rank`](crate::OrderStatisticTree::rank) was asked about a value not in the set.
    NotFound,
    /// A counting-out run was requested with no members or a zero step.
    InvalidInput {
        /// The requested number of members.
        n: usize,
        /// The requested step.
        m: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange { k, len } => write!(f, "position {k} is out of range for {len} elements"),
            Error::NotFound => f.write_str("value not found"),
            Error::InvalidInput { n, m } => {
                write!(f, "invalid counting-out parameters n={n}, m={m}: both must be at least 1")
            }
        }
    }
}

impl core::error::Error for Error {}
