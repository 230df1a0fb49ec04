use core::cmp::Ordering;

/// The per-tree policy plugged into [`RawRbTree`](crate::raw::RawRbTree).
///
/// An augmentation decides how items are ordered and what aggregate every node carries about
/// its subtree. The engine calls [`recompute`](Augmentation::recompute) bottom-up on exactly the
/// nodes whose subtree membership changed: the insertion or removal path, and both endpoints of
/// every rotation (the lowered node first).
pub(crate) trait Augmentation {
    /// The payload stored in each node. Its key is whatever [`compare`](Augmentation::compare)
    /// looks at.
    type Item;

    /// The aggregate stored in each node.
    type Summary: Clone;

    /// Orders two items. Equal items are allowed by the engine and descend to the right.
    fn compare(a: &Self::Item, b: &Self::Item) -> Ordering;

    /// The aggregate of an empty subtree. Absent children read this value.
    fn empty() -> Self::Summary;

    /// Folds a node's own item with its children's aggregates.
    ///
    /// Must be a pure function of its arguments.
    fn recompute(item: &Self::Item, left: &Self::Summary, right: &Self::Summary) -> Self::Summary;
}
