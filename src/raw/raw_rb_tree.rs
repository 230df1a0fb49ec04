use core::cmp::Ordering;
use core::iter::FusedIterator;

use log::trace;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node, Side};
use crate::augment::Augmentation;

/// The red-black engine shared by every augmented tree in this crate.
///
/// Nodes live in an arena and link to each other by [`Handle`]. An absent link plays the part
/// of the classic shared sentinel: it is black, and its summary is the augmentation's
/// [`empty`](Augmentation::empty) value, kept in `nil` so it can be borrowed like any other
/// node's summary.
pub(crate) struct RawRbTree<A: Augmentation> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<A::Item, A::Summary>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Summary of the empty subtree.
    nil: A::Summary,
}

impl<A: Augmentation> RawRbTree<A> {
    /// Creates a new, empty tree.
    pub(crate) fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            nil: A::empty(),
        }
    }

    /// Creates a new tree with room for `capacity` nodes before reallocating.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            nil: A::empty(),
        }
    }

    /// Returns the number of nodes in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree contains no nodes.
    pub(crate) const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Drops every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    fn node(&self, handle: Handle) -> &Node<A::Item, A::Summary> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<A::Item, A::Summary> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    pub(crate) fn item(&self, handle: Handle) -> &A::Item {
        &self.node(handle).item
    }

    /// Returns the summary of the subtree at `handle`, or the empty summary for an absent link.
    #[inline]
    pub(crate) fn summary(&self, handle: Option<Handle>) -> &A::Summary {
        match handle {
            Some(handle) => &self.node(handle).summary,
            None => &self.nil,
        }
    }

    /// Returns the summary of the whole tree.
    pub(crate) fn root_summary(&self) -> &A::Summary {
        self.summary(self.root)
    }

    #[inline]
    pub(crate) fn left(&self, handle: Handle) -> Option<Handle> {
        self.node(handle).left
    }

    #[inline]
    pub(crate) fn right(&self, handle: Handle) -> Option<Handle> {
        self.node(handle).right
    }

    #[inline]
    pub(crate) fn parent(&self, handle: Handle) -> Option<Handle> {
        self.node(handle).parent
    }

    /// Absent links count as black.
    #[inline]
    fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.is_some_and(|handle| self.node(handle).is_red())
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.node_mut(handle).color = color;
    }

    /// Returns which side of `parent` the (possibly absent) `child` link is on.
    ///
    /// An absent child is only ever asked about while its sibling is present, so comparing the
    /// left link is enough to tell the two apart.
    #[inline]
    fn side_of(&self, child: Option<Handle>, parent: Handle) -> Side {
        if self.node(parent).left == child { Side::Left } else { Side::Right }
    }

    /// Returns the leftmost (`Side::Left`) or rightmost (`Side::Right`) node below `handle`.
    pub(crate) fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(child) = self.node(handle).child(side) {
            handle = child;
        }
        handle
    }

    /// Returns the smallest node, if any.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Left))
    }

    /// Returns the largest node, if any.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Right))
    }

    /// Returns the in-order neighbour of `handle` towards `side`
    /// (`Side::Right` is the successor, `Side::Left` the predecessor).
    pub(crate) fn step(&self, handle: Handle, side: Side) -> Option<Handle> {
        if let Some(child) = self.node(handle).child(side) {
            return Some(self.extreme(child, side.opposite()));
        }

        let mut current = handle;
        while let Some(parent) = self.parent(current) {
            if self.node(parent).child(side) != Some(current) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    /// Descends from the root steered by `locate`, which reports where the target lies relative
    /// to the visited item (`Less` = left subtree, `Greater` = right subtree, `Equal` = found).
    ///
    /// Returns `None` when the descent runs off the tree.
    pub(crate) fn search_by<F>(&self, mut locate: F) -> Option<Handle>
    where
        F: FnMut(&A::Item) -> Ordering,
    {
        let mut cursor = self.root;
        while let Some(handle) = cursor {
            let node = self.node(handle);
            cursor = match locate(&node.item) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Recomputes the summary of a single node from its children.
    fn refresh(&mut self, handle: Handle) {
        let node = self.node(handle);
        let summary = A::recompute(&node.item, self.summary(node.left), self.summary(node.right));
        self.node_mut(handle).summary = summary;
    }

    /// Recomputes summaries from `start` up to the root.
    fn refresh_upward(&mut self, start: Option<Handle>) {
        let mut cursor = start;
        while let Some(handle) = cursor {
            self.refresh(handle);
            cursor = self.parent(handle);
        }
    }

    /// Points whatever referenced `old` (its parent, or the root slot) at `new`.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(Some(old), parent);
                self.node_mut(parent).set_child(side, new);
            }
        }
    }

    /// Moves the subtree at `with` into the position held by `old`.
    fn transplant(&mut self, old: Handle, with: Option<Handle>) {
        let parent = self.parent(old);
        self.replace_child(parent, old, with);
        if let Some(with) = with {
            self.node_mut(with).parent = parent;
        }
    }

    /// Rotates around `x` so that `x` moves down towards `side`.
    ///
    /// `rotate(x, Side::Left)` is the textbook left rotation: `x`'s right child takes its place.
    /// The lowered node is refreshed before the raised one, which reads it.
    fn rotate(&mut self, x: Handle, side: Side) {
        let Some(y) = self.node(x).child(side.opposite()) else {
            panic!("`RawRbTree::rotate()` - no child to rotate into place!");
        };
        trace!("rotating {side:?} at {x:?}");

        let inner = self.node(y).child(side);
        self.node_mut(x).set_child(side.opposite(), inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(x);
        }

        let parent = self.parent(x);
        self.node_mut(y).parent = parent;
        self.replace_child(parent, x, Some(y));

        self.node_mut(y).set_child(side, Some(x));
        self.node_mut(x).parent = Some(y);

        self.refresh(x);
        self.refresh(y);
    }

    /// Inserts `item` and returns the handle of its node.
    ///
    /// Items comparing equal to an existing item are placed after it in order.
    pub(crate) fn insert(&mut self, item: A::Item) -> Handle {
        let mut parent = None;
        let mut side = Side::Left;
        let mut cursor = self.root;

        while let Some(handle) = cursor {
            let node = self.node(handle);
            side = match A::compare(&item, &node.item) {
                Ordering::Less => Side::Left,
                Ordering::Equal | Ordering::Greater => Side::Right,
            };
            parent = Some(handle);
            cursor = node.child(side);
        }

        let summary = A::recompute(&item, &self.nil, &self.nil);
        let inserted = self.nodes.alloc(Node::new(item, summary, parent));
        match parent {
            None => self.root = Some(inserted),
            Some(parent) => self.node_mut(parent).set_child(side, Some(inserted)),
        }

        // Every ancestor gained one node; fixup rotations then only need local refreshes.
        self.refresh_upward(parent);
        self.insert_fixup(inserted);
        inserted
    }

    fn insert_fixup(&mut self, mut z: Handle) {
        while let Some(parent) = self.parent(z)
            && self.node(parent).is_red()
        {
            let grandparent = self.parent_of_red(parent);
            let side = self.side_of(Some(parent), grandparent);
            let uncle = self.node(grandparent).child(side.opposite());

            if let Some(uncle) = uncle
                && self.node(uncle).is_red()
            {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                z = grandparent;
                continue;
            }

            if self.side_of(Some(z), parent) != side {
                // Inner grandchild: straighten the zig-zag first.
                z = parent;
                self.rotate(z, side);
            }

            let parent = self.parent_of_red(z);
            let grandparent = self.parent_of_red(parent);
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Returns the parent of a node that insert fixup knows is not the root.
    fn parent_of_red(&self, handle: Handle) -> Handle {
        match self.parent(handle) {
            Some(parent) => parent,
            None => panic!("`RawRbTree::insert_fixup()` - red node without a parent!"),
        }
    }

    /// Removes the node at `z` and returns its item.
    ///
    /// A node with two children is replaced by its in-order successor, which also inherits its
    /// colour, so the node physically unlinked from the bottom of the tree is the successor.
    pub(crate) fn remove(&mut self, z: Handle) -> A::Item {
        let removed_color;
        // The node that moves into the unlinked position, and its parent (tracked separately
        // because the node may be absent).
        let x;
        let x_parent;

        match (self.left(z), self.right(z)) {
            (None, only) | (only, None) => {
                removed_color = self.node(z).color;
                x = only;
                x_parent = self.parent(z);
                self.transplant(z, only);
            }
            (Some(left), Some(right)) => {
                let successor = self.extreme(right, Side::Left);
                removed_color = self.node(successor).color;
                x = self.right(successor);

                if self.parent(successor) == Some(z) {
                    x_parent = Some(successor);
                } else {
                    x_parent = self.parent(successor);
                    self.transplant(successor, x);
                    self.node_mut(successor).right = Some(right);
                    self.node_mut(right).parent = Some(successor);
                }

                self.transplant(z, Some(successor));
                self.node_mut(successor).left = Some(left);
                self.node_mut(left).parent = Some(successor);
                let color = self.node(z).color;
                self.set_color(successor, color);
            }
        }

        // Lowest node whose subtree lost a member; the walk passes through the successor.
        self.refresh_upward(x_parent);
        let removed = self.nodes.take(z);

        if removed_color == Color::Black {
            self.remove_fixup(x, x_parent);
        }
        removed.item
    }

    fn remove_fixup(&mut self, mut x: Option<Handle>, mut x_parent: Option<Handle>) {
        while x != self.root && !self.is_red(x) {
            let Some(parent) = x_parent else {
                break;
            };
            let side = self.side_of(x, parent);
            let mut sibling = self.sibling(parent, side);

            if self.node(sibling).is_red() {
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self.sibling(parent, side);
            }

            let near = self.node(sibling).child(side);
            let far = self.node(sibling).child(side.opposite());

            if !self.is_red(near) && !self.is_red(far) {
                self.set_color(sibling, Color::Red);
                x = Some(parent);
                x_parent = self.parent(parent);
                continue;
            }

            if !self.is_red(far) {
                if let Some(near) = near {
                    self.set_color(near, Color::Black);
                }
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                sibling = self.sibling(parent, side);
            }

            let color = self.node(parent).color;
            self.set_color(sibling, color);
            self.set_color(parent, Color::Black);
            if let Some(far) = self.node(sibling).child(side.opposite()) {
                self.set_color(far, Color::Black);
            }
            self.rotate(parent, side);
            x = self.root;
            x_parent = None;
        }

        if let Some(x) = x {
            self.set_color(x, Color::Black);
        }
    }

    /// Returns the sibling of the `side` child of `parent`.
    ///
    /// During removal fixup the doubly-black side is one black short, so its sibling subtree
    /// has black height of at least one and cannot be absent.
    fn sibling(&self, parent: Handle, side: Side) -> Handle {
        match self.node(parent).child(side.opposite()) {
            Some(sibling) => sibling,
            None => panic!("`RawRbTree::remove_fixup()` - black height violated, sibling is missing!"),
        }
    }

    /// Returns an in-order iterator over the items.
    pub(crate) fn iter(&self) -> RawIter<'_, A> {
        RawIter {
            tree: self,
            front: self.first(),
            back: self.last(),
            remaining: self.len(),
        }
    }
}

impl<A: Augmentation> Clone for RawRbTree<A>
where
    A::Item: Clone,
{
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            nil: self.nil.clone(),
        }
    }
}

/// In-order iterator over the items of a [`RawRbTree`].
pub(crate) struct RawIter<'a, A: Augmentation> {
    tree: &'a RawRbTree<A>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<A: Augmentation> Clone for RawIter<'_, A> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, A: Augmentation> Iterator for RawIter<'a, A> {
    type Item = &'a A::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.remaining -= 1;
        self.front = self.tree.step(handle, Side::Right);
        Some(self.tree.item(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<A: Augmentation> DoubleEndedIterator for RawIter<'_, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.remaining -= 1;
        self.back = self.tree.step(handle, Side::Left);
        Some(self.tree.item(handle))
    }
}

impl<A: Augmentation> ExactSizeIterator for RawIter<'_, A> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<A: Augmentation> FusedIterator for RawIter<'_, A> {}
