use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A red-black tree node.
///
/// Child links are the structural edges of the tree. The parent link is a back-reference used
/// only for upward walks (fixup, summary propagation, rank) and is rewritten by every relink.
#[derive(Clone)]
pub(crate) struct Node<T, S> {
    pub(crate) item: T,
    // Aggregate over the subtree rooted here.
    pub(crate) summary: S,
    pub(crate) color: Color,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) parent: Option<Handle>,
}

impl<T, S> Node<T, S> {
    /// Creates a detached red node.
    pub(crate) fn new(item: T, summary: S, parent: Option<Handle>) -> Self {
        Self {
            item,
            summary,
            color: Color::Red,
            left: None,
            right: None,
            parent,
        }
    }

    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    /// Returns the child on the requested side.
    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

/// Which side of its parent a node hangs from.
///
/// Lets rotations and both fixup loops be written once and mirrored, instead of spelling out
/// the left and right cases separately.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}
