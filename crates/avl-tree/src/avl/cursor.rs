//! In-order traversal through parent links.
//!
//! Neither [`Cursor`] nor [`Iter`] keeps a stack: the successor of a node is
//! the leftmost node of its right subtree, or else the first ancestor reached
//! from a left child. Both borrow the tree, so the tree cannot be mutated
//! while one of them is alive.

use std::fmt;
use std::iter::FusedIterator;

use crate::arena::Arena;
use crate::error::{Result, TreeError};
use crate::util::{first, last, next, prev};

use super::tree::{AvlTree, NodeRef};
use super::types::AvlNode;

/// Bidirectional position in an [`AvlTree`]: a node, or the end sentinel.
///
/// Stepping off either edge of the sequence lands on the end position.
/// Reading or stepping the end position is an error, never a silent no-op.
///
/// Cursors compare equal only when they belong to the same tree, so the end
/// cursors of two different trees are not equal.
pub struct Cursor<'a, T, C>
where
    C: Fn(&T, &T) -> bool,
{
    tree: &'a AvlTree<T, C>,
    node: Option<u32>,
}

impl<'a, T, C> Cursor<'a, T, C>
where
    C: Fn(&T, &T) -> bool,
{
    pub(crate) fn new(tree: &'a AvlTree<T, C>, node: Option<u32>) -> Self {
        Self { tree, node }
    }

    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Element under the cursor.
    pub fn get(&self) -> Result<&'a T> {
        let tree = self.tree;
        match self.node {
            Some(i) => Ok(&tree.arena()[i].v),
            None => Err(TreeError::EndDereference),
        }
    }

    /// Handle to the node under the cursor; `None` at the end position.
    pub fn node(&self) -> Option<NodeRef> {
        self.node.map(|i| self.tree.node_ref(i))
    }

    /// Steps to the in-order successor, or to the end after the last element.
    pub fn move_next(&mut self) -> Result<()> {
        let i = self.node.ok_or(TreeError::AdvancePastEnd)?;
        self.node = next(self.tree.arena(), i);
        Ok(())
    }

    /// Steps to the in-order predecessor, or to the end before the first
    /// element.
    pub fn move_prev(&mut self) -> Result<()> {
        let i = self.node.ok_or(TreeError::RetreatFromEnd)?;
        self.node = prev(self.tree.arena(), i);
        Ok(())
    }

    /// Steps forward `n` times. Fails as soon as a step starts at the end.
    pub fn advance(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.move_next()?;
        }
        Ok(())
    }

    /// Steps backward `n` times.
    pub fn retreat(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.move_prev()?;
        }
        Ok(())
    }
}

impl<T, C> Clone for Cursor<'_, T, C>
where
    C: Fn(&T, &T) -> bool,
{
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            node: self.node,
        }
    }
}

impl<T, C> PartialEq for Cursor<'_, T, C>
where
    C: Fn(&T, &T) -> bool,
{
    fn eq(&self, other: &Self) -> bool {
        self.tree.id() == other.tree.id() && self.node == other.node
    }
}

impl<T, C> Eq for Cursor<'_, T, C> where C: Fn(&T, &T) -> bool {}

impl<T, C> fmt::Debug for Cursor<'_, T, C>
where
    T: fmt::Debug,
    C: Fn(&T, &T) -> bool,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Ok(v) => f.debug_tuple("Cursor").field(v).finish(),
            Err(_) => f.write_str("Cursor(end)"),
        }
    }
}

/// Borrowing in-order iterator, created by [`AvlTree::iter`].
pub struct Iter<'a, T> {
    arena: &'a Arena<AvlNode<T>>,
    front: Option<u32>,
    back: Option<u32>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(arena: &'a Arena<AvlNode<T>>, root: Option<u32>) -> Self {
        Self {
            arena,
            front: first(arena, root),
            back: last(arena, root),
            remaining: arena.len(),
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let i = self.front?;
        self.remaining -= 1;
        self.front = next(self.arena, i);
        Some(&self.arena[i].v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let i = self.back?;
        self.remaining -= 1;
        self.back = prev(self.arena, i);
        Some(&self.arena[i].v)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Owning in-order iterator, created by `AvlTree::into_iter`.
pub struct IntoIter<T> {
    inner: std::vec::IntoIter<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(mut arena: Arena<AvlNode<T>>, root: Option<u32>) -> Self {
        let mut order = Vec::with_capacity(arena.len());
        let mut curr = first(&arena, root);
        while let Some(i) = curr {
            order.push(i);
            curr = next(&arena, i);
        }
        let values: Vec<T> = order.into_iter().map(|i| arena.free(i).v).collect();
        Self {
            inner: values.into_iter(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
