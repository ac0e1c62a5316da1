use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::arena::Arena;
use crate::error::{Result, TreeError};
use crate::types::{equivalent, natural_less, Less};
use crate::util::{first, last, next, prev};

use super::cursor::{Cursor, IntoIter, Iter};
use super::types::AvlNode;
use super::util::{self, height};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

fn next_tree_id() -> u64 {
    NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Handle to a node of one specific [`AvlTree`].
///
/// Handles are plain values and may outlive borrows of the tree. Every use is
/// checked: a handle issued by another tree, by this tree before
/// [`clear`](AvlTree::clear), or for a node that has since been removed is
/// rejected with [`TreeError::InvalidNode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    tree: u64,
    index: u32,
    generation: u32,
}

/// Self-balancing (AVL) binary search tree with multiset semantics.
///
/// Nodes live in an [`Arena`] and point at each other, including at their
/// parent, by slot index. Ordering is supplied by a strict `less` predicate
/// chosen at construction. Equivalent elements are all kept; a new element is
/// placed after the ones already present, so in-order traversal lists equal
/// elements in insertion order.
///
/// After every mutating call each node satisfies
/// `|height(left) - height(right)| <= 1`, so `insert`, `find` and `remove` are
/// `O(log n)`.
///
/// The tree is not internally synchronized. Share it across threads behind a
/// lock.
pub struct AvlTree<T, C = Less<T>>
where
    C: Fn(&T, &T) -> bool,
{
    id: u64,
    arena: Arena<AvlNode<T>>,
    root: Option<u32>,
    comparator: C,
}

impl<T> AvlTree<T, Less<T>>
where
    T: PartialOrd,
{
    /// Empty tree ordered by `<`.
    pub fn new() -> Self {
        Self::with_comparator(natural_less::<T>)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_comparator_and_capacity(natural_less::<T>, capacity)
    }

    /// Tree holding `count` copies of `value`.
    pub fn from_elem(count: usize, value: T) -> Self
    where
        T: Clone,
    {
        let mut tree = Self::with_capacity(count);
        for _ in 0..count {
            tree.insert(value.clone());
        }
        tree
    }
}

impl<T> Default for AvlTree<T, Less<T>>
where
    T: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> AvlTree<T, C>
where
    C: Fn(&T, &T) -> bool,
{
    /// Empty tree ordered by `comparator`, which must return `true` iff its
    /// first argument strictly precedes the second.
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_comparator_and_capacity(comparator, 0)
    }

    pub fn with_comparator_and_capacity(comparator: C, capacity: usize) -> Self {
        Self {
            id: next_tree_id(),
            arena: Arena::with_capacity(capacity),
            root: None,
            comparator,
        }
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree; `0` when empty, `1` for a single node.
    pub fn height(&self) -> usize {
        height(&self.arena, self.root) as usize
    }

    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.arena.reserve(additional);
    }

    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        Ok(self.arena.try_reserve(additional)?)
    }

    pub fn shrink_to_fit(&mut self) {
        self.arena.shrink_to_fit();
    }

    pub(crate) fn node_ref(&self, index: u32) -> NodeRef {
        let generation = self
            .arena
            .generation(index)
            .expect("handle requested for a vacant slot");
        NodeRef {
            tree: self.id,
            index,
            generation,
        }
    }

    fn resolve(&self, node: NodeRef) -> Result<u32> {
        if node.tree == self.id && self.arena.is_live(node.index, node.generation) {
            Ok(node.index)
        } else {
            log::warn!("rejected node handle {node:?} for tree {}", self.id);
            Err(TreeError::InvalidNode)
        }
    }

    fn link(&mut self, index: u32) {
        util::insert(&mut self.arena, &mut self.root, index, &self.comparator);
    }

    /// Inserts `value` and returns a handle to its node.
    pub fn insert(&mut self, value: T) -> NodeRef {
        let (index, generation) = self.arena.alloc(AvlNode::new(value));
        self.link(index);
        NodeRef {
            tree: self.id,
            index,
            generation,
        }
    }

    /// Like [`insert`](Self::insert), but returns
    /// [`TreeError::Allocation`] instead of aborting when the arena cannot
    /// grow. The tree is unchanged on error.
    pub fn try_insert(&mut self, value: T) -> Result<NodeRef> {
        let (index, generation) = self.arena.try_alloc(AvlNode::new(value))?;
        self.link(index);
        Ok(NodeRef {
            tree: self.id,
            index,
            generation,
        })
    }

    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Handle to a node holding an element equivalent to `value`.
    ///
    /// With duplicates present this is the first equivalent node met while
    /// descending from the root, not necessarily the first in order.
    pub fn find(&self, value: &T) -> Option<NodeRef> {
        util::find(&self.arena, self.root, value, &self.comparator).map(|i| self.node_ref(i))
    }

    /// Number of elements equivalent to `value`.
    pub fn count(&self, value: &T) -> usize {
        let Some(start) = util::find(&self.arena, self.root, value, &self.comparator) else {
            return 0;
        };
        let arena = &self.arena;
        let is_equal = |i: &u32| equivalent(&self.comparator, &arena[*i].v, value);
        let before = std::iter::successors(prev(arena, start), |&i| prev(arena, i))
            .take_while(is_equal)
            .count();
        let after = std::iter::successors(next(arena, start), |&i| next(arena, i))
            .take_while(is_equal)
            .count();
        before + 1 + after
    }

    pub fn get(&self, node: NodeRef) -> Result<&T> {
        let index = self.resolve(node)?;
        Ok(&self.arena[index].v)
    }

    /// Height of the subtree rooted at `node`.
    pub fn node_height(&self, node: NodeRef) -> Result<usize> {
        let index = self.resolve(node)?;
        Ok(self.arena[index].h as usize)
    }

    pub fn root(&self) -> Option<NodeRef> {
        self.root.map(|i| self.node_ref(i))
    }

    /// Removes the node behind `node` and returns its element.
    ///
    /// When the node has two children it is not unlinked: it receives the
    /// element of its in-order successor and the successor's node is released
    /// instead. Afterwards `node` stays valid (pointing at the successor's
    /// element) while any handle to the successor does not.
    pub fn remove(&mut self, node: NodeRef) -> Result<T> {
        let index = self.resolve(node)?;
        Ok(util::remove(&mut self.arena, &mut self.root, index))
    }

    /// Removes one element equivalent to `value`, if there is one.
    pub fn remove_value(&mut self, value: &T) -> Option<T> {
        let index = util::find(&self.arena, self.root, value, &self.comparator)?;
        Some(util::remove(&mut self.arena, &mut self.root, index))
    }

    /// Drops every element. Handles issued so far become invalid.
    pub fn clear(&mut self) {
        log::debug!("clearing tree {} with {} nodes", self.id, self.len());
        self.arena.clear();
        self.root = None;
        self.id = next_tree_id();
    }

    /// Moves all nodes into a new tree and leaves `self` empty.
    ///
    /// No node is touched; handles keep working against the returned tree.
    pub fn take(&mut self) -> Self
    where
        C: Clone,
    {
        log::debug!("taking {} nodes out of tree {}", self.len(), self.id);
        let empty = Self::with_comparator(self.comparator.clone());
        std::mem::replace(self, empty)
    }

    pub fn first(&self) -> Option<&T> {
        first(&self.arena, self.root).map(|i| &self.arena[i].v)
    }

    pub fn last(&self) -> Option<&T> {
        last(&self.arena, self.root).map(|i| &self.arena[i].v)
    }

    pub fn first_node(&self) -> Option<NodeRef> {
        first(&self.arena, self.root).map(|i| self.node_ref(i))
    }

    pub fn last_node(&self) -> Option<NodeRef> {
        last(&self.arena, self.root).map(|i| self.node_ref(i))
    }

    /// Cursor at the smallest element, or [`end`](Self::end) when empty.
    pub fn begin(&self) -> Cursor<'_, T, C> {
        Cursor::new(self, first(&self.arena, self.root))
    }

    pub fn end(&self) -> Cursor<'_, T, C> {
        Cursor::new(self, None)
    }

    pub fn cursor(&self, node: NodeRef) -> Result<Cursor<'_, T, C>> {
        let index = self.resolve(node)?;
        Ok(Cursor::new(self, Some(index)))
    }

    /// In-order iterator over the elements.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.arena, self.root)
    }

    /// Verifies links, heights, balance, ordering and the element count.
    pub fn assert_valid(&self) -> std::result::Result<(), String> {
        let count = util::assert_avl_tree(&self.arena, self.root, &self.comparator)?;
        if count != self.len() {
            return Err(format!(
                "Size mismatch: {count} reachable nodes, len {}",
                self.len()
            ));
        }
        Ok(())
    }

    /// Structural dump, one node per line with its slot and height.
    pub fn print(&self) -> String
    where
        T: fmt::Debug,
    {
        util::print(&self.arena, self.root, "")
    }

    pub(crate) fn arena(&self) -> &Arena<AvlNode<T>> {
        &self.arena
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Copies every reachable node into `arena`, keeping the exact shape and
    /// stored heights, and returns the new root.
    fn clone_nodes(&self, arena: &mut Arena<AvlNode<T>>) -> Option<u32>
    where
        T: Clone,
    {
        let root = self.root?;
        let mut new_root = None;
        let mut stack: Vec<(u32, Option<u32>, bool)> = vec![(root, None, false)];
        while let Some((src, parent, is_left)) = stack.pop() {
            let node = &self.arena[src];
            let (dst, _) = arena.alloc(AvlNode {
                p: parent,
                l: None,
                r: None,
                v: node.v.clone(),
                h: node.h,
            });
            match parent {
                None => new_root = Some(dst),
                Some(p) if is_left => arena[p].l = Some(dst),
                Some(p) => arena[p].r = Some(dst),
            }
            if let Some(r) = node.r {
                stack.push((r, Some(dst), false));
            }
            if let Some(l) = node.l {
                stack.push((l, Some(dst), true));
            }
        }
        new_root
    }

    /// Deep copy that reports [`TreeError::Allocation`] instead of aborting.
    /// Nothing is leaked when it fails.
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
        C: Clone,
    {
        let mut arena = Arena::new();
        arena.try_reserve(self.len())?;
        let root = self.clone_nodes(&mut arena);
        log::debug!("cloned {} nodes from tree {}", self.len(), self.id);
        Ok(Self {
            id: next_tree_id(),
            arena,
            root,
            comparator: self.comparator.clone(),
        })
    }
}

impl<T, C> Clone for AvlTree<T, C>
where
    T: Clone,
    C: Fn(&T, &T) -> bool + Clone,
{
    fn clone(&self) -> Self {
        let mut arena = Arena::with_capacity(self.len());
        let root = self.clone_nodes(&mut arena);
        log::debug!("cloned {} nodes from tree {}", self.len(), self.id);
        Self {
            id: next_tree_id(),
            arena,
            root,
            comparator: self.comparator.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.arena.clear();
        self.arena.reserve(source.len());
        self.root = source.clone_nodes(&mut self.arena);
        self.comparator = source.comparator.clone();
        self.id = next_tree_id();
    }
}

impl<T, C> fmt::Debug for AvlTree<T, C>
where
    T: fmt::Debug,
    C: Fn(&T, &T) -> bool,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> PartialEq for AvlTree<T, C>
where
    T: PartialEq,
    C: Fn(&T, &T) -> bool,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, C> Eq for AvlTree<T, C>
where
    T: Eq,
    C: Fn(&T, &T) -> bool,
{
}

impl<T> FromIterator<T> for AvlTree<T, Less<T>>
where
    T: PartialOrd,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T, C> Extend<T> for AvlTree<T, C>
where
    C: Fn(&T, &T) -> bool,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T, C> IntoIterator for &'a AvlTree<T, C>
where
    C: Fn(&T, &T) -> bool,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, C> IntoIterator for AvlTree<T, C>
where
    C: Fn(&T, &T) -> bool,
{
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self.arena, self.root)
    }
}
