//! Node link and ordering abstractions.
//!
//! Every "pointer" in the tree is an `Option<u32>` slot index into the
//! [`Arena`](crate::arena::Arena). Tree-walking helpers in [`util`](crate::util)
//! are written against the [`Node`] trait so they do not care what payload a
//! node carries.

/// Binary-tree links (`p`, `l`, `r`).
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Strict ordering predicate: `less(a, b)` is `true` iff `a` precedes `b`.
///
/// Two elements are equivalent when neither precedes the other.
pub type Less<T> = fn(&T, &T) -> bool;

/// Natural `<` ordering, the default predicate of
/// [`AvlTree::new`](crate::AvlTree::new).
pub fn natural_less<T: PartialOrd>(a: &T, b: &T) -> bool {
    a < b
}

#[inline]
pub(crate) fn equivalent<T, C>(less: &C, a: &T, b: &T) -> bool
where
    C: Fn(&T, &T) -> bool,
{
    !less(a, b) && !less(b, a)
}
