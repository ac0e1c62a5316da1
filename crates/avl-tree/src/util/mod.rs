//! Link-level tree walking helpers.
//!
//! These work on any arena that can be indexed by slot number and on any node
//! implementing [`Node`], so they are shared by the AVL code and by tests that
//! build small trees by hand.

use std::ops::{Index, IndexMut};

use crate::types::Node;

#[inline]
pub(crate) fn get_p<A, N>(arena: &A, idx: u32) -> Option<u32>
where
    A: Index<u32, Output = N> + ?Sized,
    N: Node,
{
    arena[idx].p()
}

#[inline]
pub(crate) fn get_l<A, N>(arena: &A, idx: u32) -> Option<u32>
where
    A: Index<u32, Output = N> + ?Sized,
    N: Node,
{
    arena[idx].l()
}

#[inline]
pub(crate) fn get_r<A, N>(arena: &A, idx: u32) -> Option<u32>
where
    A: Index<u32, Output = N> + ?Sized,
    N: Node,
{
    arena[idx].r()
}

#[inline]
pub(crate) fn set_p<A, N>(arena: &mut A, idx: u32, v: Option<u32>)
where
    A: IndexMut<u32, Output = N> + ?Sized,
    N: Node,
{
    arena[idx].set_p(v);
}

#[inline]
pub(crate) fn set_l<A, N>(arena: &mut A, idx: u32, v: Option<u32>)
where
    A: IndexMut<u32, Output = N> + ?Sized,
    N: Node,
{
    arena[idx].set_l(v);
}

#[inline]
pub(crate) fn set_r<A, N>(arena: &mut A, idx: u32, v: Option<u32>)
where
    A: IndexMut<u32, Output = N> + ?Sized,
    N: Node,
{
    arena[idx].set_r(v);
}

/// Leftmost node of the subtree rooted at `root`.
pub fn first<A, N>(arena: &A, root: Option<u32>) -> Option<u32>
where
    A: Index<u32, Output = N> + ?Sized,
    N: Node,
{
    let mut curr = root?;
    while let Some(l) = get_l(arena, curr) {
        curr = l;
    }
    Some(curr)
}

/// Rightmost node of the subtree rooted at `root`.
pub fn last<A, N>(arena: &A, root: Option<u32>) -> Option<u32>
where
    A: Index<u32, Output = N> + ?Sized,
    N: Node,
{
    let mut curr = root?;
    while let Some(r) = get_r(arena, curr) {
        curr = r;
    }
    Some(curr)
}

/// In-order successor, found through child and parent links only.
pub fn next<A, N>(arena: &A, mut curr: u32) -> Option<u32>
where
    A: Index<u32, Output = N> + ?Sized,
    N: Node,
{
    if let Some(r) = get_r(arena, curr) {
        return first(arena, Some(r));
    }
    let mut p = get_p(arena, curr);
    while let Some(pi) = p {
        if get_r(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// In-order predecessor.
pub fn prev<A, N>(arena: &A, mut curr: u32) -> Option<u32>
where
    A: Index<u32, Output = N> + ?Sized,
    N: Node,
{
    if let Some(l) = get_l(arena, curr) {
        return last(arena, Some(l));
    }
    let mut p = get_p(arena, curr);
    while let Some(pi) = p {
        if get_l(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// Replaces `old` with `new` in the child slot of `parent`, or does nothing
/// when `old` was the root.
pub(crate) fn replace_child<A, N>(arena: &mut A, parent: Option<u32>, old: u32, new: Option<u32>)
where
    A: IndexMut<u32, Output = N> + ?Sized,
    N: Node,
{
    let Some(p) = parent else {
        return;
    };
    if get_l(arena, p) == Some(old) {
        set_l(arena, p, new);
    } else {
        set_r(arena, p, new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct N {
        key: u32,
        p: Option<u32>,
        l: Option<u32>,
        r: Option<u32>,
    }

    impl Node for N {
        fn p(&self) -> Option<u32> {
            self.p
        }
        fn l(&self) -> Option<u32> {
            self.l
        }
        fn r(&self) -> Option<u32> {
            self.r
        }
        fn set_p(&mut self, v: Option<u32>) {
            self.p = v;
        }
        fn set_l(&mut self, v: Option<u32>) {
            self.l = v;
        }
        fn set_r(&mut self, v: Option<u32>) {
            self.r = v;
        }
    }

    /// Vec-backed arena indexed by `u32`, enough for the helpers above.
    struct Nodes(Vec<N>);

    impl Index<u32> for Nodes {
        type Output = N;
        fn index(&self, i: u32) -> &N {
            &self.0[i as usize]
        }
    }

    impl IndexMut<u32> for Nodes {
        fn index_mut(&mut self, i: u32) -> &mut N {
            &mut self.0[i as usize]
        }
    }

    //       2(k=20)
    //      /       \
    //   0(k=10)   3(k=40)
    //     \        /
    //   1(k=15)  4(k=30)
    fn sample() -> Nodes {
        let mut nodes = Nodes(
            [10, 15, 20, 40, 30]
                .into_iter()
                .map(|key| N {
                    key,
                    ..Default::default()
                })
                .collect(),
        );
        set_l(&mut nodes, 2, Some(0));
        set_p(&mut nodes, 0, Some(2));
        set_r(&mut nodes, 0, Some(1));
        set_p(&mut nodes, 1, Some(0));
        set_r(&mut nodes, 2, Some(3));
        set_p(&mut nodes, 3, Some(2));
        set_l(&mut nodes, 3, Some(4));
        set_p(&mut nodes, 4, Some(3));
        nodes
    }

    #[test]
    fn next_walks_in_order() {
        let nodes = sample();
        let mut keys = Vec::new();
        let mut curr = first(&nodes, Some(2));
        while let Some(i) = curr {
            keys.push(nodes[i].key);
            curr = next(&nodes, i);
        }
        assert_eq!(keys, vec![10, 15, 20, 30, 40]);
    }

    #[test]
    fn prev_walks_in_reverse() {
        let nodes = sample();
        let mut keys = Vec::new();
        let mut curr = last(&nodes, Some(2));
        while let Some(i) = curr {
            keys.push(nodes[i].key);
            curr = prev(&nodes, i);
        }
        assert_eq!(keys, vec![40, 30, 20, 15, 10]);
    }

    #[test]
    fn replace_child_rewires_matching_side() {
        let mut nodes = sample();
        replace_child(&mut nodes, Some(3), 4, None);
        assert_eq!(nodes[3].l, None);
        replace_child(&mut nodes, Some(2), 3, Some(4));
        assert_eq!(nodes[2].r, Some(4));
        assert_eq!(nodes[2].l, Some(0));
    }
}
