//! Rotations, the balancing walk, and the link-level insert/remove used by
//! [`AvlTree`](super::AvlTree).
//!
//! Every function takes the arena plus a `&mut Option<u32>` root so a rotation
//! at the top of the tree can publish the new root directly.

use std::fmt::Debug;
use std::ops::{Index, IndexMut};

use crate::arena::Arena;
use crate::util::{first, get_l, get_p, get_r, next, replace_child, set_l, set_p, set_r};

use super::types::{AvlNode, AvlNodeLike};

#[inline]
pub(crate) fn height<A, N>(arena: &A, i: Option<u32>) -> u32
where
    A: Index<u32, Output = N> + ?Sized,
    N: AvlNodeLike,
{
    i.map_or(0, |i| arena[i].height())
}

#[inline]
fn update_height<A, N>(arena: &mut A, i: u32)
where
    A: IndexMut<u32, Output = N> + ?Sized,
    N: AvlNodeLike,
{
    let lh = height(arena, get_l(arena, i));
    let rh = height(arena, get_r(arena, i));
    arena[i].set_height(1 + lh.max(rh));
}

/// Balance factor, `height(right) - height(left)`.
#[inline]
pub(crate) fn balance<A, N>(arena: &A, i: u32) -> i32
where
    A: Index<u32, Output = N> + ?Sized,
    N: AvlNodeLike,
{
    height(arena, get_r(arena, i)) as i32 - height(arena, get_l(arena, i)) as i32
}

/// Hangs `new` where `old` used to be: under `parent`, or at the root.
#[inline]
fn reattach<A, N>(arena: &mut A, root: &mut Option<u32>, parent: Option<u32>, old: u32, new: u32)
where
    A: IndexMut<u32, Output = N> + ?Sized,
    N: AvlNodeLike,
{
    set_p(arena, new, parent);
    if parent.is_none() {
        *root = Some(new);
    } else {
        replace_child(arena, parent, old, Some(new));
    }
}

/// Single right rotation around `b`. Returns the new subtree root, or `b`
/// unchanged when it has no left child.
pub fn rotate_right<A, N>(arena: &mut A, root: &mut Option<u32>, b: u32) -> u32
where
    A: IndexMut<u32, Output = N> + ?Sized,
    N: AvlNodeLike,
{
    let Some(a) = get_l(arena, b) else {
        return b;
    };
    let bp = get_p(arena, b);
    let ar = get_r(arena, a);

    set_l(arena, b, ar);
    if let Some(ar) = ar {
        set_p(arena, ar, Some(b));
    }
    set_r(arena, a, Some(b));
    set_p(arena, b, Some(a));
    reattach(arena, root, bp, b, a);

    update_height(arena, b);
    update_height(arena, a);
    log::trace!("rotate right at {b}, new subtree root {a}");
    a
}

/// Single left rotation around `b`; mirror of [`rotate_right`].
pub fn rotate_left<A, N>(arena: &mut A, root: &mut Option<u32>, b: u32) -> u32
where
    A: IndexMut<u32, Output = N> + ?Sized,
    N: AvlNodeLike,
{
    let Some(a) = get_r(arena, b) else {
        return b;
    };
    let bp = get_p(arena, b);
    let al = get_l(arena, a);

    set_r(arena, b, al);
    if let Some(al) = al {
        set_p(arena, al, Some(b));
    }
    set_l(arena, a, Some(b));
    set_p(arena, b, Some(a));
    reattach(arena, root, bp, b, a);

    update_height(arena, b);
    update_height(arena, a);
    log::trace!("rotate left at {b}, new subtree root {a}");
    a
}

/// Left-right case: `c = b.l.r` is lifted above both `b.l` and `b`.
///
/// Same result as rotating `b.l` left and then `b` right. No-op when `b.l` or
/// `b.l.r` is absent.
pub fn rotate_double_right<A, N>(arena: &mut A, root: &mut Option<u32>, b: u32) -> u32
where
    A: IndexMut<u32, Output = N> + ?Sized,
    N: AvlNodeLike,
{
    let Some(a) = get_l(arena, b) else {
        return b;
    };
    let Some(c) = get_r(arena, a) else {
        return b;
    };
    let bp = get_p(arena, b);
    let cl = get_l(arena, c);
    let cr = get_r(arena, c);

    set_r(arena, a, cl);
    if let Some(cl) = cl {
        set_p(arena, cl, Some(a));
    }
    set_l(arena, b, cr);
    if let Some(cr) = cr {
        set_p(arena, cr, Some(b));
    }
    set_l(arena, c, Some(a));
    set_p(arena, a, Some(c));
    set_r(arena, c, Some(b));
    set_p(arena, b, Some(c));
    reattach(arena, root, bp, b, c);

    update_height(arena, a);
    update_height(arena, b);
    update_height(arena, c);
    log::trace!("double rotate right at {b}, new subtree root {c}");
    c
}

/// Right-left case: `c = b.r.l` is lifted above both `b.r` and `b`.
pub fn rotate_double_left<A, N>(arena: &mut A, root: &mut Option<u32>, b: u32) -> u32
where
    A: IndexMut<u32, Output = N> + ?Sized,
    N: AvlNodeLike,
{
    let Some(a) = get_r(arena, b) else {
        return b;
    };
    let Some(c) = get_l(arena, a) else {
        return b;
    };
    let bp = get_p(arena, b);
    let cl = get_l(arena, c);
    let cr = get_r(arena, c);

    set_l(arena, a, cr);
    if let Some(cr) = cr {
        set_p(arena, cr, Some(a));
    }
    set_r(arena, b, cl);
    if let Some(cl) = cl {
        set_p(arena, cl, Some(b));
    }
    set_l(arena, c, Some(b));
    set_p(arena, b, Some(c));
    set_r(arena, c, Some(a));
    set_p(arena, a, Some(c));
    reattach(arena, root, bp, b, c);

    update_height(arena, a);
    update_height(arena, b);
    update_height(arena, c);
    log::trace!("double rotate left at {b}, new subtree root {c}");
    c
}

/// Walks from `from` up to the root, refreshing heights and rotating any node
/// whose balance factor reached `±2`.
pub fn rebalance<A, N>(arena: &mut A, root: &mut Option<u32>, from: Option<u32>)
where
    A: IndexMut<u32, Output = N> + ?Sized,
    N: AvlNodeLike,
{
    let mut curr = from;
    while let Some(n) = curr {
        update_height(arena, n);
        let bf = balance(arena, n);
        let top = if bf <= -2 {
            let l = get_l(arena, n).expect("left-heavy node has a left child");
            if balance(arena, l) >= 1 {
                rotate_double_right(arena, root, n)
            } else {
                rotate_right(arena, root, n)
            }
        } else if bf >= 2 {
            let r = get_r(arena, n).expect("right-heavy node has a right child");
            if balance(arena, r) <= -1 {
                rotate_double_left(arena, root, n)
            } else {
                rotate_left(arena, root, n)
            }
        } else {
            n
        };
        curr = get_p(arena, top);
    }
}

/// Links the detached node `n` into the tree and rebalances.
///
/// Equivalent elements descend to the right, so equal values keep their
/// insertion order.
pub fn insert<A, T, C>(arena: &mut A, root: &mut Option<u32>, n: u32, less: &C)
where
    A: IndexMut<u32, Output = AvlNode<T>> + ?Sized,
    C: Fn(&T, &T) -> bool,
{
    let Some(mut curr) = *root else {
        *root = Some(n);
        return;
    };

    loop {
        let go_left = less(&arena[n].v, &arena[curr].v);
        let child = if go_left {
            get_l(arena, curr)
        } else {
            get_r(arena, curr)
        };
        match child {
            Some(child) => curr = child,
            None => {
                if go_left {
                    set_l(arena, curr, Some(n));
                } else {
                    set_r(arena, curr, Some(n));
                }
                set_p(arena, n, Some(curr));
                rebalance(arena, root, Some(curr));
                return;
            }
        }
    }
}

/// Finds a node equivalent to `value`.
pub fn find<A, T, C>(arena: &A, root: Option<u32>, value: &T, less: &C) -> Option<u32>
where
    A: Index<u32, Output = AvlNode<T>> + ?Sized,
    C: Fn(&T, &T) -> bool,
{
    let mut curr = root;
    while let Some(i) = curr {
        let v = &arena[i].v;
        curr = if less(value, v) {
            get_l(arena, i)
        } else if less(v, value) {
            get_r(arena, i)
        } else {
            return Some(i);
        };
    }
    None
}

/// Unlinks `n`, which must have at most one child, splicing that child into
/// its place. Returns the former parent of `n`.
fn splice_out<T>(arena: &mut Arena<AvlNode<T>>, root: &mut Option<u32>, n: u32) -> Option<u32> {
    let np = get_p(arena, n);
    let child = get_l(arena, n).or(get_r(arena, n));
    if let Some(c) = child {
        set_p(arena, c, np);
    }
    if np.is_none() {
        *root = child;
    } else {
        replace_child(arena, np, n, child);
    }
    np
}

/// Removes node `n` and returns the element it held.
///
/// A node with two children stays in place: it takes over the element of its
/// in-order successor, and the successor's slot is the one released.
pub fn remove<T>(arena: &mut Arena<AvlNode<T>>, root: &mut Option<u32>, n: u32) -> T {
    let (l, r) = (get_l(arena, n), get_r(arena, n));
    if let (Some(_), Some(r)) = (l, r) {
        let s = first(arena, Some(r)).expect("right subtree is non-empty");
        let sp = splice_out(arena, root, s);
        let successor = arena.free(s);
        let removed = std::mem::replace(&mut arena[n].v, successor.v);
        rebalance(arena, root, sp);
        return removed;
    }

    let np = splice_out(arena, root, n);
    let removed = arena.free(n).v;
    rebalance(arena, root, np.or(*root));
    removed
}

/// Checks links, stored heights, the balance invariant and ordering.
///
/// Returns a description of the first violation found.
pub fn assert_avl_tree<A, T, C>(arena: &A, root: Option<u32>, less: &C) -> Result<usize, String>
where
    A: Index<u32, Output = AvlNode<T>> + ?Sized,
    C: Fn(&T, &T) -> bool,
{
    let Some(root) = root else {
        return Ok(0);
    };
    if arena[root].p.is_some() {
        return Err("Root has parent".to_string());
    }

    let mut count = 0;
    let mut stack = vec![root];
    while let Some(i) = stack.pop() {
        count += 1;
        let node = &arena[i];
        for (side, child) in [("left", node.l), ("right", node.r)] {
            if let Some(c) = child {
                if arena[c].p != Some(i) {
                    return Err(format!("Broken parent link on {side} child of node {i}"));
                }
                stack.push(c);
            }
        }
        let lh = height(arena, node.l);
        let rh = height(arena, node.r);
        let expected = 1 + lh.max(rh);
        if node.h != expected {
            return Err(format!(
                "Height mismatch at node {i}: expected {expected}, got {}",
                node.h
            ));
        }
        if lh.abs_diff(rh) > 1 {
            return Err(format!("AVL balance violated at node {i}: left {lh}, right {rh}"));
        }
    }

    let mut curr = first(arena, Some(root));
    let mut prev: Option<u32> = None;
    while let Some(i) = curr {
        if let Some(p) = prev {
            if less(&arena[i].v, &arena[p].v) {
                return Err(format!("Node order violated between {p} and {i}"));
            }
        }
        prev = Some(i);
        curr = next(arena, i);
    }

    Ok(count)
}

/// Indented structural dump of the subtree at `node`.
pub fn print<A, T>(arena: &A, node: Option<u32>, tab: &str) -> String
where
    A: Index<u32, Output = AvlNode<T>> + ?Sized,
    T: Debug,
{
    match node {
        None => "∅".to_string(),
        Some(i) => {
            let n = &arena[i];
            let left = print(arena, n.l, &format!("{tab}  "));
            let right = print(arena, n.r, &format!("{tab}  "));
            format!(
                "Node[{i}] [h={}] {:?}\n{tab}L={left}\n{tab}R={right}",
                n.h, n.v
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn less(a: &i32, b: &i32) -> bool {
        a < b
    }

    fn build(values: &[i32]) -> (Arena<AvlNode<i32>>, Option<u32>) {
        let mut arena = Arena::new();
        let mut root = None;
        for &v in values {
            let (i, _) = arena.alloc(AvlNode::new(v));
            insert(&mut arena, &mut root, i, &less);
        }
        (arena, root)
    }

    fn collect_inorder(arena: &Arena<AvlNode<i32>>, root: Option<u32>) -> Vec<i32> {
        let mut out = Vec::new();
        let mut curr = first(arena, root);
        while let Some(i) = curr {
            out.push(arena[i].v);
            curr = next(arena, i);
        }
        out
    }

    /// Links a chain by hand, bypassing the balancing walk.
    fn chain(values: &[i32], left: bool) -> (Arena<AvlNode<i32>>, Option<u32>) {
        let mut arena = Arena::new();
        let mut prev: Option<u32> = None;
        let mut root = None;
        for &v in values {
            let (i, _) = arena.alloc(AvlNode::new(v));
            match prev {
                None => root = Some(i),
                Some(p) => {
                    if left {
                        set_l(&mut arena, p, Some(i));
                    } else {
                        set_r(&mut arena, p, Some(i));
                    }
                    set_p(&mut arena, i, Some(p));
                }
            }
            prev = Some(i);
        }
        // Heights bottom-up.
        let mut curr = prev;
        while let Some(i) = curr {
            update_height(&mut arena, i);
            curr = get_p(&arena, i);
        }
        (arena, root)
    }

    #[test]
    fn rotate_right_lifts_left_child_to_root() {
        let (mut arena, mut root) = chain(&[3, 2, 1], true);
        let top = rotate_right(&mut arena, &mut root, 0);
        assert_eq!(top, 1);
        assert_eq!(root, Some(1));
        assert_eq!(arena[1].p, None);
        assert_eq!(arena[1].l, Some(2));
        assert_eq!(arena[1].r, Some(0));
        assert_eq!(arena[0].p, Some(1));
        assert_eq!(arena[1].h, 2);
        assert_eq!(collect_inorder(&arena, root), vec![1, 2, 3]);
        assert_avl_tree(&arena, root, &less).unwrap();
    }

    #[test]
    fn rotate_left_lifts_right_child_to_root() {
        let (mut arena, mut root) = chain(&[1, 2, 3], false);
        let top = rotate_left(&mut arena, &mut root, 0);
        assert_eq!(top, 1);
        assert_eq!(root, Some(1));
        assert_eq!(collect_inorder(&arena, root), vec![1, 2, 3]);
        assert_avl_tree(&arena, root, &less).unwrap();
    }

    #[test]
    fn rotations_without_pivot_are_noops() {
        let (mut arena, mut root) = chain(&[1], false);
        assert_eq!(rotate_right(&mut arena, &mut root, 0), 0);
        assert_eq!(rotate_left(&mut arena, &mut root, 0), 0);
        assert_eq!(rotate_double_right(&mut arena, &mut root, 0), 0);
        assert_eq!(rotate_double_left(&mut arena, &mut root, 0), 0);
        assert_eq!(root, Some(0));

        // Left child present but no left-right grandchild.
        let (mut arena, mut root) = chain(&[3, 2, 1], true);
        assert_eq!(rotate_double_right(&mut arena, &mut root, 0), 0);
        assert_eq!(root, Some(0));
    }

    #[test]
    fn double_right_resolves_left_right_case() {
        // 3 -> left 1 -> right 2
        let mut arena = Arena::new();
        let (a, _) = arena.alloc(AvlNode::new(3));
        let (b, _) = arena.alloc(AvlNode::new(1));
        let (c, _) = arena.alloc(AvlNode::new(2));
        set_l(&mut arena, a, Some(b));
        set_p(&mut arena, b, Some(a));
        set_r(&mut arena, b, Some(c));
        set_p(&mut arena, c, Some(b));
        update_height(&mut arena, c);
        update_height(&mut arena, b);
        update_height(&mut arena, a);
        let mut root = Some(a);

        let top = rotate_double_right(&mut arena, &mut root, a);
        assert_eq!(top, c);
        assert_eq!(root, Some(c));
        assert_eq!(arena[c].l, Some(b));
        assert_eq!(arena[c].r, Some(a));
        assert_eq!(collect_inorder(&arena, root), vec![1, 2, 3]);
        assert_avl_tree(&arena, root, &less).unwrap();
    }

    #[test]
    fn double_left_resolves_right_left_case() {
        let mut arena = Arena::new();
        let (a, _) = arena.alloc(AvlNode::new(1));
        let (b, _) = arena.alloc(AvlNode::new(3));
        let (c, _) = arena.alloc(AvlNode::new(2));
        set_r(&mut arena, a, Some(b));
        set_p(&mut arena, b, Some(a));
        set_l(&mut arena, b, Some(c));
        set_p(&mut arena, c, Some(b));
        update_height(&mut arena, c);
        update_height(&mut arena, b);
        update_height(&mut arena, a);
        let mut root = Some(a);

        let top = rotate_double_left(&mut arena, &mut root, a);
        assert_eq!(top, c);
        assert_eq!(root, Some(c));
        assert_eq!(collect_inorder(&arena, root), vec![1, 2, 3]);
        assert_avl_tree(&arena, root, &less).unwrap();
    }

    #[test]
    fn rotation_below_root_rewires_grandparent() {
        let (mut arena, mut root) = build(&[10, 5, 20, 30]);
        // 20 has only a right child; rotate it left by hand.
        let n20 = find(&arena, root, &20, &less).unwrap();
        let n30 = find(&arena, root, &30, &less).unwrap();
        let top = rotate_left(&mut arena, &mut root, n20);
        assert_eq!(top, n30);
        let n10 = root.unwrap();
        assert_eq!(arena[n10].r, Some(n30));
        assert_eq!(arena[n30].p, Some(n10));
        assert_eq!(collect_inorder(&arena, root), vec![5, 10, 20, 30]);
        assert_avl_tree(&arena, root, &less).unwrap();
    }

    #[test]
    fn insert_keeps_balance_on_ascending_input() {
        let values: Vec<i32> = (0..64).collect();
        let (arena, root) = build(&values);
        assert_eq!(assert_avl_tree(&arena, root, &less), Ok(64));
        assert_eq!(height(&arena, root), 7);
    }

    #[test]
    fn remove_covers_every_structural_case() {
        let (mut arena, mut root) = build(&[50, 30, 70, 20, 40, 60, 80, 10]);

        // Leaf.
        let leaf = find(&arena, root, &10, &less).unwrap();
        assert_eq!(remove(&mut arena, &mut root, leaf), 10);
        assert_avl_tree(&arena, root, &less).unwrap();

        // One child.
        let (i, _) = arena.alloc(AvlNode::new(65));
        insert(&mut arena, &mut root, i, &less);
        let one = find(&arena, root, &60, &less).unwrap();
        assert_eq!(remove(&mut arena, &mut root, one), 60);
        assert_avl_tree(&arena, root, &less).unwrap();

        // Two children, the root itself.
        let top = root.unwrap();
        let removed = remove(&mut arena, &mut root, top);
        assert_eq!(removed, 50);
        assert_avl_tree(&arena, root, &less).unwrap();
        assert_eq!(collect_inorder(&arena, root), vec![20, 30, 40, 65, 70, 80]);
    }

    #[test]
    fn assert_avl_tree_reports_broken_heights() {
        let (mut arena, root) = build(&[2, 1, 3]);
        let top = root.unwrap();
        arena[top].h = 5;
        let err = assert_avl_tree(&arena, root, &less).unwrap_err();
        assert!(err.starts_with("Height mismatch"));
    }

    #[test]
    fn print_renders_structure() {
        let (arena, root) = build(&[2, 1, 3]);
        let out = print(&arena, root, "");
        assert!(out.starts_with("Node["));
        assert!(out.contains("[h=2] 2"));
        assert!(out.contains("[h=1] 1"));
    }
}
