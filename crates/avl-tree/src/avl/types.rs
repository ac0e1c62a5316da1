use crate::types::Node;

/// A single tree node as stored in the arena.
#[derive(Clone, Debug)]
pub struct AvlNode<T> {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub v: T,
    /// Height of the subtree rooted here. A leaf is `1`, an absent child `0`.
    pub h: u32,
}

impl<T> AvlNode<T> {
    pub fn new(v: T) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            v,
            h: 1,
        }
    }
}

impl<T> Node for AvlNode<T> {
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

/// Height-tracking node behavior used by rotations and the balancing walk.
pub trait AvlNodeLike: Node {
    fn height(&self) -> u32;
    fn set_height(&mut self, h: u32);
}

impl<T> AvlNodeLike for AvlNode<T> {
    fn height(&self) -> u32 {
        self.h
    }

    fn set_height(&mut self, h: u32) {
        self.h = h;
    }
}
