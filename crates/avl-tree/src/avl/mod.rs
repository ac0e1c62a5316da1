//! AVL tree: node type, rotation and balancing primitives, the owning
//! [`AvlTree`] container and its cursors.

pub mod cursor;
pub mod tree;
pub mod types;
pub mod util;

pub use cursor::{Cursor, IntoIter, Iter};
pub use tree::{AvlTree, NodeRef};
pub use types::{AvlNode, AvlNodeLike};
pub use util::{
    assert_avl_tree, insert, print, rebalance, remove, rotate_double_left, rotate_double_right,
    rotate_left, rotate_right,
};
