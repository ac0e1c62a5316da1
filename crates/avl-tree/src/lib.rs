//! Arena-backed AVL tree.
//!
//! [`AvlTree`] is an ordered multiset kept height-balanced by rotations. Nodes
//! live in a slot [`Arena`](arena::Arena) and refer to their children and to
//! their parent by `u32` slot index instead of by pointer, so the parent back
//! link needs no shared ownership and in-order traversal needs no stack.
//!
//! ```
//! use avl_tree::AvlTree;
//!
//! let mut tree: AvlTree<i32> = [50, 30, 70, 20, 40, 60, 80].into_iter().collect();
//! assert_eq!(tree.height(), 3);
//!
//! let seventy = tree.find(&70).unwrap();
//! assert_eq!(tree.remove(seventy), Ok(70));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [20, 30, 40, 50, 60, 80]);
//! ```
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`types`] | [`Node`] link trait and the [`Less`] ordering predicate |
//! [`arena`] | Generation-checked slot storage for nodes |
//! [`util`] | `first`, `last`, `next`, `prev` over any [`Node`] arena |
//! [`avl`] | Rotations, balancing walk, [`AvlTree`], [`Cursor`], [`Iter`] |
//! [`error`] | [`TreeError`] |

pub mod arena;
pub mod avl;
pub mod error;
pub mod types;
pub mod util;

pub use avl::{AvlTree, Cursor, IntoIter, Iter, NodeRef};
pub use error::{Result, TreeError};
pub use types::{natural_less, Less, Node};
