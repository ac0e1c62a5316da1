//! avl-tree-util - test support for avl-tree
//!
//! Seeded random generation ([`Fuzzer`]) and replayable operation scripts
//! ([`Trace`]) with a sorted-vector reference [`Model`].

pub mod fuzzer;
pub mod trace;

pub use fuzzer::Fuzzer;
pub use trace::{Model, Op, Trace};
