use std::collections::TryReserveError;

use thiserror::Error;

/// Precondition and allocation failures reported by [`AvlTree`](crate::AvlTree)
/// and its cursors.
///
/// Lookups that find nothing are not errors; they return `None` / `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The handle is stale, was issued by another tree, or points at a vacant
    /// slot.
    #[error("node handle does not belong to this tree")]
    InvalidNode,

    #[error("cannot dereference the end cursor")]
    EndDereference,

    #[error("cannot advance the end cursor")]
    AdvancePastEnd,

    #[error("cannot retreat the end cursor")]
    RetreatFromEnd,

    #[error("node allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
}

pub type Result<T> = std::result::Result<T, TreeError>;
