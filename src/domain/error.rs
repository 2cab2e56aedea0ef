//! Domain-level errors (no external dependencies)

use generational_arena::Index;
use thiserror::Error;

/// Errors raised by tree mutation and lookup.
///
/// Out-of-range child lookups are not errors: `NodeTree::child_at` returns `None`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("cannot {operation} children on leaf: {name}")]
    UnsupportedOperation { operation: &'static str, name: String },

    #[error("child not found in {parent}: {child}")]
    ChildNotFound { parent: String, child: String },

    #[error("node not found: {0:?}")]
    NodeNotFound(Index),

    #[error("invalid size for {name}: {size}")]
    InvalidSize { name: String, size: f64 },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
