//! Domain layer: the hierarchical size container
//!
//! This layer is independent of external concerns (no I/O, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;

pub use arena::{Ancestors, NodeTree, PostOrderIterator, TreeIterator};
pub use builder::{NodeSpec, TreeBuilder};
pub use entities::{format_size, NodeKind, TreeNode};
pub use error::{TreeError, TreeResult};
