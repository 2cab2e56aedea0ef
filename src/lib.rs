//! Hierarchical size container.
//!
//! A `NodeTree` holds named leaves with a size in MB and composites whose size is
//! the recursive sum of their children. Trees can be built node by node or from a
//! declarative `NodeSpec`, and rendered as an indented listing or a box-drawing tree.

pub mod config;
pub mod domain;
pub mod errors;
pub mod render;
pub mod util;

pub use config::{RenderSettings, RenderStyle, Settings};
pub use domain::{NodeKind, NodeSpec, NodeTree, TreeBuilder, TreeError, TreeNode, TreeResult};
pub use errors::{SettingsError, SettingsResult};
pub use generational_arena::Index;
