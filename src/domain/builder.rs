//! Tree builder for declarative, nested node specifications.

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::NodeTree;
use crate::domain::error::TreeResult;

/// Nested declaration of a tree.
///
/// Untagged: a table carrying `size_mb` is a leaf, anything else is a composite.
///
/// ```toml
/// name = "Media"
///
/// [[children]]
/// name = "Movies"
///
/// [[children.children]]
/// name = "GreatMovie.mkv"
/// size_mb = 4500.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Leaf {
        name: String,
        size_mb: f64,
    },
    Composite {
        name: String,
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
}

impl NodeSpec {
    pub fn leaf(name: impl Into<String>, size_mb: f64) -> Self {
        Self::Leaf {
            name: name.into(),
            size_mb,
        }
    }

    pub fn composite(name: impl Into<String>, children: Vec<NodeSpec>) -> Self {
        Self::Composite {
            name: name.into(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Leaf { name, .. } | Self::Composite { name, .. } => name,
        }
    }
}

/// Constructs a `NodeTree` from a `NodeSpec`, root first.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    tree: NodeTree,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree, preserving child order; the top-level `NodeSpec` becomes the root.
    #[instrument(level = "debug", skip_all, fields(root = %spec.name()))]
    pub fn build(mut self, spec: &NodeSpec) -> TreeResult<NodeTree> {
        let root = self.insert(spec)?;
        let mut stack: Vec<(&NodeSpec, Index)> = vec![(spec, root)];

        while let Some((current, current_idx)) = stack.pop() {
            if let NodeSpec::Composite { children, .. } = current {
                for child in children {
                    let child_idx = self.insert(child)?;
                    self.tree.add(current_idx, child_idx)?;
                    stack.push((child, child_idx));
                }
            }
        }

        self.tree.set_root(root)?;
        debug!("built tree with {} nodes", self.tree.len());
        Ok(self.tree)
    }

    fn insert(&mut self, spec: &NodeSpec) -> TreeResult<Index> {
        match spec {
            NodeSpec::Leaf { name, size_mb } => self.tree.insert_leaf(name, *size_mb),
            NodeSpec::Composite { name, .. } => Ok(self.tree.insert_composite(name)),
        }
    }
}
