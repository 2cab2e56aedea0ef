//! Text views of a `NodeTree`: indented listing and termtree box drawing.

use std::collections::HashMap;

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::config::{RenderSettings, RenderStyle};
use crate::domain::{format_size, NodeKind, NodeTree, TreeError, TreeNode, TreeResult};

impl NodeTree {
    /// Indented listing with default settings: two spaces per level, sizes in MB.
    ///
    /// ```text
    /// + [Media] (Total: 6250.0 MB)
    ///   + [Movies] (Total: 4500.0 MB)
    ///     - GreatMovie.mkv (4500.0 MB)
    /// ```
    pub fn render(&self, idx: Index) -> TreeResult<String> {
        self.render_with(idx, &RenderSettings::default())
    }

    #[instrument(level = "debug", skip(self, settings))]
    pub fn render_with(&self, idx: Index, settings: &RenderSettings) -> TreeResult<String> {
        self.get(idx).ok_or(TreeError::NodeNotFound(idx))?;
        let sizes = self.subtree_sizes(idx);
        let mut out = String::new();
        for (current, node, depth) in self.iter(idx) {
            let indent = " ".repeat(depth * settings.indent_width);
            out.push_str(&format!(
                "{}{}\n",
                indent,
                label(current, node, &sizes, &settings.unit)
            ));
        }
        Ok(out)
    }

    /// Box-drawing view with the same line labels as `render_with`.
    ///
    /// Assembled bottom-up: in post-order every node's subtrees are the last
    /// `child_count` entries on the stack.
    #[instrument(level = "debug", skip(self, settings))]
    pub fn to_tree_string(&self, idx: Index, settings: &RenderSettings) -> TreeResult<Tree<String>> {
        self.get(idx).ok_or(TreeError::NodeNotFound(idx))?;
        let sizes = self.subtree_sizes(idx);
        let mut built: Vec<Tree<String>> = Vec::new();
        for (current, node) in self.iter_postorder(idx) {
            let leaves = built.split_off(built.len().saturating_sub(node.children().len()));
            built.push(Tree::new(label(current, node, &sizes, &settings.unit)).with_leaves(leaves));
        }
        built.pop().ok_or(TreeError::NodeNotFound(idx))
    }

    /// Renders `idx` in the view selected by `settings.style`.
    pub fn display(&self, idx: Index, settings: &RenderSettings) -> TreeResult<String> {
        match settings.style {
            RenderStyle::Indented => self.render_with(idx, settings),
            RenderStyle::Tree => Ok(self.to_tree_string(idx, settings)?.to_string()),
        }
    }
}

fn label(current: Index, node: &TreeNode, sizes: &HashMap<Index, f64>, unit: &str) -> String {
    match node.kind() {
        NodeKind::Leaf { size_mb } => format!("- {} ({} {})", node.name(), format_size(*size_mb), unit),
        NodeKind::Composite { .. } => format!(
            "+ [{}] (Total: {} {})",
            node.name(),
            format_size(sizes.get(&current).copied().unwrap_or_default()),
            unit
        ),
    }
}
