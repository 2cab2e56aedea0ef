//! Domain entities: node payloads stored in the arena

use std::fmt;

use generational_arena::Index;

/// What a node is: a sized leaf or a container of other nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Terminal node with a direct size in MB
    Leaf { size_mb: f64 },
    /// Container whose size is the sum of its children, in insertion order
    Composite { children: Vec<Index> },
}

/// Tree node in the arena-based hierarchy.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub(crate) name: String,
    /// A composite currently holding this node; lookup only, never ownership
    pub(crate) parent: Option<Index>,
    pub(crate) kind: NodeKind,
}

impl TreeNode {
    pub(crate) fn leaf(name: String, size_mb: f64) -> Self {
        Self {
            name,
            parent: None,
            kind: NodeKind::Leaf { size_mb },
        }
    }

    pub(crate) fn composite(name: String) -> Self {
        Self {
            name,
            parent: None,
            kind: NodeKind::Composite {
                children: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, NodeKind::Composite { .. })
    }

    /// Child handles in insertion order; empty for leaves.
    pub fn children(&self) -> &[Index] {
        match &self.kind {
            NodeKind::Composite { children } => children,
            NodeKind::Leaf { .. } => &[],
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Leaf { size_mb } => write!(f, "{} ({} MB)", self.name, format_size(*size_mb)),
            NodeKind::Composite { .. } => write!(f, "[{}]", self.name),
        }
    }
}

/// Format a size the way the media listings print it.
///
/// Whole values keep one decimal (`4500.0`), everything else prints the
/// shortest exact representation (`850.5`). Never switches to exponent
/// notation: `1e16` prints as `10000000000000000`, `1e-5` as `0.00001`.
pub fn format_size(size_mb: f64) -> String {
    if size_mb.fract() == 0.0 && size_mb.abs() < 1e16 {
        format!("{:.1}", size_mb)
    } else {
        format!("{}", size_mb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(4500.0, "4500.0")]
    #[case(850.5, "850.5")]
    #[case(0.0, "0.0")]
    #[case(6250.5, "6250.5")]
    #[case(0.25, "0.25")]
    #[case(1e16, "10000000000000000")]
    #[case(1e-5, "0.00001")]
    fn test_format_size(#[case] size: f64, #[case] expected: &str) {
        assert_eq!(format_size(size), expected);
    }

    #[test]
    fn test_leaf_has_no_children() {
        let node = TreeNode::leaf("ep1.mkv".into(), 850.0);
        assert!(!node.is_composite());
        assert!(node.children().is_empty());
        assert_eq!(node.to_string(), "ep1.mkv (850.0 MB)");
    }

    #[test]
    fn test_composite_display() {
        let node = TreeNode::composite("Media".into());
        assert!(node.is_composite());
        assert_eq!(node.to_string(), "[Media]");
    }
}
