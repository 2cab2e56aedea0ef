use std::collections::HashMap;

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::entities::{NodeKind, TreeNode};
use crate::domain::error::{TreeError, TreeResult};

/// Arena-based container of named, sized nodes.
///
/// Uses generational arena for memory-safe node handles and O(1) lookups.
/// The arena owns every node; composites refer to their children by handle and
/// children refer back to their container by handle.
///
/// Sizes are never cached: `size` walks the subtree on every call.
/// Callers must not create cycles, traversal does not detect them.
#[derive(Debug)]
pub struct NodeTree {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Entry node, None until set
    root: Option<Index>,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Creates a detached leaf; the size must be finite and non-negative.
    #[instrument(level = "trace", skip(self, name), fields(name = %name.as_ref()))]
    pub fn insert_leaf(&mut self, name: impl AsRef<str>, size_mb: f64) -> TreeResult<Index> {
        let name = name.as_ref();
        if !size_mb.is_finite() || size_mb < 0.0 {
            return Err(TreeError::InvalidSize {
                name: name.to_string(),
                size: size_mb,
            });
        }
        Ok(self.arena.insert(TreeNode::leaf(name.to_string(), size_mb)))
    }

    #[instrument(level = "trace", skip(self, name), fields(name = %name.as_ref()))]
    pub fn insert_composite(&mut self, name: impl AsRef<str>) -> Index {
        self.arena.insert(TreeNode::composite(name.as_ref().to_string()))
    }

    pub fn set_root(&mut self, idx: Index) -> TreeResult<()> {
        self.node(idx)?;
        self.root = Some(idx);
        Ok(())
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn get(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn name(&self, idx: Index) -> Option<&str> {
        self.get(idx).map(TreeNode::name)
    }

    /// Number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn is_composite(&self, idx: Index) -> bool {
        self.get(idx).is_some_and(TreeNode::is_composite)
    }

    /// Appends `child` to the composite `parent` and points its back-reference at `parent`.
    ///
    /// The same child may be added more than once; every occurrence counts toward the size.
    #[instrument(level = "debug", skip(self))]
    pub fn add(&mut self, parent: Index, child: Index) -> TreeResult<()> {
        self.node(child)?;
        self.children_mut(parent, "add")?.push(child);
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
        debug!(
            "added {:?} to {:?}",
            self.name(child).unwrap_or_default(),
            self.name(parent).unwrap_or_default()
        );
        Ok(())
    }

    /// Removes the first occurrence of `child` from the composite `parent`.
    ///
    /// Once `parent` holds no further occurrence, a back-reference pointing at it
    /// moves to another composite still holding `child`, or is cleared.
    /// The removed node stays in the arena and can be added again.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, parent: Index, child: Index) -> TreeResult<()> {
        let child_name = self.node(child)?.name().to_string();
        let position = self
            .children_mut(parent, "remove")?
            .iter()
            .position(|&c| c == child);
        let Some(position) = position else {
            return Err(TreeError::ChildNotFound {
                parent: self.node(parent)?.name().to_string(),
                child: child_name,
            });
        };

        let children = self.children_mut(parent, "remove")?;
        children.remove(position);
        let still_contained = children.contains(&child);

        if !still_contained && self.parent(child) == Some(parent) {
            let holder = self.containing_composite(child);
            if let Some(node) = self.arena.get_mut(child) {
                node.parent = holder;
            }
        }
        debug!("removed {:?} at position {}", child_name, position);
        Ok(())
    }

    /// Child at zero-based `position`; None for leaves, unknown nodes and out-of-range positions.
    #[instrument(level = "trace", skip(self))]
    pub fn child_at(&self, idx: Index, position: usize) -> Option<Index> {
        self.get(idx)?.children().get(position).copied()
    }

    pub fn children(&self, idx: Index) -> &[Index] {
        self.get(idx).map(TreeNode::children).unwrap_or_default()
    }

    pub fn child_count(&self, idx: Index) -> usize {
        self.children(idx).len()
    }

    /// First child of `idx` named `name`.
    pub fn find_child(&self, idx: Index, name: &str) -> Option<Index> {
        self.children(idx)
            .iter()
            .copied()
            .find(|&child| self.name(child) == Some(name))
    }

    /// Stored size for a leaf, sum over every leaf occurrence below a composite.
    #[instrument(level = "trace", skip(self))]
    pub fn size(&self, idx: Index) -> TreeResult<f64> {
        self.node(idx)?;
        Ok(self
            .iter(idx)
            .filter_map(|(_, node, _)| match node.kind() {
                NodeKind::Leaf { size_mb } => Some(*size_mb),
                NodeKind::Composite { .. } => None,
            })
            .sum())
    }

    /// Sizes of every node below and including `idx`, computed in one post-order pass.
    pub(crate) fn subtree_sizes(&self, idx: Index) -> HashMap<Index, f64> {
        let mut sizes = HashMap::new();
        for (current, node) in self.iter_postorder(idx) {
            let size = match node.kind() {
                NodeKind::Leaf { size_mb } => *size_mb,
                NodeKind::Composite { children } => children
                    .iter()
                    .filter_map(|child| sizes.get(child))
                    .sum::<f64>(),
            };
            sizes.insert(current, size);
        }
        sizes
    }

    pub fn parent(&self, idx: Index) -> Option<Index> {
        self.get(idx)?.parent()
    }

    /// Walks the back-references upward, nearest container first.
    pub fn ancestors(&self, idx: Index) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(idx),
        }
    }

    /// Names from the outermost container down to `idx`; empty for unknown nodes.
    pub fn path(&self, idx: Index) -> Vec<&str> {
        let Some(node) = self.get(idx) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = std::iter::once(node.name())
            .chain(self.ancestors(idx).map(|(_, n)| n.name()))
            .collect();
        names.reverse();
        names
    }

    pub fn path_string(&self, idx: Index) -> String {
        self.path(idx).iter().join("/")
    }

    /// Number of levels in the subtree below and including `idx`; 0 for unknown nodes.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self, idx: Index) -> usize {
        self.iter(idx)
            .map(|(_, _, depth)| depth)
            .max()
            .map_or(0, |deepest| deepest + 1)
    }

    /// Collects all leaves below `idx` in depth-first pre-order.
    ///
    /// Empty composites are not leaves.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self, idx: Index) -> Vec<Index> {
        self.iter(idx)
            .filter(|(_, node, _)| !node.is_composite())
            .map(|(leaf, _, _)| leaf)
            .collect()
    }

    pub fn iter(&self, start: Index) -> TreeIterator<'_> {
        TreeIterator::new(self, start)
    }

    pub fn iter_postorder(&self, start: Index) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, start)
    }

    fn node(&self, idx: Index) -> TreeResult<&TreeNode> {
        self.get(idx).ok_or(TreeError::NodeNotFound(idx))
    }

    /// Any composite whose child list holds `child`.
    fn containing_composite(&self, child: Index) -> Option<Index> {
        self.arena
            .iter()
            .find(|(_, node)| node.children().contains(&child))
            .map(|(idx, _)| idx)
    }

    fn children_mut(&mut self, idx: Index, operation: &'static str) -> TreeResult<&mut Vec<Index>> {
        let node = self
            .arena
            .get_mut(idx)
            .ok_or(TreeError::NodeNotFound(idx))?;
        match &mut node.kind {
            NodeKind::Composite { children } => Ok(children),
            NodeKind::Leaf { .. } => Err(TreeError::UnsupportedOperation {
                operation,
                name: node.name.clone(),
            }),
        }
    }
}

/// Depth-first pre-order traversal yielding `(handle, node, depth)`, start node at depth 0.
pub struct TreeIterator<'a> {
    tree: &'a NodeTree,
    stack: Vec<(Index, usize)>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a NodeTree, start: Index) -> Self {
        Self {
            tree,
            stack: vec![(start, 0)],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, depth)) = self.stack.pop() {
            if let Some(node) = self.tree.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children().iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((current_idx, node, depth));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a NodeTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a NodeTree, start: Index) -> Self {
        Self {
            tree,
            stack: vec![(start, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children().iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

/// Upward walk over back-references.
pub struct Ancestors<'a> {
    tree: &'a NodeTree,
    next: Option<Index>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let node = self.tree.get(idx)?;
        self.next = node.parent();
        Some((idx, node))
    }
}
