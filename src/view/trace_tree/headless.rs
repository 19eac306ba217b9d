use super::host::TreeHost;
use super::node::{NodeId, TraceNode};
use super::populator::TracePopulator;
use std::collections::HashMap;

/// In-memory widget tree
///
/// Stands in for a toolkit tree control: rows live in an arena indexed by
/// `NodeId`, and redraw suspension and node creation are counted so callers
/// can check that work was batched.
#[derive(Debug, Default)]
pub struct HeadlessTree {
    /// All nodes indexed by ID
    nodes: HashMap<NodeId, TraceNode>,
    /// Top-level rows in display order
    roots: Vec<NodeId>,
    /// Next node ID to assign
    next_id: usize,
    /// Row scrolled to the top of the viewport, if set explicitly
    scroll_top: Option<NodeId>,
    /// Last row passed to `show_node`
    last_shown: Option<NodeId>,
    redraw_enabled: bool,
    redraw_suspensions: usize,
    nodes_created: usize,
}

impl HeadlessTree {
    pub fn new() -> Self {
        Self {
            redraw_enabled: true,
            ..Default::default()
        }
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&TraceNode> {
        self.nodes.get(&id)
    }

    /// Display text of a node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get_node(id).map(|node| node.text.as_str())
    }

    /// Display text of each child of `id`, in order
    pub fn child_texts(&self, id: NodeId) -> Vec<&str> {
        self.get_node(id)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&child| self.text(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get number of nodes currently alive
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total rows ever created (disposed rows included)
    pub fn nodes_created(&self) -> usize {
        self.nodes_created
    }

    /// How many times repainting was suspended
    pub fn redraw_suspensions(&self) -> usize {
        self.redraw_suspensions
    }

    pub fn redraw_enabled(&self) -> bool {
        self.redraw_enabled
    }

    pub fn last_shown(&self) -> Option<NodeId> {
        self.last_shown
    }

    /// Scroll so that `id` is the top row of the viewport
    pub fn scroll_to(&mut self, id: NodeId) {
        self.scroll_top = Some(id);
    }

    /// Get all visible nodes in tree order
    ///
    /// Returns a flat list of rows that should be on screen, respecting the
    /// expansion state of their parents.
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        let mut visible = Vec::new();
        for &root in &self.roots {
            self.collect_visible_recursive(root, &mut visible);
        }
        visible
    }

    fn collect_visible_recursive(&self, id: NodeId, visible: &mut Vec<NodeId>) {
        visible.push(id);

        if let Some(node) = self.get_node(id) {
            if node.expanded {
                for &child_id in &node.children {
                    self.collect_visible_recursive(child_id, visible);
                }
            }
        }
    }

    /// Get the depth of a node (top-level rows are 0)
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.get_node(id).and_then(|n| n.parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.get_node(parent).and_then(|n| n.parent);
        }
        depth
    }

    fn remove_node_recursive(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child_id in node.children {
                self.remove_node_recursive(child_id);
            }
        }
    }
}

impl TreeHost for HeadlessTree {
    fn create_node(&mut self, parent: Option<NodeId>, text: &str) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes_created += 1;

        match parent {
            Some(parent_id) => match self.nodes.get_mut(&parent_id) {
                Some(parent_node) => parent_node.children.push(id),
                None => {
                    tracing::warn!("Creating {} under missing parent {}", id, parent_id);
                }
            },
            None => self.roots.push(id),
        }

        self.nodes.insert(id, TraceNode::new(id, text, parent));
        id
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.get_node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn child_count(&self, node: NodeId) -> usize {
        self.get_node(node).map_or(0, |n| n.children.len())
    }

    fn roots(&self) -> Vec<NodeId> {
        self.roots.clone()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get_node(node).and_then(|n| n.parent)
    }

    fn dispose(&mut self, node: NodeId) {
        match self.parent(node) {
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(&parent_id) {
                    parent.children.retain(|&child| child != node);
                }
            }
            None => self.roots.retain(|&root| root != node),
        }
        self.remove_node_recursive(node);

        if self.scroll_top.is_some_and(|top| !self.nodes.contains_key(&top)) {
            self.scroll_top = None;
        }
        if self.last_shown.is_some_and(|shown| !self.nodes.contains_key(&shown)) {
            self.last_shown = None;
        }
    }

    fn set_expanded(&mut self, node: NodeId, expanded: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.expanded = expanded;
        }
    }

    fn is_expanded(&self, node: NodeId) -> bool {
        self.get_node(node).is_some_and(|n| n.expanded)
    }

    fn set_redraw(&mut self, enabled: bool) {
        if !enabled && self.redraw_enabled {
            self.redraw_suspensions += 1;
        }
        self.redraw_enabled = enabled;
    }

    fn show_node(&mut self, node: NodeId) {
        if !self.nodes.contains_key(&node) {
            return;
        }
        // Revealing a row opens every ancestor
        let mut current = self.parent(node);
        while let Some(ancestor) = current {
            self.set_expanded(ancestor, true);
            current = self.parent(ancestor);
        }
        self.last_shown = Some(node);
    }

    fn top_node(&self) -> Option<NodeId> {
        self.scroll_top.or_else(|| self.roots.first().copied())
    }
}

impl TracePopulator<HeadlessTree> {
    /// Render the visible rows as indented text.
    ///
    /// Rows that can be opened are marked `+`, open rows with children `-`.
    pub fn render(&self) -> String {
        let tree = self.host();
        tree.visible_nodes()
            .into_iter()
            .filter_map(|id| {
                let node = tree.get_node(id)?;
                let expandable = node.has_children() || self.state(id).is_pending();
                let marker = match (expandable, node.expanded) {
                    (false, _) => ' ',
                    (true, true) => '-',
                    (true, false) => '+',
                };
                Some(format!(
                    "{}{} {}",
                    "  ".repeat(tree.depth(id)),
                    marker,
                    node.text
                ))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> (HeadlessTree, NodeId, NodeId) {
        // d1
        // ├── a
        // │   └── a1
        // └── b
        // d2
        let mut tree = HeadlessTree::new();
        let d1 = tree.create_node(None, "d1");
        let a = tree.create_node(Some(d1), "a");
        tree.create_node(Some(a), "a1");
        tree.create_node(Some(d1), "b");
        let d2 = tree.create_node(None, "d2");
        (tree, d1, d2)
    }

    #[test]
    fn test_create_and_query() {
        let (tree, d1, d2) = sample_tree();

        assert_eq!(tree.roots(), vec![d1, d2]);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.nodes_created(), 5);
        assert_eq!(tree.child_texts(d1), vec!["a", "b"]);
        assert_eq!(tree.child_count(d2), 0);
        assert_eq!(tree.parent(d1), None);
    }

    #[test]
    fn test_dispose_removes_descendants() {
        let (mut tree, d1, d2) = sample_tree();
        let a = tree.children(d1)[0];

        tree.dispose(a);
        assert_eq!(tree.child_texts(d1), vec!["b"]);
        assert_eq!(tree.node_count(), 3);

        tree.dispose(d1);
        assert_eq!(tree.roots(), vec![d2]);
        assert_eq!(tree.node_count(), 1);
        // Creation count survives disposal
        assert_eq!(tree.nodes_created(), 5);
    }

    #[test]
    fn test_visible_nodes_respect_expansion() {
        let (mut tree, d1, _d2) = sample_tree();
        assert_eq!(tree.visible_nodes().len(), 2);

        tree.set_expanded(d1, true);
        assert_eq!(tree.visible_nodes().len(), 4);

        let a = tree.children(d1)[0];
        tree.set_expanded(a, true);
        assert_eq!(tree.visible_nodes().len(), 5);
        assert_eq!(tree.depth(tree.children(a)[0]), 2);
    }

    #[test]
    fn test_redraw_suspensions_counted_once_per_batch() {
        let mut tree = HeadlessTree::new();
        assert!(tree.redraw_enabled());

        tree.set_redraw(false);
        tree.set_redraw(false);
        tree.set_redraw(true);
        assert_eq!(tree.redraw_suspensions(), 1);
        assert!(tree.redraw_enabled());
    }

    #[test]
    fn test_show_node_opens_ancestors() {
        let (mut tree, d1, _d2) = sample_tree();
        let a = tree.children(d1)[0];
        let a1 = tree.children(a)[0];

        tree.show_node(a1);
        assert!(tree.is_expanded(d1));
        assert!(tree.is_expanded(a));
        assert_eq!(tree.last_shown(), Some(a1));
    }

    #[test]
    fn test_top_node_defaults_to_first_root() {
        let (mut tree, d1, d2) = sample_tree();
        assert_eq!(tree.top_node(), Some(d1));

        tree.scroll_to(d2);
        assert_eq!(tree.top_node(), Some(d2));

        tree.dispose(d2);
        assert_eq!(tree.top_node(), Some(d1));

        assert_eq!(HeadlessTree::new().top_node(), None);
    }
}
