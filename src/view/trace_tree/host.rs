use super::node::NodeId;

/// The widget tree the populator draws into.
///
/// Implementations own the actual rows (toolkit widgets, or the in-memory
/// `HeadlessTree`). All calls happen on the thread that owns the tree. The
/// host is expected to forward user expansion events to
/// `TracePopulator::on_expand`.
pub trait TreeHost {
    /// Create a row with `text` as the last child of `parent`, or as the last
    /// top-level row when `parent` is `None`.
    fn create_node(&mut self, parent: Option<NodeId>, text: &str) -> NodeId;

    /// Children of `node`, in display order
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Number of children of `node`
    fn child_count(&self, node: NodeId) -> usize {
        self.children(node).len()
    }

    /// Top-level rows, in display order
    fn roots(&self) -> Vec<NodeId>;

    /// Parent of `node` (None for top-level rows and unknown nodes)
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Remove `node` and all of its descendants
    fn dispose(&mut self, node: NodeId);

    /// Show `node` expanded or collapsed. This must not call back into the
    /// populator; programmatic expansion raises no expansion event.
    fn set_expanded(&mut self, node: NodeId, expanded: bool);

    fn is_expanded(&self, node: NodeId) -> bool;

    /// Suspend (`false`) or resume (`true`) repainting
    fn set_redraw(&mut self, enabled: bool);

    /// Scroll so that `node` is visible
    fn show_node(&mut self, node: NodeId);

    /// The row currently at the top of the viewport
    fn top_node(&self) -> Option<NodeId>;
}
