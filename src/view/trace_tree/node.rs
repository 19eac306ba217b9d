use super::lines::split_lines;
use std::fmt;

/// Unique identifier for a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// One row in the trace tree
#[derive(Debug, Clone)]
pub struct TraceNode {
    /// Unique identifier
    pub id: NodeId,
    /// Display text
    pub text: String,
    /// Parent node ID (None for top-level rows)
    pub parent: Option<NodeId>,
    /// Child node IDs, in display order
    pub children: Vec<NodeId>,
    /// Whether the row is shown expanded
    pub expanded: bool,
}

impl TraceNode {
    /// Create a new, collapsed tree node
    pub fn new(id: NodeId, text: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            id,
            text: text.into(),
            parent,
            children: Vec::new(),
            expanded: false,
        }
    }

    /// Check if this node is a top-level row
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check if this node has any child rows
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Raw text waiting to become child rows of an unexpanded node.
///
/// Segments are stored exactly as appended; line splitting happens once, at
/// expansion time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingBuffer {
    segments: Vec<String>,
}

impl PendingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw text segment
    pub fn push(&mut self, text: impl Into<String>) {
        self.segments.push(text.into());
    }

    /// Raw segments in append order
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Non-empty lines across all segments, in append order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().flat_map(|segment| split_lines(segment))
    }

    /// Number of rows this buffer will materialize into
    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Population state of a tree node.
///
/// A node never holds a buffer and materialized children at the same time:
/// it is `Pending` until first expanded, and `Materialized` from then on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodeState {
    /// No children and nothing buffered
    #[default]
    Empty,
    /// Child text buffered, no child rows created yet
    Pending(PendingBuffer),
    /// Children (if any) are real rows
    Materialized,
}

impl NodeState {
    /// Check if this node has buffered text
    pub fn is_pending(&self) -> bool {
        matches!(self, NodeState::Pending(_))
    }

    /// Check if this node's children are real rows
    pub fn is_materialized(&self) -> bool {
        *self == NodeState::Materialized
    }

    /// Check if nothing has been appended under this node
    pub fn is_empty(&self) -> bool {
        *self == NodeState::Empty
    }

    /// The pending buffer, if any
    pub fn pending(&self) -> Option<&PendingBuffer> {
        match self {
            NodeState::Pending(buffer) => Some(buffer),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = TraceNode::new(NodeId(0), "  1:    O: O1 (initialize)", None);

        assert_eq!(node.id, NodeId(0));
        assert!(node.is_root());
        assert!(!node.has_children());
        assert!(!node.expanded);
    }

    #[test]
    fn test_child_node() {
        let node = TraceNode::new(NodeId(3), "--- input phase ---", Some(NodeId(1)));

        assert!(!node.is_root());
        assert_eq!(node.parent, Some(NodeId(1)));
    }

    #[test]
    fn test_pending_buffer_lines() {
        let mut buffer = PendingBuffer::new();
        assert!(buffer.is_empty());

        buffer.push("a\n\nb");
        buffer.push("");
        buffer.push("c\n");

        assert!(!buffer.is_empty());
        assert_eq!(buffer.segments().len(), 3);
        assert_eq!(buffer.lines().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(buffer.line_count(), 3);
    }

    #[test]
    fn test_node_states() {
        let mut state = NodeState::default();
        assert!(state.is_empty());
        assert!(state.pending().is_none());

        let mut buffer = PendingBuffer::new();
        buffer.push("Firing propose*init");
        state = NodeState::Pending(buffer);
        assert!(state.is_pending());
        assert!(!state.is_materialized());
        assert_eq!(state.pending().map(PendingBuffer::line_count), Some(1));

        state = NodeState::Materialized;
        assert!(state.is_materialized());
        assert!(!state.is_pending());
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(7).to_string(), "Node(7)");
    }
}
