use super::host::TreeHost;
use super::lines::{has_lines, split_lines};
use super::node::{NodeId, NodeState, PendingBuffer};
use crate::config::TraceViewConfig;
use std::collections::HashMap;

static EMPTY_STATE: NodeState = NodeState::Empty;

/// Trace tree with deferred child population
///
/// Sub-lines appended under a row are kept as raw text until the row is
/// expanded, since creating toolkit rows costs far more than storing strings.
/// Top-level rows are always created immediately.
///
/// Must only be used from the thread that owns the host tree; producers on
/// other threads go through `services::ui_queue`.
#[derive(Debug)]
pub struct TracePopulator<H: TreeHost> {
    host: H,
    /// Population state per row; rows without an entry are `Empty`
    states: HashMap<NodeId, NodeState>,
    /// Row that receives sub-text (the most recent top-level row)
    current_parent: Option<NodeId>,
    cache_sub_text: bool,
    auto_expand: bool,
    page_size: usize,
}

impl<H: TreeHost> TracePopulator<H> {
    /// Create a populator with caching enabled and default paging
    pub fn new(host: H) -> Self {
        Self::from_config(host, &TraceViewConfig::default())
    }

    pub fn from_config(host: H, config: &TraceViewConfig) -> Self {
        Self {
            host,
            states: HashMap::new(),
            current_parent: None,
            cache_sub_text: config.cache_sub_text,
            auto_expand: config.auto_expand,
            page_size: config.page_size.max(1),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Direct access to the host. Rows removed here keep their population
    /// state until `clear`; use `dispose` to remove rows.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Population state of a row
    pub fn state(&self, node: NodeId) -> &NodeState {
        self.states.get(&node).unwrap_or(&EMPTY_STATE)
    }

    /// Number of rows `node` would gain if expanded now
    pub fn pending_line_count(&self, node: NodeId) -> usize {
        self.state(node).pending().map_or(0, PendingBuffer::line_count)
    }

    /// Row that currently receives sub-text
    pub fn current_parent(&self) -> Option<NodeId> {
        self.current_parent
    }

    /// Whether sub-lines are buffered until expansion
    pub fn caching_enabled(&self) -> bool {
        self.cache_sub_text && !self.auto_expand
    }

    /// Turn sub-text caching on or off. Rows that are already pending keep
    /// their buffers and can still be expanded.
    pub fn set_cache_sub_text(&mut self, enabled: bool) {
        self.cache_sub_text = enabled;
    }

    pub fn set_auto_expand(&mut self, enabled: bool) {
        self.auto_expand = enabled;
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Append text under `parent`.
    ///
    /// While caching is enabled and `parent` has no materialized children,
    /// the text is buffered and no rows are created. Otherwise every
    /// non-empty line becomes a child row right away.
    ///
    /// Returns the number of rows created.
    pub fn append_line(&mut self, parent: NodeId, text: &str) -> usize {
        if !has_lines(text) {
            return 0;
        }

        let materialized =
            self.state(parent).is_materialized() || self.host.child_count(parent) > 0;

        if self.caching_enabled() && !materialized {
            let state = self.states.entry(parent).or_default();
            if !state.is_pending() {
                *state = NodeState::Pending(PendingBuffer::new());
            }
            if let NodeState::Pending(buffer) = state {
                buffer.push(text);
            }
            return 0;
        }

        // A row reached through the immediate path may still hold text
        // buffered while caching was on; keep the original order.
        self.expand(parent);

        let mut created = 0;
        for line in split_lines(text) {
            self.host.create_node(Some(parent), line);
            created += 1;
        }
        self.states.insert(parent, NodeState::Materialized);

        if self.auto_expand && !self.host.is_expanded(parent) {
            self.host.set_expanded(parent, true);
        }

        created
    }

    /// Append top-level rows, one per non-empty line.
    ///
    /// The last row created becomes the current parent for sub-text and is
    /// scrolled into view.
    pub fn append_top_level(&mut self, text: &str) -> Option<NodeId> {
        if !has_lines(text) {
            return None;
        }

        self.host.set_redraw(false);

        let mut last = None;
        for line in split_lines(text) {
            last = Some(self.host.create_node(None, line));
        }

        if let Some(root) = last {
            self.host.show_node(root);
            self.current_parent = Some(root);
        }

        self.host.set_redraw(true);
        last
    }

    /// Append sub-text under the current parent, creating an untitled
    /// top-level row first if there is none.
    pub fn append_sub_text(&mut self, text: &str) -> usize {
        let parent = match self.current_parent {
            Some(parent) => parent,
            None => {
                let root = self.host.create_node(None, "");
                self.current_parent = Some(root);
                root
            }
        };
        self.append_line(parent, text)
    }

    /// Materialize a row's buffered text into child rows.
    ///
    /// Rows without a buffer (already expanded, or never cached) are left
    /// alone. Returns the number of rows created.
    pub fn expand(&mut self, node: NodeId) -> usize {
        if !self.state(node).is_pending() {
            return 0;
        }

        let Some(NodeState::Pending(buffer)) = self.states.insert(node, NodeState::Materialized)
        else {
            return 0;
        };

        let mut created = 0;
        for line in buffer.lines() {
            self.host.create_node(Some(node), line);
            created += 1;
        }

        tracing::trace!("Materialized {} rows under {}", created, node);
        created
    }

    /// Expansion notification from the host (the user opened `node`)
    pub fn on_expand(&mut self, node: NodeId) -> usize {
        if !self.state(node).is_pending() {
            return 0;
        }

        self.host.set_redraw(false);
        let created = self.expand(node);
        self.host.set_redraw(true);
        created
    }

    /// Materialize top-level rows `start..start + count` (clamped to the
    /// number of rows), with repainting suspended once for the whole batch.
    pub fn expand_range(&mut self, start: usize, count: usize) -> usize {
        let roots = self.host.roots();
        let end = start.saturating_add(count).min(roots.len());
        if start >= end {
            return 0;
        }

        self.host.set_redraw(false);
        let created = roots[start..end].iter().map(|&root| self.expand(root)).sum();
        self.host.set_redraw(true);
        created
    }

    /// Materialize every top-level row
    pub fn expand_all(&mut self) -> usize {
        let count = self.host.roots().len();
        self.expand_range(0, count)
    }

    /// Open or close top-level rows `start..start + count`.
    ///
    /// Programmatic expansion raises no expansion event on a toolkit, so
    /// buffered text is materialized here before the row is opened.
    pub fn set_range_expanded(&mut self, start: usize, count: usize, expanded: bool) -> usize {
        let roots = self.host.roots();
        let end = start.saturating_add(count).min(roots.len());
        if start >= end {
            return 0;
        }

        self.host.set_redraw(false);
        let mut created = 0;
        for &root in &roots[start..end] {
            if expanded {
                created += self.expand(root);
            }
            self.host.set_expanded(root, expanded);
        }
        self.host.set_redraw(true);
        created
    }

    /// Open or close every top-level row
    pub fn set_all_expanded(&mut self, expanded: bool) -> usize {
        let count = self.host.roots().len();
        self.set_range_expanded(0, count, expanded)
    }

    pub fn collapse_all(&mut self) {
        self.set_all_expanded(false);
    }

    /// Open or close one page of top-level rows, starting at the row that
    /// owns the top of the viewport, and keep that row in view.
    ///
    /// # Panics
    ///
    /// Panics if the tree has rows but the top visible row does not belong
    /// to any of them; the host must report a row that is attached to this
    /// tree.
    pub fn expand_page(&mut self, expanded: bool) -> usize {
        let roots = self.host.roots();
        if roots.is_empty() {
            return 0;
        }

        let Some(mut top) = self.host.top_node() else {
            panic!("tree has {} top-level rows but no top row", roots.len());
        };
        while let Some(parent) = self.host.parent(top) {
            top = parent;
        }

        let Some(start) = roots.iter().position(|&root| root == top) else {
            panic!("Error finding top of the tree: {} is not a top-level row", top);
        };

        let created = self.set_range_expanded(start, self.page_size, expanded);
        self.host.show_node(top);

        tracing::debug!(
            "Page from row {} {} ({} rows materialized)",
            start,
            if expanded { "expanded" } else { "collapsed" },
            created
        );
        created
    }

    /// Remove every row and drop all buffered text
    pub fn clear(&mut self) {
        self.host.set_redraw(false);
        for root in self.host.roots() {
            self.host.dispose(root);
        }
        self.host.set_redraw(true);

        self.states.clear();
        self.current_parent = None;
    }

    /// Remove `node` and its descendants, dropping any text buffered for them
    pub fn dispose(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            self.states.remove(&id);
            if self.current_parent == Some(id) {
                self.current_parent = None;
            }
            stack.extend(self.host.children(id));
        }
        self.host.dispose(node);
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::view::trace_tree::HeadlessTree;
    use proptest::prelude::*;

    /// Text segments mixing content, blank lines and separators
    fn segments() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop::collection::vec(prop_oneof!["[a-z]{1,8}", Just(String::new())], 0..4)
                .prop_map(|lines| lines.join("\n")),
            0..12,
        )
    }

    proptest! {
        /// Every buffered non-empty line becomes exactly one child, in order
        #[test]
        fn expand_yields_buffered_lines_in_order(segments in segments()) {
            let mut p = TracePopulator::new(HeadlessTree::new());
            let root = p.append_top_level("root").unwrap();
            for segment in &segments {
                prop_assert_eq!(p.append_line(root, segment), 0);
            }

            let expected: Vec<&str> = segments
                .iter()
                .flat_map(|s| split_lines(s))
                .collect();
            prop_assert_eq!(p.pending_line_count(root), expected.len());

            let created = p.expand(root);
            prop_assert_eq!(created, expected.len());
            prop_assert_eq!(p.host().child_texts(root), expected);
            prop_assert_eq!(p.expand(root), 0);
        }

        /// Without caching no buffer ever exists and rows appear immediately
        #[test]
        fn uncached_appends_are_immediate(segments in segments()) {
            let config = TraceViewConfig { cache_sub_text: false, ..Default::default() };
            let mut p = TracePopulator::from_config(HeadlessTree::new(), &config);
            let root = p.append_top_level("root").unwrap();

            let mut total = 0;
            for segment in &segments {
                total += p.append_line(root, segment);
                prop_assert!(!p.state(root).is_pending());
            }
            prop_assert_eq!(p.host().child_count(root), total);
            prop_assert_eq!(p.expand(root), 0);
        }

        /// Expanding a range leaves rows outside it pending
        #[test]
        fn expand_range_is_exact(rows in 1usize..20, start in 0usize..25, count in 0usize..25) {
            let mut p = TracePopulator::new(HeadlessTree::new());
            let mut roots = Vec::new();
            for i in 0..rows {
                roots.push(p.append_top_level(&format!("row {}", i)).unwrap());
                p.append_sub_text("child");
            }

            let created = p.expand_range(start, count);
            let end = start.saturating_add(count).min(rows);
            prop_assert_eq!(created, end.saturating_sub(start));
            for (i, root) in roots.iter().enumerate() {
                let in_range = i >= start && i < end;
                prop_assert_eq!(p.state(*root).is_materialized(), in_range);
            }
        }
    }
}
