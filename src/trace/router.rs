use super::category::TraceFilter;
use super::event::TraceEvent;
use super::format::{Placement, TraceFormatter};
use crate::config::TraceViewConfig;
use crate::services::ui_queue::{TraceUpdate, UiSender};

/// Filters and formats trace events on the producer thread and posts the
/// resulting text to the UI queue.
#[derive(Debug, Clone)]
pub struct TraceRouter {
    formatter: TraceFormatter,
    filter: TraceFilter,
    sender: UiSender,
}

impl TraceRouter {
    pub fn new(formatter: TraceFormatter, filter: TraceFilter, sender: UiSender) -> Self {
        Self {
            formatter,
            filter,
            sender,
        }
    }

    pub fn from_config(config: &TraceViewConfig, sender: UiSender) -> Self {
        Self::new(
            TraceFormatter::new(config.indent_size),
            config.trace_filter(),
            sender,
        )
    }

    /// Post an event to the UI thread. Returns false if it was filtered out
    /// or produced no text.
    pub fn dispatch(&self, event: &TraceEvent) -> bool {
        if !self.filter.contains(event.category()) {
            return false;
        }

        let Some(formatted) = self.formatter.format(event) else {
            return false;
        };

        let update = match formatted.placement {
            Placement::TopLevel => TraceUpdate::TopLevel(formatted.text),
            Placement::Sub => TraceUpdate::SubText(formatted.text),
        };
        self.sender.post(update);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ui_queue::UiQueue;
    use crate::trace::TraceCategory;
    use crate::view::trace_tree::{HeadlessTree, TracePopulator, TreeHost};

    fn phase(name: &str) -> TraceEvent {
        TraceEvent::Phase {
            name: name.to_string(),
            status: None,
        }
    }

    #[test]
    fn test_routes_by_placement() {
        let (queue, sender) = UiQueue::new();
        let router = TraceRouter::new(TraceFormatter::default(), TraceFilter::all(), sender);

        assert!(router.dispatch(&TraceEvent::Output {
            text: "run 1".to_string()
        }));
        assert!(router.dispatch(&phase("input")));

        let mut populator = TracePopulator::new(HeadlessTree::new());
        queue.drain(&mut populator);

        let root = populator.host().roots()[0];
        assert_eq!(populator.host().text(root), Some("run 1"));
        assert_eq!(populator.pending_line_count(root), 1);
    }

    #[test]
    fn test_filtered_category_produces_no_rows() {
        let (queue, sender) = UiQueue::new();
        let filter = TraceFilter::all().without(TraceCategory::Phase);
        let router = TraceRouter::new(TraceFormatter::default(), filter, sender);

        assert!(!router.dispatch(&phase("output")));

        let mut populator = TracePopulator::new(HeadlessTree::new());
        assert_eq!(queue.drain(&mut populator), 0);
        assert_eq!(populator.host().node_count(), 0);
    }

    #[test]
    fn test_empty_event_is_not_posted() {
        let (queue, sender) = UiQueue::new();
        let router = TraceRouter::new(TraceFormatter::default(), TraceFilter::all(), sender);

        assert!(!router.dispatch(&TraceEvent::WmeChange {
            adding: true,
            wmes: Vec::new()
        }));

        let mut populator = TracePopulator::new(HeadlessTree::new());
        assert_eq!(queue.drain(&mut populator), 0);
    }
}
