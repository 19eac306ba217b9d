//! Marshaling trace updates onto the UI thread
//!
//! Producers (the agent's callback thread) post owned updates through a
//! cloneable `UiSender` and carry on immediately. The thread that owns the
//! tree drains the `UiQueue` and applies updates in arrival order. Nothing is
//! shared between the two sides except the channel.

use crate::view::trace_tree::{TracePopulator, TreeHost};
use std::sync::mpsc;

/// A change to apply to the trace tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceUpdate {
    /// New top-level rows
    TopLevel(String),
    /// Sub-lines for the current top-level row
    SubText(String),
    /// Remove everything
    Clear,
}

impl<H: TreeHost> TracePopulator<H> {
    /// Apply one update
    pub fn apply(&mut self, update: TraceUpdate) {
        match update {
            TraceUpdate::TopLevel(text) => {
                self.append_top_level(&text);
            }
            TraceUpdate::SubText(text) => {
                self.append_sub_text(&text);
            }
            TraceUpdate::Clear => self.clear(),
        }
    }
}

/// Producer side of the queue
#[derive(Debug, Clone)]
pub struct UiSender {
    sender: mpsc::Sender<TraceUpdate>,
}

impl UiSender {
    /// Queue an update without waiting for it to be applied.
    ///
    /// Updates posted after the queue is gone are dropped.
    pub fn post(&self, update: TraceUpdate) {
        if self.sender.send(update).is_err() {
            tracing::debug!("UI queue closed, dropping trace update");
        }
    }
}

/// Consumer side of the queue, owned by the UI thread
#[derive(Debug)]
pub struct UiQueue {
    receiver: mpsc::Receiver<TraceUpdate>,
}

impl UiQueue {
    pub fn new() -> (Self, UiSender) {
        let (sender, receiver) = mpsc::channel();
        (Self { receiver }, UiSender { sender })
    }

    /// Apply every update queued so far, in FIFO order.
    ///
    /// Returns the number of updates applied.
    pub fn drain<H: TreeHost>(&self, populator: &mut TracePopulator<H>) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.receiver.try_recv() {
            populator.apply(update);
            applied += 1;
        }
        applied
    }

    /// Apply updates as they arrive until every sender has been dropped.
    pub fn drain_blocking<H: TreeHost>(&self, populator: &mut TracePopulator<H>) -> usize {
        let mut applied = 0;
        for update in self.receiver.iter() {
            populator.apply(update);
            applied += 1;
        }
        tracing::debug!("UI queue closed after {} updates", applied);
        applied
    }
}
