// Trace tree module for deferred child population
//
// This module provides a tree of trace rows where the sub-lines under a
// top-level row are buffered as raw text and only turned into child rows
// when the row is expanded. The widget tree itself sits behind `TreeHost`
// so the populator can run against a real toolkit or the headless arena.

pub mod headless;
pub mod host;
pub mod lines;
pub mod node;
pub mod populator;

pub use headless::HeadlessTree;
pub use host::TreeHost;
pub use lines::{has_lines, split_lines};
pub use node::{NodeId, NodeState, PendingBuffer, TraceNode};
pub use populator::TracePopulator;
