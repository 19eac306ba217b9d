//! Trace events from the running agent, their formatting, and routing into
//! the tree.

pub mod category;
pub mod event;
pub mod format;
pub mod router;

pub use category::{TraceCategory, TraceFilter};
pub use event::{TraceEvent, Wme};
pub use format::{FormattedTrace, Placement, TraceFormatter};
pub use router::TraceRouter;
