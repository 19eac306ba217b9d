use super::category::TraceCategory;
use serde::{Deserialize, Serialize};

/// One working memory element in a `WmeChange` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wme {
    pub timetag: u64,
    pub id: String,
    pub attribute: String,
    pub value: String,
}

/// A decoded trace event emitted by the running agent.
///
/// Stored on disk as JSON lines, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    /// A new state on the goal stack (decision cycle boundary)
    State {
        decision_cycle: u64,
        stack_level: i64,
        state_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        impasse_object: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        impasse_type: Option<String>,
    },
    /// An operator was selected
    Operator {
        decision_cycle: u64,
        stack_level: i64,
        operator_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        operator_name: Option<String>,
    },
    /// Text written by a production's right-hand side
    RhsWrite { text: String },
    /// Generic top-level output such as an echoed command
    Output { text: String },
    Phase {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<String>,
    },
    WmeChange {
        /// true for additions, false for removals
        adding: bool,
        #[serde(default)]
        wmes: Vec<Wme>,
    },
    Preference {
        id: String,
        attribute: String,
        value: String,
    },
    Production {
        /// true when firing, false when retracting
        firing: bool,
        #[serde(default)]
        names: Vec<String>,
    },
}

impl TraceEvent {
    pub fn category(&self) -> TraceCategory {
        match self {
            TraceEvent::State { .. } | TraceEvent::Operator { .. } => TraceCategory::Stack,
            TraceEvent::RhsWrite { .. } => TraceCategory::RhsWrite,
            TraceEvent::Output { .. } => TraceCategory::TopLevel,
            TraceEvent::Phase { .. } => TraceCategory::Phase,
            TraceEvent::WmeChange { .. } => TraceCategory::WmeChange,
            TraceEvent::Preference { .. } => TraceCategory::Preference,
            TraceEvent::Production { firing: true, .. } => TraceCategory::Firing,
            TraceEvent::Production { firing: false, .. } => TraceCategory::Retraction,
        }
    }
}
