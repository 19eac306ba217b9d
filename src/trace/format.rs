//! Trace event formatting
//!
//! Turns decoded trace events into the text rows shown in the tree. Stack
//! events (states, operators), RHS writes and generic output become top-level
//! rows; everything else becomes sub-lines under the current top-level row.

use super::event::{TraceEvent, Wme};

/// Width the decision cycle number is right-aligned to
const DECISION_DIGITS: usize = 3;

/// Deepest goal stack level that still gets its own indentation; deeper
/// levels are drawn at this depth.
const MAX_INDENT_DEPTH: usize = 100;

/// Where a formatted event goes in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    TopLevel,
    Sub,
}

/// Text for one event, ready to append
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedTrace {
    pub placement: Placement,
    pub text: String,
}

#[derive(Debug, Clone, Copy)]
pub struct TraceFormatter {
    indent_size: usize,
}

impl TraceFormatter {
    pub fn new(indent_size: usize) -> Self {
        Self { indent_size }
    }

    pub fn indent_size(&self) -> usize {
        self.indent_size
    }

    /// Format an event, or `None` if it produces no text
    pub fn format(&self, event: &TraceEvent) -> Option<FormattedTrace> {
        let (placement, text) = match event {
            TraceEvent::State {
                decision_cycle,
                stack_level,
                state_id,
                impasse_object,
                impasse_type,
            } => {
                // "  3:    ==>S: S2 (operator no-change)"
                let mut text = self.cycle_prefix(*decision_cycle);
                text.push_str(&self.indent(*stack_level, -1));
                text.push_str(&self.subgoal_marker());
                text.push_str("S: ");
                text.push_str(state_id);
                if let Some(object) = impasse_object {
                    text.push_str(" (");
                    text.push_str(object);
                    if let Some(kind) = impasse_type {
                        text.push(' ');
                        text.push_str(kind);
                    }
                    text.push(')');
                }
                (Placement::TopLevel, text)
            }
            TraceEvent::Operator {
                decision_cycle,
                stack_level,
                operator_id,
                operator_name,
            } => {
                // "  2:    O: O8 (move-block)"
                let mut text = self.cycle_prefix(*decision_cycle);
                text.push_str(&self.indent(*stack_level, 0));
                text.push_str("O: ");
                text.push_str(operator_id);
                if let Some(name) = operator_name {
                    text.push_str(" (");
                    text.push_str(name);
                    text.push(')');
                }
                (Placement::TopLevel, text)
            }
            TraceEvent::RhsWrite { text } | TraceEvent::Output { text } => {
                (Placement::TopLevel, text.clone())
            }
            TraceEvent::Phase { name, status } => (
                Placement::Sub,
                format!("--- {} phase {}---", name, status.as_deref().unwrap_or("")),
            ),
            TraceEvent::WmeChange { adding, wmes } => (
                Placement::Sub,
                wmes.iter()
                    .map(|wme| format_wme(*adding, wme))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            TraceEvent::Preference {
                id,
                attribute,
                value,
            } => (
                Placement::Sub,
                format!("--> ({} ^{} {} + )", id, attribute, value),
            ),
            TraceEvent::Production { firing, names } => {
                let verb = if *firing { "Firing" } else { "Retracting" };
                (
                    Placement::Sub,
                    names
                        .iter()
                        .map(|name| format!("{} {}", verb, name))
                        .collect::<Vec<_>>()
                        .join("\n"),
                )
            }
        };

        if text.is_empty() {
            return None;
        }
        Some(FormattedTrace { placement, text })
    }

    fn cycle_prefix(&self, decision_cycle: u64) -> String {
        format!("{:>width$}: ", decision_cycle, width = DECISION_DIGITS)
    }

    /// Spaces for a goal stack level, shifted by `modifier` levels
    fn indent(&self, stack_level: i64, modifier: i64) -> String {
        let depth = usize::try_from(stack_level.saturating_add(modifier).max(0))
            .unwrap_or(MAX_INDENT_DEPTH)
            .min(MAX_INDENT_DEPTH);
        " ".repeat(depth.saturating_mul(self.indent_size))
    }

    /// Arrow matching the indent width
    fn subgoal_marker(&self) -> String {
        match self.indent_size {
            0 => String::new(),
            1 => ">".to_string(),
            2 => "=>".to_string(),
            3 => "==>".to_string(),
            n => format!("{}==>", " ".repeat(n - 3)),
        }
    }
}

impl Default for TraceFormatter {
    fn default() -> Self {
        Self::new(3)
    }
}

fn format_wme(adding: bool, wme: &Wme) -> String {
    format!(
        "{}WM: ({}: {} ^{} {})",
        if adding { "=>" } else { "<=" },
        wme.timetag,
        wme.id,
        wme.attribute,
        wme.value
    )
}
