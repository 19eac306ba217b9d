use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kinds of information in a trace, used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TraceCategory {
    Phase,
    Preference,
    WmeChange,
    Firing,
    Retraction,
    Stack,
    RhsWrite,
    /// Generic top-level output (e.g. from a print or an echoed command)
    TopLevel,
}

impl TraceCategory {
    pub const ALL: [TraceCategory; 8] = [
        TraceCategory::Phase,
        TraceCategory::Preference,
        TraceCategory::WmeChange,
        TraceCategory::Firing,
        TraceCategory::Retraction,
        TraceCategory::Stack,
        TraceCategory::RhsWrite,
        TraceCategory::TopLevel,
    ];

    fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Set of categories that are displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceFilter {
    mask: u32,
}

impl TraceFilter {
    pub fn none() -> Self {
        Self { mask: 0 }
    }

    pub fn all() -> Self {
        TraceCategory::ALL.into_iter().collect()
    }

    pub fn all_except_top_level() -> Self {
        Self::all().without(TraceCategory::TopLevel)
    }

    pub fn with(mut self, category: TraceCategory) -> Self {
        self.mask |= category.bit();
        self
    }

    pub fn without(mut self, category: TraceCategory) -> Self {
        self.mask &= !category.bit();
        self
    }

    pub fn contains(&self, category: TraceCategory) -> bool {
        self.mask & category.bit() != 0
    }

    /// Categories in this set, in declaration order
    pub fn categories(&self) -> Vec<TraceCategory> {
        TraceCategory::ALL
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect()
    }
}

impl Default for TraceFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<TraceCategory> for TraceFilter {
    fn from_iter<I: IntoIterator<Item = TraceCategory>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}
