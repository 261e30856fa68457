use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::analysis::{DeadlockRecord, StateCounts};
use crate::DumpError;

/// Selects which comparison fields are returned to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffMode {
    Summary,
    States,
    #[default]
    Full,
}

impl DiffMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffMode::Summary => "summary",
            DiffMode::States => "states",
            DiffMode::Full => "full",
        }
    }

    /// Whether the summary line carries a state-delta clause in this mode.
    pub fn reports_state_deltas(&self) -> bool {
        matches!(self, DiffMode::Summary | DiffMode::States | DiffMode::Full)
    }
}

impl fmt::Display for DiffMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffMode {
    type Err = DumpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(DiffMode::Summary),
            "states" => Ok(DiffMode::States),
            "full" => Ok(DiffMode::Full),
            _ => Err(DumpError::invalid_params(
                "'diff_mode' must be one of: summary|states|full",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlockNote {
    OnlyInA,
    OnlyInB,
    InBoth,
}

impl DeadlockNote {
    pub fn between(a_has_deadlocks: bool, b_has_deadlocks: bool) -> Option<Self> {
        match (a_has_deadlocks, b_has_deadlocks) {
            (true, false) => Some(DeadlockNote::OnlyInA),
            (false, true) => Some(DeadlockNote::OnlyInB),
            (true, true) => Some(DeadlockNote::InBoth),
            (false, false) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeadlockNote::OnlyInA => "Deadlocks present only in A",
            DeadlockNote::OnlyInB => "Deadlocks present only in B",
            DeadlockNote::InBoth => "Deadlocks present in both",
        }
    }
}

impl fmt::Display for DeadlockNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full outcome of diffing two analyses, before mode-dependent shaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonResult {
    pub mode: DiffMode,
    pub summary: String,
    pub counts_a: StateCounts,
    pub counts_b: StateCounts,
    /// Keyed by state name so iteration follows lexicographic order.
    pub deltas: BTreeMap<String, i64>,
    pub deadlocks_a: Vec<DeadlockRecord>,
    pub deadlocks_b: Vec<DeadlockRecord>,
    pub deadlock_note: Option<DeadlockNote>,
}

impl ComparisonResult {
    pub fn notes(&self) -> String {
        self.deadlock_note
            .map(|note| note.as_str().to_string())
            .unwrap_or_default()
    }

    /// Shapes the result into the payload for its diff mode.
    pub fn report(&self) -> ComparisonReport {
        match self.mode {
            DiffMode::Summary => ComparisonReport::Summary {
                summary: self.summary.clone(),
                notes: self.notes(),
            },
            DiffMode::States => ComparisonReport::States {
                summary: self.summary.clone(),
                counts_a: self.counts_a.clone(),
                counts_b: self.counts_b.clone(),
                deltas: self.deltas.clone(),
            },
            DiffMode::Full => ComparisonReport::Full {
                summary: self.summary.clone(),
                counts_a: self.counts_a.clone(),
                counts_b: self.counts_b.clone(),
                deltas: self.deltas.clone(),
                deadlocks_a: self.deadlocks_a.clone(),
                deadlocks_b: self.deadlocks_b.clone(),
                notes: self.notes(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ComparisonReport {
    Summary {
        summary: String,
        notes: String,
    },
    States {
        summary: String,
        counts_a: StateCounts,
        counts_b: StateCounts,
        deltas: BTreeMap<String, i64>,
    },
    Full {
        summary: String,
        counts_a: StateCounts,
        counts_b: StateCounts,
        deltas: BTreeMap<String, i64>,
        deadlocks_a: Vec<DeadlockRecord>,
        deadlocks_b: Vec<DeadlockRecord>,
        notes: String,
    },
}
