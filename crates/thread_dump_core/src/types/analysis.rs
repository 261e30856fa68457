use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// JVM thread states recognized in `java.lang.Thread.State:` lines.
///
/// Declaration order is the order states are listed in analysis summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreadState {
    Runnable,
    Blocked,
    Waiting,
    TimedWaiting,
    New,
    Terminated,
}

impl ThreadState {
    pub const ALL: [ThreadState; 6] = [
        ThreadState::Runnable,
        ThreadState::Blocked,
        ThreadState::Waiting,
        ThreadState::TimedWaiting,
        ThreadState::New,
        ThreadState::Terminated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadState::Runnable => "RUNNABLE",
            ThreadState::Blocked => "BLOCKED",
            ThreadState::Waiting => "WAITING",
            ThreadState::TimedWaiting => "TIMED_WAITING",
            ThreadState::New => "NEW",
            ThreadState::Terminated => "TERMINATED",
        }
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThreadState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThreadState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or(())
    }
}

/// Per-state thread counts. Always holds every [`ThreadState`], zero or not.
pub type StateCounts = BTreeMap<ThreadState, usize>;

pub fn empty_counts() -> StateCounts {
    ThreadState::ALL.into_iter().map(|state| (state, 0)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlockRecord {
    pub threads: Vec<String>,
    pub monitor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadDumpAnalysis {
    pub summary: String,
    pub counts: StateCounts,
    pub deadlocks: Vec<DeadlockRecord>,
}

impl ThreadDumpAnalysis {
    /// Threads whose state was classified into one of the known states.
    pub fn analyzed_threads(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn count(&self, state: ThreadState) -> usize {
        self.counts.get(&state).copied().unwrap_or(0)
    }

    pub fn has_deadlocks(&self) -> bool {
        !self.deadlocks.is_empty()
    }
}
