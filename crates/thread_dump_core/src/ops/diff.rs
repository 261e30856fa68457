use std::collections::{BTreeMap, BTreeSet};

use crate::types::{ComparisonResult, DeadlockNote, DiffMode, ThreadDumpAnalysis};

fn state_deltas(a: &ThreadDumpAnalysis, b: &ThreadDumpAnalysis) -> BTreeMap<String, i64> {
    let states: BTreeSet<&'static str> = a
        .counts
        .keys()
        .chain(b.counts.keys())
        .map(|state| state.as_str())
        .collect();

    states
        .into_iter()
        .map(|name| {
            let count_in = |analysis: &ThreadDumpAnalysis| {
                analysis
                    .counts
                    .iter()
                    .find(|(state, _)| state.as_str() == name)
                    .map(|(_, count)| *count as i64)
                    .unwrap_or(0)
            };
            (name.to_string(), count_in(b) - count_in(a))
        })
        .collect()
}

fn compose_summary(
    mode: DiffMode,
    deltas: &BTreeMap<String, i64>,
    note: Option<DeadlockNote>,
) -> String {
    let mut clauses = Vec::new();

    if mode.reports_state_deltas() {
        let changes = deltas
            .iter()
            .filter(|(_, delta)| **delta != 0)
            .map(|(state, delta)| format!("{state}={delta:+}"))
            .collect::<Vec<_>>();
        let changes = if changes.is_empty() {
            "no changes".to_string()
        } else {
            changes.join(", ")
        };
        clauses.push(format!("State deltas: {changes}"));
    }

    if let Some(note) = note {
        clauses.push(note.as_str().to_string());
    }

    if clauses.is_empty() {
        "No notable differences".to_string()
    } else {
        clauses.join("; ")
    }
}

/// Compares two parsed dumps. Deltas are `b - a` per state.
pub fn diff_analyses(
    a: &ThreadDumpAnalysis,
    b: &ThreadDumpAnalysis,
    mode: DiffMode,
) -> ComparisonResult {
    let deltas = state_deltas(a, b);
    let deadlock_note = DeadlockNote::between(a.has_deadlocks(), b.has_deadlocks());
    let summary = compose_summary(mode, &deltas, deadlock_note);

    ComparisonResult {
        mode,
        summary,
        counts_a: a.counts.clone(),
        counts_b: b.counts.clone(),
        deltas,
        deadlocks_a: a.deadlocks.clone(),
        deadlocks_b: b.deadlocks.clone(),
        deadlock_note,
    }
}
