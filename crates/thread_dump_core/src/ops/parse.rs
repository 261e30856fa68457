use regex::Regex;
use std::sync::OnceLock;

use crate::types::{empty_counts, DeadlockRecord, StateCounts, ThreadDumpAnalysis, ThreadState};

const STATE_LOOKAHEAD: usize = 5;
const DEADLOCK_LOOKAHEAD: usize = 50;
const DEADLOCK_MARKER: &str = "found one java-level deadlock";
const UNKNOWN_MONITOR: &str = "unknown";

fn thread_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^"(?P<name>.+?)"\s"#).expect("thread header regex is valid"))
}

fn state_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*java\.lang\.Thread\.State:\s*(?P<state>[A-Z_]+)")
            .expect("thread state regex is valid")
    })
}

fn is_deadlock_marker(line: &str) -> bool {
    line.to_lowercase().starts_with(DEADLOCK_MARKER)
}

/// Finds the state token of the thread whose header sits at `lines[header]`.
fn lookahead_state<'a>(lines: &[&'a str], header: usize) -> Option<&'a str> {
    lines
        .iter()
        .skip(header + 1)
        .take(STATE_LOOKAHEAD)
        .find_map(|line| state_re().captures(*line))
        .and_then(|caps| caps.name("state"))
        .map(|m| m.as_str())
}

/// Collects the deadlock block that follows the marker at `lines[marker]`.
fn scan_deadlock_block(lines: &[&str], marker: usize) -> Option<DeadlockRecord> {
    let mut threads = Vec::new();
    let mut monitor: Option<&str> = None;

    for line in lines.iter().skip(marker + 1).take(DEADLOCK_LOOKAHEAD) {
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        if line.starts_with('"') {
            let mut segments = line.split('"');
            segments.next();
            if let (Some(name), Some(_)) = (segments.next(), segments.next()) {
                threads.push(name.to_string());
            }
        }

        let lowered = line.to_lowercase();
        if lowered.contains("monitor") || lowered.contains("ownable synchronizer") {
            monitor = Some(line);
        }
    }

    if threads.is_empty() {
        return None;
    }

    Some(DeadlockRecord {
        threads,
        monitor: monitor.unwrap_or(UNKNOWN_MONITOR).to_string(),
    })
}

fn compose_summary(counts: &StateCounts, analyzed: usize, max_threads: usize) -> String {
    if analyzed == 0 {
        return "No threads parsed.".to_string();
    }

    let states = counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(state, count)| format!("{state}={count}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!("Analyzed {analyzed} threads (limit {max_threads}). States: {states}")
}

/// Parses raw thread dump text.
///
/// Never fails: malformed or truncated input degrades to missing counts and
/// deadlocks. `max_threads` caps how many thread headers are recognized;
/// deadlock blocks after the cap are still reported.
pub fn parse_thread_dump(text: &str, max_threads: usize) -> ThreadDumpAnalysis {
    let lines: Vec<&str> = text.lines().collect();
    let mut counts = empty_counts();
    let mut deadlocks = Vec::new();
    let mut counted_threads = 0usize;

    for (i, line) in lines.iter().enumerate() {
        if counted_threads < max_threads && thread_header_re().is_match(line) {
            counted_threads += 1;
            let state = lookahead_state(&lines, i).and_then(|s| s.parse::<ThreadState>().ok());
            if let Some(state) = state {
                *counts.entry(state).or_insert(0) += 1;
            }
            continue;
        }

        if is_deadlock_marker(line) {
            if let Some(record) = scan_deadlock_block(&lines, i) {
                deadlocks.push(record);
            }
        }
    }

    let mut analysis = ThreadDumpAnalysis {
        summary: String::new(),
        counts,
        deadlocks,
    };
    let analyzed = analysis.analyzed_threads();
    analysis.summary = compose_summary(&analysis.counts, analyzed, max_threads);

    tracing::debug!(
        "Parsed thread dump: headers={}, analyzed={}, deadlocks={}",
        counted_threads,
        analyzed,
        analysis.deadlocks.len()
    );

    analysis
}
