pub mod analysis;
pub mod comparison;
pub mod requests;

pub use analysis::{empty_counts, DeadlockRecord, StateCounts, ThreadDumpAnalysis, ThreadState};
pub use comparison::{ComparisonReport, ComparisonResult, DeadlockNote, DiffMode};
pub use requests::{AnalyzeRequest, CompareRequest};
