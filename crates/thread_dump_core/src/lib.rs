//! Thread Dump Core
//!
//! Parses JVM thread dump text, classifies threads by state, extracts reported
//! deadlock blocks and diffs two parsed dumps. The [`DumpAnalyzer`] wraps the
//! pure parser and comparator with guarded file access for tool bindings.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod ops;
pub mod types;

// Re-export commonly used types
pub use analyzer::DumpAnalyzer;
pub use config::DumpConfig;
pub use error::{DumpError, ErrorKind};
pub use ops::diff::diff_analyses;
pub use ops::parse::parse_thread_dump;
pub use types::{
    AnalyzeRequest, CompareRequest, ComparisonReport, ComparisonResult, DeadlockNote,
    DeadlockRecord, DiffMode, ThreadDumpAnalysis, ThreadState,
};

/// Result type alias using DumpError
pub type Result<T> = std::result::Result<T, DumpError>;
