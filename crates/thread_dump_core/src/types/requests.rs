use std::path::PathBuf;

use super::comparison::DiffMode;
use crate::{DumpError, Result};

fn require_path(field: &str, path: &str) -> Result<PathBuf> {
    if path.is_empty() {
        return Err(DumpError::invalid_params(format!(
            "'{field}' must be a non-empty string"
        )));
    }
    Ok(PathBuf::from(path))
}

fn require_max_threads(max_threads: i64) -> Result<usize> {
    usize::try_from(max_threads)
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| DumpError::invalid_params("'max_threads' must be a positive integer"))
}

/// Validated arguments for a single-dump analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub path: PathBuf,
    pub max_threads: usize,
}

impl AnalyzeRequest {
    pub fn new(path: &str, max_threads: i64) -> Result<Self> {
        Ok(Self {
            path: require_path("path", path)?,
            max_threads: require_max_threads(max_threads)?,
        })
    }
}

/// Validated arguments for a two-dump comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareRequest {
    pub path_a: PathBuf,
    pub path_b: PathBuf,
    pub max_threads: usize,
    pub diff_mode: DiffMode,
}

impl CompareRequest {
    pub fn new(path_a: &str, path_b: &str, max_threads: i64, diff_mode: &str) -> Result<Self> {
        Ok(Self {
            path_a: require_path("path_a", path_a)?,
            path_b: require_path("path_b", path_b)?,
            max_threads: require_max_threads(max_threads)?,
            diff_mode: diff_mode.parse()?,
        })
    }
}
