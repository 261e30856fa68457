use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Machine-readable error classes surfaced to tool callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParams,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidParams => "INVALID_PARAMS",
            ErrorKind::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const MIB: u64 = 1024 * 1024;

/// Whole mebibytes read as `10MB`; anything else is spelled out in bytes.
fn format_limit(limit: &u64) -> String {
    if *limit >= MIB && *limit % MIB == 0 {
        format!("{}MB", limit / MIB)
    } else {
        format!("{limit} bytes")
    }
}

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("{0}")]
    InvalidParams(String),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Path is a directory: {}", .0.display())]
    IsDirectory(PathBuf),

    #[error("File too large (>{}): {}", format_limit(.limit), .path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DumpError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DumpError::InvalidParams(_) | DumpError::NotFound(_) | DumpError::IsDirectory(_) => {
                ErrorKind::InvalidParams
            }
            DumpError::TooLarge { .. } | DumpError::Io { .. } => ErrorKind::InternalError,
        }
    }
}
