use crate::{DumpConfig, DumpError, Result};
use std::path::Path;

/// Guarded file access shared by the tool operations.
#[derive(Debug, Clone)]
pub struct DumpAnalyzer {
    config: DumpConfig,
}

impl DumpAnalyzer {
    pub fn new(config: DumpConfig) -> Self {
        Self { config }
    }

    /// Checks that `path` names a regular file within the size cap.
    ///
    /// Any failure to stat the path is reported as not found.
    pub async fn inspect(&self, path: &Path) -> Result<u64> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!("metadata failed for {}: {}", path.display(), e);
                return Err(DumpError::NotFound(path.to_path_buf()));
            }
        };

        if metadata.is_dir() {
            return Err(DumpError::IsDirectory(path.to_path_buf()));
        }

        let size = metadata.len();
        if size > self.config.max_file_bytes {
            return Err(DumpError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.config.max_file_bytes,
            });
        }

        Ok(size)
    }

    /// Reads a dump as UTF-8, replacing undecodable bytes.
    pub async fn read_text(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DumpError::io(path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn load(&self, path: &Path) -> Result<String> {
        self.inspect(path).await?;
        self.read_text(path).await
    }

    pub fn config(&self) -> &DumpConfig {
        &self.config
    }
}

impl Default for DumpAnalyzer {
    fn default() -> Self {
        Self::new(DumpConfig::default())
    }
}
