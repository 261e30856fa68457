pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_MAX_THREADS: usize = 5000;

#[derive(Debug, Clone)]
pub struct DumpConfig {
    /// Files larger than this are rejected before any read.
    pub max_file_bytes: u64,
    /// Thread header cap used when a caller does not supply one.
    pub default_max_threads: usize,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            default_max_threads: DEFAULT_MAX_THREADS,
        }
    }
}

impl DumpConfig {
    pub fn new(max_file_bytes: u64, default_max_threads: usize) -> Self {
        Self {
            max_file_bytes,
            default_max_threads,
        }
    }

    pub fn from_env() -> Self {
        let max_file_bytes = std::env::var("THREAD_DUMP_MAX_FILE_BYTES")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_MAX_FILE_BYTES);

        let default_max_threads = std::env::var("THREAD_DUMP_DEFAULT_MAX_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_THREADS);

        Self {
            max_file_bytes,
            default_max_threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DumpConfig::default();
        assert_eq!(config.max_file_bytes, 10 * 1024 * 1024);
        assert_eq!(config.default_max_threads, 5000);
    }

    #[test]
    fn test_new_config() {
        let config = DumpConfig::new(1024, 10);
        assert_eq!(config.max_file_bytes, 1024);
        assert_eq!(config.default_max_threads, 10);
    }

    // Both env cases live in one test so parallel tests never race on the variables.
    #[test]
    fn test_from_env() {
        std::env::remove_var("THREAD_DUMP_MAX_FILE_BYTES");
        std::env::remove_var("THREAD_DUMP_DEFAULT_MAX_THREADS");

        let config = DumpConfig::from_env();
        assert_eq!(config.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
        assert_eq!(config.default_max_threads, DEFAULT_MAX_THREADS);

        std::env::set_var("THREAD_DUMP_MAX_FILE_BYTES", "2048");
        std::env::set_var("THREAD_DUMP_DEFAULT_MAX_THREADS", "0");

        let config = DumpConfig::from_env();
        assert_eq!(config.max_file_bytes, 2048);
        assert_eq!(config.default_max_threads, DEFAULT_MAX_THREADS);

        std::env::set_var("THREAD_DUMP_MAX_FILE_BYTES", "not-a-number");
        std::env::set_var("THREAD_DUMP_DEFAULT_MAX_THREADS", "250");

        let config = DumpConfig::from_env();
        assert_eq!(config.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
        assert_eq!(config.default_max_threads, 250);

        std::env::remove_var("THREAD_DUMP_MAX_FILE_BYTES");
        std::env::remove_var("THREAD_DUMP_DEFAULT_MAX_THREADS");
    }
}
