use rmcp::{
    ErrorData as McpError,
    model::*,
    tool, tool_handler, tool_router,
    handler::server::{tool::ToolRouter, ServerHandler, wrapper::Parameters},
    transport,
    ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thread_dump_core::config::DEFAULT_MAX_THREADS;
use thread_dump_core::{ops, AnalyzeRequest, CompareRequest, DumpAnalyzer, DumpConfig, DumpError, ErrorKind};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
struct AnalyzeThreadDumpParams {
    /// Path to thread dump text file
    path: String,
    /// Maximum number of thread headers to classify (default 5000)
    #[serde(default)]
    #[schemars(range(min = 1), default = "default_max_threads")]
    max_threads: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
struct CompareThreadDumpsParams {
    /// Path to first thread dump text file
    path_a: String,
    /// Path to second thread dump text file
    path_b: String,
    /// Maximum number of thread headers to classify per dump (default 5000)
    #[serde(default)]
    #[schemars(range(min = 1), default = "default_max_threads")]
    max_threads: Option<i64>,
    /// One of: summary, states, full
    #[serde(default = "default_diff_mode")]
    diff_mode: String,
}

fn default_diff_mode() -> String { "full".to_string() }

fn default_max_threads() -> Option<i64> { Some(clamp_max_threads(DEFAULT_MAX_THREADS)) }

fn clamp_max_threads(max_threads: usize) -> i64 {
    i64::try_from(max_threads).unwrap_or(i64::MAX)
}

fn to_mcp_error(err: DumpError) -> McpError {
    tracing::warn!("Tool call rejected: {} ({})", err, err.kind());
    match err.kind() {
        ErrorKind::InvalidParams => McpError::invalid_params(err.to_string(), None),
        ErrorKind::InternalError => McpError::internal_error(err.to_string(), None),
    }
}

fn to_structured<T: Serialize>(payload: &T) -> Result<CallToolResult, McpError> {
    let value = serde_json::to_value(payload)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize result: {}", e), None))?;
    Ok(CallToolResult::structured(value))
}

#[derive(Clone)]
struct ThreadDumpMcpServer {
    tool_router: ToolRouter<Self>,
    analyzer: DumpAnalyzer,
}

#[tool_router]
impl ThreadDumpMcpServer {
    fn new(config: DumpConfig) -> Self {
        Self {
            tool_router: Self::tool_router(),
            analyzer: DumpAnalyzer::new(config),
        }
    }

    fn max_threads_or_default(&self, max_threads: Option<i64>) -> i64 {
        max_threads.unwrap_or_else(|| clamp_max_threads(self.analyzer.config().default_max_threads))
    }

    #[tool(description = "Parses a JVM thread dump text and returns a summary of thread states and potential deadlocks.")]
    async fn analyze_thread_dump(&self, params: Parameters<AnalyzeThreadDumpParams>) -> Result<CallToolResult, McpError> {
        let max_threads = self.max_threads_or_default(params.0.max_threads);
        let request = AnalyzeRequest::new(&params.0.path, max_threads).map_err(to_mcp_error)?;

        let analysis = ops::analyze::analyze(&self.analyzer, &request).await
            .map_err(to_mcp_error)?;

        to_structured(&analysis)
    }

    #[tool(description = "Parses two JVM thread dump text files and returns a comparison of thread state counts and deadlocks.")]
    async fn compare_thread_dumps(&self, params: Parameters<CompareThreadDumpsParams>) -> Result<CallToolResult, McpError> {
        let max_threads = self.max_threads_or_default(params.0.max_threads);
        let request = CompareRequest::new(
            &params.0.path_a,
            &params.0.path_b,
            max_threads,
            &params.0.diff_mode,
        ).map_err(to_mcp_error)?;

        let result = ops::compare::compare(&self.analyzer, &request).await
            .map_err(to_mcp_error)?;

        to_structured(&result.report())
    }
}

#[tool_handler]
impl ServerHandler for ThreadDumpMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "JVM thread dump analyzer: per-state thread counts, reported deadlocks, and dump-to-dump comparison".into(),
            ),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the MCP stream
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DumpConfig::from_env();
    tracing::info!(
        "Starting Thread Dump MCP Server on stdio (max_file_bytes={}, default_max_threads={})...",
        config.max_file_bytes,
        config.default_max_threads
    );

    let server = ThreadDumpMcpServer::new(config);
    let transport = transport::stdio();

    server.serve(transport).await?.waiting().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn fixture(name: &str) -> String {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../thread_dump_core/tests/fixtures")
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    fn server() -> ThreadDumpMcpServer {
        ThreadDumpMcpServer::new(DumpConfig::default())
    }

    fn analyze_params(path: &str, max_threads: Option<i64>) -> Parameters<AnalyzeThreadDumpParams> {
        Parameters(AnalyzeThreadDumpParams {
            path: path.to_string(),
            max_threads,
        })
    }

    fn compare_params(path_a: &str, path_b: &str, diff_mode: &str) -> Parameters<CompareThreadDumpsParams> {
        Parameters(CompareThreadDumpsParams {
            path_a: path_a.to_string(),
            path_b: path_b.to_string(),
            max_threads: None,
            diff_mode: diff_mode.to_string(),
        })
    }

    #[test]
    fn to_mcp_error_maps_kinds_to_protocol_codes() {
        let err = to_mcp_error(DumpError::invalid_params("'path' must be a non-empty string"));
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "'path' must be a non-empty string");

        let err = to_mcp_error(DumpError::TooLarge {
            path: PathBuf::from("big.txt"),
            size: 20 * 1024 * 1024,
            limit: 10 * 1024 * 1024,
        });
        assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
        assert_eq!(err.message, "File too large (>10MB): big.txt");
    }

    #[test]
    fn compare_params_default_diff_mode_is_full() {
        let params: CompareThreadDumpsParams =
            serde_json::from_value(serde_json::json!({"path_a": "a", "path_b": "b"}))
                .expect("params should deserialize");
        assert_eq!(params.diff_mode, "full");
        assert_eq!(params.max_threads, None);
    }

    #[test]
    fn params_schemas_list_required_paths() {
        let schema = serde_json::to_value(schemars::schema_for!(CompareThreadDumpsParams))
            .expect("schema serialization must succeed");
        let required = schema["required"].as_array().expect("required list");
        assert!(required.contains(&serde_json::json!("path_a")));
        assert!(required.contains(&serde_json::json!("path_b")));
        assert!(!required.contains(&serde_json::json!("diff_mode")));
    }

    #[test]
    fn params_schemas_advertise_max_threads_bounds_and_default() {
        for schema in [
            serde_json::to_value(schemars::schema_for!(AnalyzeThreadDumpParams)),
            serde_json::to_value(schemars::schema_for!(CompareThreadDumpsParams)),
        ] {
            let schema = schema.expect("schema serialization must succeed");
            let max_threads = &schema["properties"]["max_threads"];
            assert_eq!(max_threads["minimum"].as_f64(), Some(1.0), "schema: {schema}");
            assert_eq!(max_threads["default"].as_i64(), Some(5000), "schema: {schema}");
        }
    }

    #[test]
    fn clamp_max_threads_saturates_instead_of_wrapping() {
        assert_eq!(clamp_max_threads(5000), 5000);
        assert_eq!(clamp_max_threads(usize::MAX), i64::MAX);
    }

    #[tokio::test]
    async fn analyze_thread_dump_accepts_huge_configured_default() {
        let server = ThreadDumpMcpServer::new(DumpConfig::new(10 * 1024 * 1024, usize::MAX));
        let result = server
            .analyze_thread_dump(analyze_params(&fixture("sample_thread_dump.txt"), None))
            .await
            .expect("omitted max_threads must fall back to a positive cap");

        let payload = result.structured_content.expect("structured payload");
        assert_eq!(payload["counts"]["RUNNABLE"], 2);
    }

    #[tokio::test]
    async fn analyze_thread_dump_returns_structured_payload() {
        let result = server()
            .analyze_thread_dump(analyze_params(&fixture("sample_thread_dump.txt"), None))
            .await
            .expect("analysis should succeed");

        let payload = result.structured_content.expect("structured payload");
        assert_eq!(payload["counts"]["RUNNABLE"], 2);
        assert_eq!(payload["counts"]["WAITING"], 2);
        assert_eq!(payload["deadlocks"][0]["threads"], serde_json::json!(["Thread-1", "Thread-2"]));
    }

    #[tokio::test]
    async fn analyze_thread_dump_rejects_bad_arguments() {
        let err = server()
            .analyze_thread_dump(analyze_params("/path/that/does/not/exist.txt", None))
            .await
            .expect_err("missing file must fail");
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);

        let err = server()
            .analyze_thread_dump(analyze_params(&fixture("sample_thread_dump.txt"), Some(0)))
            .await
            .expect_err("zero max_threads must fail");
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);

        let err = server()
            .analyze_thread_dump(analyze_params("", None))
            .await
            .expect_err("empty path must fail");
        assert_eq!(err.message, "'path' must be a non-empty string");
    }

    #[tokio::test]
    async fn analyze_thread_dump_rejects_oversized_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(&[b'x'; 64]).expect("write temp file");

        let server = ThreadDumpMcpServer::new(DumpConfig::new(32, 5000));
        let err = server
            .analyze_thread_dump(analyze_params(file.path().to_str().expect("utf-8 path"), None))
            .await
            .expect_err("oversized file must fail");
        assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn compare_thread_dumps_shapes_payload_by_mode() {
        let a = fixture("sample_thread_dump.txt");
        let b = fixture("sample_thread_dump_2.txt");

        let full = server()
            .compare_thread_dumps(compare_params(&a, &b, "full"))
            .await
            .expect("full compare should succeed")
            .structured_content
            .expect("structured payload");
        assert_eq!(full["notes"], "Deadlocks present only in A");
        assert_eq!(full["deltas"]["RUNNABLE"], 0);
        assert_eq!(full["deltas"]["WAITING"], 0);

        let summary = server()
            .compare_thread_dumps(compare_params(&a, &b, "summary"))
            .await
            .expect("summary compare should succeed")
            .structured_content
            .expect("structured payload");
        let mut keys: Vec<_> = summary.as_object().expect("object").keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["notes", "summary"]);
    }

    #[tokio::test]
    async fn compare_thread_dumps_rejects_unknown_mode_and_missing_file() {
        let a = fixture("sample_thread_dump.txt");
        let b = fixture("sample_thread_dump_2.txt");

        let err = server()
            .compare_thread_dumps(compare_params(&a, &b, "invalid"))
            .await
            .expect_err("unknown diff_mode must fail");
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "'diff_mode' must be one of: summary|states|full");

        let err = server()
            .compare_thread_dumps(compare_params(&a, "/definitely/missing.txt", "full"))
            .await
            .expect_err("missing file must fail");
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }
}
