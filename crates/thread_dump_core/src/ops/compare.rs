use crate::ops::diff::diff_analyses;
use crate::ops::parse::parse_thread_dump;
use crate::types::{CompareRequest, ComparisonResult};
use crate::{DumpAnalyzer, Result};

/// Validates both paths before reading either, then parses and diffs them.
pub async fn compare(analyzer: &DumpAnalyzer, request: &CompareRequest) -> Result<ComparisonResult> {
    tracing::info!(
        "Comparing thread dumps: a={}, b={}, max_threads={}, diff_mode={}",
        request.path_a.display(),
        request.path_b.display(),
        request.max_threads,
        request.diff_mode
    );

    for path in [&request.path_a, &request.path_b] {
        analyzer.inspect(path).await?;
    }

    let (text_a, text_b) = tokio::try_join!(
        analyzer.read_text(&request.path_a),
        analyzer.read_text(&request.path_b)
    )?;

    let a = parse_thread_dump(&text_a, request.max_threads);
    let b = parse_thread_dump(&text_b, request.max_threads);

    Ok(diff_analyses(&a, &b, request.diff_mode))
}
