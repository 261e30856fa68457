use crate::ops::parse::parse_thread_dump;
use crate::types::{AnalyzeRequest, ThreadDumpAnalysis};
use crate::{DumpAnalyzer, Result};

pub async fn analyze(analyzer: &DumpAnalyzer, request: &AnalyzeRequest) -> Result<ThreadDumpAnalysis> {
    tracing::info!(
        "Analyzing thread dump: path={}, max_threads={}",
        request.path.display(),
        request.max_threads
    );

    let text = analyzer.load(&request.path).await?;
    Ok(parse_thread_dump(&text, request.max_threads))
}
