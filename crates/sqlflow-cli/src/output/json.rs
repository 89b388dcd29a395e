//! JSON output formatting.

use sqlflow_core::AnalyzeResult;

/// Format the analysis result as JSON.
///
/// If `compact` is true, outputs minified JSON without whitespace.
pub fn format_json(result: &AnalyzeResult, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(result)
    } else {
        serde_json::to_string_pretty(result)
    }
}
