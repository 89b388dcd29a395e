//! JSON Schema for the public request/response types.

use schemars::generate::SchemaSettings;
use serde_json::json;

use crate::statement::LineageStatement;
use crate::types::{AnalyzeRequest, AnalyzeResult};

/// Draft-07 schemas for [`AnalyzeRequest`], [`AnalyzeResult`] and the
/// normalized [`LineageStatement`] input, keyed by type name.
pub fn api_schema() -> serde_json::Value {
    let generator = SchemaSettings::draft07().into_generator();
    json!({
        "AnalyzeRequest": generator.clone().into_root_schema_for::<AnalyzeRequest>(),
        "AnalyzeResult": generator.clone().into_root_schema_for::<AnalyzeResult>(),
        "LineageStatement": generator.into_root_schema_for::<LineageStatement>(),
    })
}
