//! JSON entry points for callers that only exchange strings.

use schemars::schema::RootSchema;
use serde::Serialize;

use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::models::GameInput;
use crate::pipeline::{GameAnalysis, GameAnalyzer};
use crate::summary::GameSummary;
use crate::SCHEMA_VERSION;

#[derive(Debug, Serialize)]
pub struct AnalysisResponse<'a> {
    pub schema_version: u8,
    #[serde(flatten)]
    pub analysis: &'a GameAnalysis,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse<'a> {
    pub schema_version: u8,
    pub num_frames: usize,
    pub summary: &'a GameSummary,
}

/// Parses a detection contract, runs the analyzer and returns the full analysis.
pub fn analyze_json(input_json: &str, config: AnalyticsConfig) -> Result<String> {
    let input: GameInput = serde_json::from_str(input_json)?;
    let analysis = GameAnalyzer::new(config).analyze(&input)?;
    Ok(serde_json::to_string(&AnalysisResponse {
        schema_version: SCHEMA_VERSION,
        analysis: &analysis,
    })?)
}

/// Same as [`analyze_json`] but only the box score.
pub fn summarize_json(input_json: &str, config: AnalyticsConfig) -> Result<String> {
    let input: GameInput = serde_json::from_str(input_json)?;
    let analysis = GameAnalyzer::new(config).analyze(&input)?;
    Ok(serde_json::to_string(&SummaryResponse {
        schema_version: SCHEMA_VERSION,
        num_frames: analysis.num_frames,
        summary: &analysis.summary,
    })?)
}

pub fn input_schema() -> RootSchema {
    schemars::schema_for!(GameInput)
}
