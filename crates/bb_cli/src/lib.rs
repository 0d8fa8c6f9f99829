//! Command line front-end for `bb_core`.
//!
//! Detection contract (JSON) → analysis (JSON), plus schema and config dumps.

use anyhow::{Context, Result};
use bb_core::api::{AnalysisResponse, SummaryResponse};
use bb_core::{AnalyticsConfig, GameAnalysis, GameAnalyzer, GameInput, PlayerId, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What `analyze` reports after writing its output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub schema_version: u8,
    /// Creation time (RFC3339)
    pub created_at: String,
    pub num_frames: usize,
    pub frame_rate: f64,
    pub possession_changes: usize,
    pub shots: usize,
    /// Player with the most points, with those points
    pub top_scorer: Option<(PlayerId, u32)>,
    pub skipped_calibration_frames: usize,
    /// Input file size (bytes)
    pub input_size: u64,
    /// Output file size (bytes)
    pub output_size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Overrides the input's frame rate
    pub fps: Option<f64>,
    /// Forces ball outlier rejection and gap interpolation on
    pub clean_ball: bool,
    /// Write only the box score
    pub summary_only: bool,
}

/// Config file when given, otherwise the `BB_ANALYTICS_PROFILE` preset.
pub fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig> {
    match path {
        Some(path) => AnalyticsConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(AnalyticsConfig::from_env_or_default()),
    }
}

pub fn read_input(path: &Path) -> Result<(GameInput, u64)> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read detections: {}", path.display()))?;
    let input: GameInput = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse detections: {}", path.display()))?;
    Ok((input, raw.len() as u64))
}

pub fn run_analysis(
    input_path: &Path,
    output_path: &Path,
    mut config: AnalyticsConfig,
    options: &AnalyzeOptions,
) -> Result<RunMetadata> {
    let (mut input, input_size) = read_input(input_path)?;
    if let Some(fps) = options.fps {
        input.frame_rate = Some(fps);
    }
    if options.clean_ball {
        config.ball_cleaning.enabled = true;
    }
    log::debug!(
        "{}: {} frames, {} players, fps override {:?}",
        input_path.display(),
        input.num_frames,
        input.players.len(),
        options.fps
    );

    let analysis = GameAnalyzer::new(config)
        .analyze(&input)
        .context("Analysis failed")?;

    let json = render(&analysis, options.summary_only)?;
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(output_path, &json)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;
    log::info!("wrote {} bytes to {}", json.len(), output_path.display());

    Ok(RunMetadata {
        schema_version: SCHEMA_VERSION,
        created_at: chrono::Utc::now().to_rfc3339(),
        num_frames: analysis.num_frames,
        frame_rate: analysis.frame_rate,
        possession_changes: analysis.possession_changes.len(),
        shots: analysis.shots.len(),
        top_scorer: analysis.summary.top_scorer().map(|p| (p.id, p.stats.points)),
        skipped_calibration_frames: analysis.diagnostics.skipped_calibration_frames,
        input_size,
        output_size: json.len() as u64,
    })
}

fn render(analysis: &GameAnalysis, summary_only: bool) -> Result<String> {
    let json = if summary_only {
        serde_json::to_string_pretty(&SummaryResponse {
            schema_version: SCHEMA_VERSION,
            num_frames: analysis.num_frames,
            summary: &analysis.summary,
        })?
    } else {
        serde_json::to_string_pretty(&AnalysisResponse {
            schema_version: SCHEMA_VERSION,
            analysis,
        })?
    };
    Ok(json)
}

pub fn schema_json() -> Result<String> {
    Ok(serde_json::to_string_pretty(&bb_core::input_schema())?)
}

pub fn config_yaml(profile: &str) -> Result<String> {
    Ok(serde_yaml::to_string(&AnalyticsConfig::from_profile(profile))?)
}
