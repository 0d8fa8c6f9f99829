use thiserror::Error;

use crate::models::{PlayerId, TrackKind};

/// Failures scoped to a single frame.
///
/// These never abort a sequence: the stage that hits one drops that frame's
/// contribution to its output series and moves on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("Degenerate geometry: {reason}")]
    DegenerateGeometry { reason: String },

    #[error("Transform unavailable: {reason}")]
    TransformUnavailable { reason: String },

    #[error("Missing {kind} detection at frame {frame}")]
    MissingDetection { frame: usize, kind: TrackKind },
}

impl FrameError {
    pub fn degenerate(reason: impl Into<String>) -> Self {
        FrameError::DegenerateGeometry {
            reason: reason.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        FrameError::TransformUnavailable {
            reason: reason.into(),
        }
    }
}

/// Errors raised once at the sequence boundary.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Frame range mismatch in {source_name}: expected {expected} frames, found {found}")]
    FrameRangeMismatch {
        source_name: String,
        expected: usize,
        found: usize,
    },

    #[error("Keypoint layout mismatch at frame {frame}: expected {expected} points, found {found}")]
    KeypointLayoutMismatch {
        frame: usize,
        expected: usize,
        found: usize,
    },

    #[error("Malformed box in {source_name} at frame {frame}")]
    MalformedBox { source_name: String, frame: usize },

    #[error("Duplicate player id {0}")]
    DuplicatePlayer(PlayerId),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

impl AnalyticsError {
    /// Whether the sequence can continue past this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AnalyticsError::Frame(_))
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
