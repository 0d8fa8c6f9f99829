//! Discrete game events derived from the per-frame series.

use serde::{Deserialize, Serialize};

use super::tracks::{PlayerId, TeamId};

/// How the ball changed hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PossessionChangeKind {
    /// Same team on both ends
    Pass,
    /// Opposing teams
    Interception,
}

/// Ball moved from one confirmed holder to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossessionChange {
    pub frame: usize,
    pub from: PlayerId,
    pub to: PlayerId,
    pub kind: PossessionChangeKind,
    pub from_team: TeamId,
    pub to_team: TeamId,
}

impl PossessionChange {
    pub fn is_pass(&self) -> bool {
        self.kind == PossessionChangeKind::Pass
    }

    pub fn is_interception(&self) -> bool {
        self.kind == PossessionChangeKind::Interception
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotOutcome {
    Made,
    Missed,
}

impl ShotOutcome {
    pub fn is_made(&self) -> bool {
        matches!(self, ShotOutcome::Made)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShotOutcome::Made => "Shot Made",
            ShotOutcome::Missed => "Shot Missed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotEvent {
    pub frame: usize,
    pub outcome: ShotOutcome,
    /// Label of the hoop the ball reached
    pub hoop: String,
    /// Last recorded owner of the ball, if any
    pub player: Option<PlayerId>,
    pub team: Option<TeamId>,
    /// Points credited (0 for a miss)
    pub points: u32,
    /// Passer credited with an assist on a make
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assisted_by: Option<PlayerId>,
}
