//! Team possession percentages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{PlayerId, TeamAssignments, TeamId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PossessionShare {
    /// Frames with a confirmed holder whose team is known
    pub counted_frames: usize,
    pub frames_by_team: BTreeMap<TeamId, usize>,
}

impl PossessionShare {
    /// Frames without a holder, or whose holder has no team, are left out.
    pub fn from_series(possession: &[Option<PlayerId>], teams: &TeamAssignments) -> Self {
        let mut frames_by_team: BTreeMap<TeamId, usize> = BTreeMap::new();
        for (frame, holder) in possession.iter().enumerate() {
            if let Some(team) = holder.and_then(|p| teams.team_at(frame, p)) {
                *frames_by_team.entry(team).or_insert(0) += 1;
            }
        }
        Self {
            counted_frames: frames_by_team.values().sum(),
            frames_by_team,
        }
    }

    /// Percentage of counted frames held by `team`.
    pub fn percent(&self, team: TeamId) -> f64 {
        if self.counted_frames == 0 {
            return 0.0;
        }
        let held = self.frames_by_team.get(&team).copied().unwrap_or(0);
        held as f64 / self.counted_frames as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_excludes_empty_frames() {
        let teams = TeamAssignments::new(vec![BTreeMap::from([(1, 1), (2, 2)])]);
        let series = vec![None, Some(1), Some(1), Some(1), None, Some(2), Some(9)];
        let share = PossessionShare::from_series(&series, &teams);
        assert_eq!(share.counted_frames, 4);
        assert!((share.percent(1) - 75.0).abs() < 1e-9);
        assert!((share.percent(2) - 25.0).abs() < 1e-9);
        assert_eq!(share.percent(3), 0.0);
    }

    #[test]
    fn test_share_empty_series() {
        let share = PossessionShare::from_series(&[None, None], &TeamAssignments::default());
        assert_eq!(share.counted_frames, 0);
        assert!(share.frames_by_team.is_empty());
    }
}
