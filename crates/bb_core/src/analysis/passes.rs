//! Passes and interceptions from the possession series.
//!
//! The last confirmed holder is carried across `None` gaps, so A, none, B is
//! still one change from A to B, reported at the frame B is first confirmed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{
    PlayerId, PossessionChange, PossessionChangeKind, StatsLedger, TeamAssignments, TeamId,
};

/// Per-team pass and interception counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEventCounts {
    pub passes: u32,
    pub interceptions: u32,
}

pub struct PassInferencer<'a> {
    teams: &'a TeamAssignments,
}

impl<'a> PassInferencer<'a> {
    pub fn new(teams: &'a TeamAssignments) -> Self {
        Self { teams }
    }

    /// All holder changes in frame order.
    ///
    /// Both teams are read at the transition frame. A change where either
    /// side has no known team is dropped.
    pub fn infer(&self, possession: &[Option<PlayerId>]) -> Vec<PossessionChange> {
        let mut changes = Vec::new();
        let mut last_holder: Option<PlayerId> = None;

        for (frame, holder) in possession.iter().enumerate() {
            let Some(to) = *holder else {
                continue;
            };
            let Some(from) = last_holder.replace(to) else {
                continue;
            };
            if from == to {
                continue;
            }

            let (Some(from_team), Some(to_team)) = (self.teams.team_at(frame, from), self.teams.team_at(frame, to))
            else {
                log::debug!(
                    "frame {}: possession {} -> {} skipped, team unknown",
                    frame,
                    from,
                    to
                );
                continue;
            };

            let kind = if from_team == to_team {
                PossessionChangeKind::Pass
            } else {
                PossessionChangeKind::Interception
            };
            changes.push(PossessionChange {
                frame,
                from,
                to,
                kind,
                from_team,
                to_team,
            });
        }

        changes
    }

    /// Infers the changes and credits them: passes to the passer,
    /// interceptions as a steal and a turnover.
    pub fn infer_and_record(
        &self,
        possession: &[Option<PlayerId>],
        ledger: &mut StatsLedger<'_>,
    ) -> Vec<PossessionChange> {
        let changes = self.infer(possession);
        for change in &changes {
            match change.kind {
                PossessionChangeKind::Pass => ledger.record_pass(change.from, change.to),
                PossessionChangeKind::Interception => ledger.record_interception(change.from, change.to),
            }
        }
        changes
    }
}

/// Counts per team: passes by the passing team, interceptions by the team
/// that won the ball.
pub fn team_event_counts(changes: &[PossessionChange]) -> BTreeMap<TeamId, TeamEventCounts> {
    let mut counts: BTreeMap<TeamId, TeamEventCounts> = BTreeMap::new();
    for change in changes {
        match change.kind {
            PossessionChangeKind::Pass => counts.entry(change.from_team).or_default().passes += 1,
            PossessionChangeKind::Interception => {
                counts.entry(change.to_team).or_default().interceptions += 1
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerTrack, Roster, Team};

    const A: PlayerId = 1;
    const B: PlayerId = 2;

    fn teams(a_team: TeamId, b_team: TeamId) -> TeamAssignments {
        TeamAssignments::new(vec![BTreeMap::from([(A, a_team), (B, b_team)])])
    }

    #[test]
    fn test_same_team_is_pass() {
        let teams = teams(1, 1);
        let changes = PassInferencer::new(&teams).infer(&[Some(A), Some(A), Some(A), Some(B), Some(B)]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].frame, 3);
        assert!(changes[0].is_pass());
        assert_eq!((changes[0].from, changes[0].to), (A, B));
    }

    #[test]
    fn test_opposing_team_is_interception() {
        let teams = teams(1, 2);
        let changes = PassInferencer::new(&teams).infer(&[Some(A), Some(A), Some(A), Some(B), Some(B)]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].frame, 3);
        assert!(changes[0].is_interception());
    }

    #[test]
    fn test_change_across_gap() {
        let teams = teams(1, 1);
        let changes = PassInferencer::new(&teams).infer(&[Some(A), None, None, Some(B)]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].frame, 3);
    }

    #[test]
    fn test_gap_back_to_same_holder_is_not_event() {
        let teams = teams(1, 1);
        let changes = PassInferencer::new(&teams).infer(&[Some(A), None, Some(A), None]);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_frame_local_team_used() {
        // B switches teams at frame 2
        let teams = TeamAssignments::new(vec![
            BTreeMap::from([(A, 1), (B, 1)]),
            BTreeMap::from([(A, 1), (B, 1)]),
            BTreeMap::from([(A, 1), (B, 2)]),
        ]);
        let changes = PassInferencer::new(&teams).infer(&[Some(A), None, Some(B)]);
        assert!(changes[0].is_interception());
    }

    #[test]
    fn test_unknown_team_skipped() {
        let teams = TeamAssignments::new(vec![BTreeMap::from([(A, 1)])]);
        let changes = PassInferencer::new(&teams).infer(&[Some(A), Some(B)]);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_record_credits_stats() {
        let mut roster = Roster::new(
            [PlayerTrack::new(A, BTreeMap::new()), PlayerTrack::new(B, BTreeMap::new()), PlayerTrack::new(3, BTreeMap::new())],
            [Team::new(1, "Home"), Team::new(2, "Away")],
        );
        let teams = TeamAssignments::new(vec![BTreeMap::from([(A, 1), (B, 1), (3, 2)])]);
        let series = [Some(A), Some(B), Some(3)];
        let changes = PassInferencer::new(&teams).infer_and_record(&series, &mut roster.ledger());

        assert_eq!(changes.len(), 2);
        assert_eq!(roster.player(A).unwrap().stats.pass_count, 1);
        assert_eq!(roster.player(B).unwrap().stats.turnovers, 1);
        assert_eq!(roster.player(3).unwrap().stats.steals, 1);

        let counts = team_event_counts(&changes);
        assert_eq!(counts[&1], TeamEventCounts { passes: 1, interceptions: 0 });
        assert_eq!(counts[&2], TeamEventCounts { passes: 0, interceptions: 1 });
    }
}
