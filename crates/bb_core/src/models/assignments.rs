//! Per-frame team lookup.

use std::collections::BTreeMap;

use super::tracks::{PlayerId, TeamId};

/// Team membership as reported by the upstream classifier, frame by frame.
///
/// A player missing from a frame's map keeps the team of the nearest earlier
/// frame that assigned them. Later frames are never consulted, so a player
/// first assigned at frame 40 has no team before frame 40.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamAssignments {
    /// player → (first frame, team) for every change of team, ascending by frame
    history: BTreeMap<PlayerId, Vec<(usize, TeamId)>>,
}

impl TeamAssignments {
    pub fn new(frames: Vec<BTreeMap<PlayerId, TeamId>>) -> Self {
        let mut history: BTreeMap<PlayerId, Vec<(usize, TeamId)>> = BTreeMap::new();
        for (frame, assignment) in frames.iter().enumerate() {
            for (&player, &team) in assignment {
                let changes = history.entry(player).or_default();
                if changes.last().map(|&(_, t)| t) != Some(team) {
                    changes.push((frame, team));
                }
            }
        }
        Self { history }
    }

    pub fn team_at(&self, frame: usize, player: PlayerId) -> Option<TeamId> {
        let changes = self.history.get(&player)?;
        let upto = changes.partition_point(|&(f, _)| f <= frame);
        upto.checked_sub(1).map(|i| changes[i].1)
    }
}
