//! In-memory box score.

use serde::{Deserialize, Serialize};

use crate::analysis::{average_speed, team_event_counts, total_distance, MotionSeries};
use crate::models::{PlayerId, PlayerStats, PossessionChange, Roster, ShotEvent, TeamId};
use crate::possession::PossessionShare;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub id: TeamId,
    pub name: String,
    pub score: u32,
    pub possession_pct: f64,
    pub passes: u32,
    pub interceptions: u32,
    pub field_goals_made: u32,
    pub field_goals_attempted: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub team: Option<TeamId>,
    pub stats: PlayerStats,
    pub field_goal_pct: f64,
    pub distance_m: f64,
    pub avg_speed_kmh: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub teams: Vec<TeamSummary>,
    pub players: Vec<PlayerSummary>,
    pub shots_made: usize,
    pub shots_missed: usize,
}

impl GameSummary {
    pub fn build(
        roster: &Roster,
        share: &PossessionShare,
        changes: &[PossessionChange],
        motion: &MotionSeries,
        shots: &[ShotEvent],
    ) -> Self {
        let distances = total_distance(motion);
        let speeds = average_speed(motion);
        let events = team_event_counts(changes);

        let players: Vec<PlayerSummary> = roster
            .players()
            .values()
            .map(|p| PlayerSummary {
                id: p.id,
                team: p.team,
                stats: p.stats.clone(),
                field_goal_pct: p.stats.field_goal_pct(),
                distance_m: distances.get(&p.id).copied().unwrap_or(0.0),
                avg_speed_kmh: speeds.get(&p.id).copied().unwrap_or(0.0),
            })
            .collect();

        let teams = roster
            .teams()
            .values()
            .map(|t| {
                let members = players.iter().filter(|p| p.team == Some(t.id));
                let (made, attempted) = members.fold((0, 0), |(m, a), p| {
                    (m + p.stats.field_goals_made, a + p.stats.field_goals_attempted)
                });
                let counts = events.get(&t.id).copied().unwrap_or_default();
                TeamSummary {
                    id: t.id,
                    name: t.name.clone(),
                    score: t.score,
                    possession_pct: share.percent(t.id),
                    passes: counts.passes,
                    interceptions: counts.interceptions,
                    field_goals_made: made,
                    field_goals_attempted: attempted,
                }
            })
            .collect();

        let shots_made = shots.iter().filter(|s| s.outcome.is_made()).count();
        Self {
            teams,
            players,
            shots_made,
            shots_missed: shots.len() - shots_made,
        }
    }

    pub fn team(&self, id: TeamId) -> Option<&TeamSummary> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerSummary> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Highest scorer; ties go to the lower id.
    pub fn top_scorer(&self) -> Option<&PlayerSummary> {
        self.players
            .iter()
            .filter(|p| p.stats.points > 0)
            .fold(None, |best: Option<&PlayerSummary>, p| match best {
                Some(b) if b.stats.points >= p.stats.points => Some(b),
                _ => Some(p),
            })
    }
}
