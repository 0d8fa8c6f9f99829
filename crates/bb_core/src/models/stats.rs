//! Player and team statistics.
//!
//! Counters only ever grow. Outside of [`StatsLedger`] the roster is
//! read-only; the ledger is handed to the pass inferencer and the shot state
//! machine, the only two stages allowed to credit stats.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tracks::{PlayerId, PlayerTrack, TeamId};
use crate::geometry::Point2;

/// Where a shot was taken from, in tactical coordinates when known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotLocation {
    pub frame: usize,
    pub position: Option<Point2>,
    pub made: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub points: u32,
    pub assists: u32,
    pub rebounds_offensive: u32,
    pub rebounds_defensive: u32,
    pub steals: u32,
    pub turnovers: u32,

    pub field_goals_made: u32,
    pub field_goals_attempted: u32,

    pub shot_locations: Vec<ShotLocation>,
    pub pass_count: u32,
    pub pass_targets: BTreeMap<PlayerId, u32>,
}

impl PlayerStats {
    pub fn record_shot(&mut self, location: ShotLocation, points: u32) {
        self.field_goals_attempted += 1;
        if location.made {
            self.field_goals_made += 1;
            self.points += points;
        }
        self.shot_locations.push(location);
    }

    pub fn record_pass(&mut self, target: PlayerId) {
        self.pass_count += 1;
        *self.pass_targets.entry(target).or_insert(0) += 1;
    }

    /// Field goal percentage, 0 with no attempts.
    pub fn field_goal_pct(&self) -> f64 {
        if self.field_goals_attempted == 0 {
            return 0.0;
        }
        self.field_goals_made as f64 / self.field_goals_attempted as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub score: u32,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
        }
    }
}

/// Players and teams of one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    players: BTreeMap<PlayerId, PlayerTrack>,
    teams: BTreeMap<TeamId, Team>,
}

impl Roster {
    pub fn new(players: impl IntoIterator<Item = PlayerTrack>, teams: impl IntoIterator<Item = Team>) -> Self {
        Self {
            players: players.into_iter().map(|p| (p.id, p)).collect(),
            teams: teams.into_iter().map(|t| (t.id, t)).collect(),
        }
    }

    pub fn players(&self) -> &BTreeMap<PlayerId, PlayerTrack> {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerTrack> {
        self.players.get(&id)
    }

    pub fn teams(&self) -> &BTreeMap<TeamId, Team> {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(&id)
    }

    /// Records the latest team seen for each player. Teams referenced but
    /// not declared are created with a generated name.
    pub fn apply_team_assignments(&mut self, assignments: &[BTreeMap<PlayerId, TeamId>]) {
        for frame_assignment in assignments {
            for (player_id, team_id) in frame_assignment {
                if let Some(player) = self.players.get_mut(player_id) {
                    player.team = Some(*team_id);
                }
                self.teams
                    .entry(*team_id)
                    .or_insert_with(|| Team::new(*team_id, format!("Team {}", team_id)));
            }
        }
    }

    /// The only way to mutate stats and scores.
    pub fn ledger(&mut self) -> StatsLedger<'_> {
        StatsLedger { roster: self }
    }
}

/// Mutable handle over a roster's stats and scores.
pub struct StatsLedger<'a> {
    roster: &'a mut Roster,
}

impl StatsLedger<'_> {
    pub fn record_pass(&mut self, from: PlayerId, to: PlayerId) {
        if let Some(passer) = self.roster.players.get_mut(&from) {
            passer.stats.record_pass(to);
        }
    }

    pub fn record_interception(&mut self, from: PlayerId, to: PlayerId) {
        if let Some(loser) = self.roster.players.get_mut(&from) {
            loser.stats.turnovers += 1;
        }
        if let Some(thief) = self.roster.players.get_mut(&to) {
            thief.stats.steals += 1;
        }
    }

    /// Credits a shot to the shooter and, when made, the team score.
    pub fn record_shot(
        &mut self,
        shooter: Option<PlayerId>,
        team: Option<TeamId>,
        location: ShotLocation,
        points: u32,
    ) {
        if let Some(player) = shooter.and_then(|id| self.roster.players.get_mut(&id)) {
            player.stats.record_shot(location, points);
        }
        if location.made {
            if let Some(team) = team.and_then(|id| self.roster.teams.get_mut(&id)) {
                team.score += points;
            }
        }
    }

    pub fn record_assist(&mut self, passer: PlayerId) {
        if let Some(player) = self.roster.players.get_mut(&passer) {
            player.stats.assists += 1;
        }
    }

    pub fn record_rebound(&mut self, player: PlayerId, offensive: bool) {
        if let Some(p) = self.roster.players.get_mut(&player) {
            if offensive {
                p.stats.rebounds_offensive += 1;
            } else {
                p.stats.rebounds_defensive += 1;
            }
        }
    }
}
