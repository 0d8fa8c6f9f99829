//! Shot detection and scoring.
//!
//! A coarse hoop collision opens a shot; an ellipse under the rim decides
//! make or miss. After every shot the detector shows the result for
//! `display_frames` frames and ignores the hoops meanwhile, so a ball
//! dwelling in the net produces one event, not one per frame.
//!
//! The same walk follows the possession series to keep the ball's last owner
//! current, credit assists on makes and rebounds after misses.

use crate::config::ShotThresholds;
use crate::geometry::{BoundingBox, Point2};
use crate::models::{
    BallTrack, FrameBoxes, HoopTrack, PlayerId, PossessionChange, ShotEvent, ShotLocation,
    ShotOutcome, StatsLedger, TeamAssignments, TeamId,
};
use crate::tactical::TacticalPositions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotPhase {
    Idle,
    DisplayingResult { remaining: u32 },
}

/// A miss waiting for the next confirmed holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRebound {
    frame: usize,
    shooting_team: Option<TeamId>,
}

/// Read-only series the detector walks alongside the ball.
pub struct ShotInputs<'a> {
    pub hoops: &'a [HoopTrack],
    pub possession: &'a [Option<PlayerId>],
    pub changes: &'a [PossessionChange],
    pub teams: &'a TeamAssignments,
    pub tactical: &'a TacticalPositions,
}

pub struct ShotDetector {
    thresholds: ShotThresholds,
    phase: ShotPhase,
    /// Frame the last owner was last confirmed holding the ball
    owner_frame: Option<usize>,
    pending_rebound: Option<PendingRebound>,
    /// Index into `changes` already credited with an assist
    last_assisted_change: Option<usize>,
}

impl ShotDetector {
    pub fn new(thresholds: ShotThresholds) -> Self {
        Self {
            thresholds,
            phase: ShotPhase::Idle,
            owner_frame: None,
            pending_rebound: None,
            last_assisted_change: None,
        }
    }

    pub fn phase(&self) -> ShotPhase {
        self.phase
    }

    /// Ball center within the hoop's horizontal or vertical span.
    pub fn collides(hoop: &BoundingBox, ball_center: Point2) -> bool {
        (hoop.x1..=hoop.x2).contains(&ball_center.x) || (hoop.y1..=hoop.y2).contains(&ball_center.y)
    }

    /// Normalized quadratic form of the ball center against the ellipse
    /// sitting on the hoop's bottom edge.
    pub fn ellipse_value(&self, hoop: &BoundingBox, ball_center: Point2) -> f64 {
        let a = (hoop.width() / 2.0).max(1.0);
        let b = self.thresholds.ellipse_vertical_ratio * a;
        let h = (hoop.x1 + hoop.x2) / 2.0;
        let k = hoop.y2;
        let dx = ball_center.x - h;
        let dy = ball_center.y - k;
        dx * dx / (a * a) + dy * dy / (b * b)
    }

    pub fn classify(&self, hoop: &BoundingBox, ball_center: Point2) -> ShotOutcome {
        if self.ellipse_value(hoop, ball_center) <= self.thresholds.ellipse_threshold {
            ShotOutcome::Made
        } else {
            ShotOutcome::Missed
        }
    }

    /// Advances one frame. Returns the outcome and the hoop index when a shot
    /// opens on this frame.
    pub fn step(&mut self, frame: usize, ball: &BallTrack, hoops: &[HoopTrack]) -> Option<(ShotOutcome, usize)> {
        if let ShotPhase::DisplayingResult { remaining } = self.phase {
            self.phase = if remaining > 1 {
                ShotPhase::DisplayingResult {
                    remaining: remaining - 1,
                }
            } else {
                ShotPhase::Idle
            };
            return None;
        }

        let current = ball.center_at(frame)?;
        let previous = frame.checked_sub(1).and_then(|f| ball.center_at(f));

        for (index, hoop) in hoops.iter().enumerate() {
            let Some(hoop_box) = hoop.box_at(frame) else {
                continue;
            };
            if !Self::collides(hoop_box, current) || previous.is_none() {
                continue;
            }

            let outcome = self.classify(hoop_box, current);
            self.phase = match self.thresholds.display_frames {
                0 => ShotPhase::Idle,
                remaining => ShotPhase::DisplayingResult { remaining },
            };
            return Some((outcome, index));
        }

        None
    }

    /// Walks the whole sequence, crediting every shot through `ledger`.
    pub fn run(
        &mut self,
        ball: &mut BallTrack,
        inputs: &ShotInputs<'_>,
        num_frames: usize,
        ledger: &mut StatsLedger<'_>,
    ) -> Vec<ShotEvent> {
        let mut events = Vec::new();

        for frame in 0..num_frames {
            if let Some(holder) = inputs.possession.get(frame).copied().flatten() {
                ball.set_last_owner(holder);
                self.owner_frame = Some(frame);
                self.credit_rebound(frame, holder, inputs.teams, ledger);
            }

            let Some((outcome, hoop_index)) = self.step(frame, ball, inputs.hoops) else {
                continue;
            };
            let hoop = &inputs.hoops[hoop_index];
            let event = self.attribute(frame, outcome, hoop, ball.last_owner(), inputs, ledger);
            log::debug!(
                "frame {}: {} at {} hoop by {:?}",
                frame,
                outcome.label(),
                hoop.label,
                event.player
            );
            events.push(event);
        }

        log::info!(
            "shots: {} detected, {} made",
            events.len(),
            events.iter().filter(|e| e.outcome.is_made()).count()
        );
        events
    }

    fn attribute(
        &mut self,
        frame: usize,
        outcome: ShotOutcome,
        hoop: &HoopTrack,
        shooter: Option<PlayerId>,
        inputs: &ShotInputs<'_>,
        ledger: &mut StatsLedger<'_>,
    ) -> ShotEvent {
        let team = shooter
            .and_then(|p| inputs.teams.team_at(frame, p))
            .or(hoop.team);
        let points = if outcome.is_made() {
            self.thresholds.points_per_make
        } else {
            0
        };

        let position = match (shooter, self.owner_frame) {
            (Some(p), Some(f)) => inputs.tactical.get(f).and_then(|m| m.get(&p)).copied(),
            _ => None,
        };
        ledger.record_shot(
            shooter,
            team,
            ShotLocation {
                frame,
                position,
                made: outcome.is_made(),
            },
            self.thresholds.points_per_make,
        );

        let assisted_by = match (outcome, shooter) {
            (ShotOutcome::Made, Some(shooter)) => self.find_assist(frame, shooter, inputs.changes),
            _ => None,
        };
        if let Some(passer) = assisted_by {
            ledger.record_assist(passer);
        }

        self.pending_rebound = match outcome {
            ShotOutcome::Missed => Some(PendingRebound {
                frame,
                shooting_team: team,
            }),
            ShotOutcome::Made => None,
        };

        ShotEvent {
            frame,
            outcome,
            hoop: hoop.label.clone(),
            player: shooter,
            team,
            points,
            assisted_by,
        }
    }

    /// Passer of the latest change before `frame`, if it was a pass to the
    /// shooter not already credited.
    fn find_assist(&mut self, frame: usize, shooter: PlayerId, changes: &[PossessionChange]) -> Option<PlayerId> {
        let index = changes.iter().rposition(|c| c.frame <= frame)?;
        let change = &changes[index];
        if !change.is_pass() || change.to != shooter || self.last_assisted_change == Some(index) {
            return None;
        }
        self.last_assisted_change = Some(index);
        Some(change.from)
    }

    fn credit_rebound(
        &mut self,
        frame: usize,
        holder: PlayerId,
        teams: &TeamAssignments,
        ledger: &mut StatsLedger<'_>,
    ) {
        let Some(pending) = self.pending_rebound else {
            return;
        };
        if frame <= pending.frame {
            return;
        }
        self.pending_rebound = None;

        match (pending.shooting_team, teams.team_at(frame, holder)) {
            (Some(shooting), Some(holder_team)) => ledger.record_rebound(holder, shooting == holder_team),
            _ => log::debug!("frame {}: rebound by {} not credited, team unknown", frame, holder),
        }
    }
}
