//! Core data types: tracks, stats, events and the input contract.

pub mod assignments;
pub mod events;
pub mod input;
pub mod stats;
pub mod tracks;

pub use assignments::TeamAssignments;
pub use events::{PossessionChange, PossessionChangeKind, ShotEvent, ShotOutcome};
pub use input::{GameInput, HoopInput, PlayerInput, TeamInput};
pub use stats::{PlayerStats, Roster, ShotLocation, StatsLedger, Team};
pub use tracks::{
    BallTrack, FrameBoxes, HoopDetection, HoopTrack, PlayerId, PlayerTrack, TeamId, TrackKind,
};
