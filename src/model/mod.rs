#[macro_use]
mod macros;

pub mod capture_types;
pub mod effect;
pub mod event;
pub mod geometry;
pub mod player;

pub use capture_types::CaptureTypes;
pub use effect::{EventEffect, StateChange};
pub use event::{EventKind, EventParticipant, ParticipantRole};
pub use geometry::{CELL_SIZE, CPos, WDist, WPos, expand_footprint};
pub use player::{ObjectiveState, ObjectiveType, WinState};
