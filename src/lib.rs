//! Proximity capture and domination scoring for a lockstep RTS simulation.
//!
//! Strategic points track the eligible actors standing inside their zone and
//! change hands according to their capture policy. Players holding points
//! accumulate score every scoring interval; the domination victory condition
//! turns team totals, eliminations and time-limit standings into objective
//! completion or failure.
//!
//! Everything runs inside a headless Bevy app driven one [`ecs::SimTick`] at a
//! time, see [`ecs::build_match_app`].

pub mod config;
pub mod ecs;
pub mod error;
pub mod feedback;
pub mod id;
pub mod model;
pub mod scripting;

pub use config::{
    DominationVictoryInfo, GameModeInfo, LobbySettings, MapOptions, ProximityCapturableInfo,
    ProximityCapturableKind, Ruleset,
};
pub use error::{ConfigError, ScriptError};
pub use id::IdGenerator;
pub use model::{CPos, CaptureTypes, ObjectiveState, WDist, WPos, WinState};
