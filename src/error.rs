//! Recoverable error types.
//!
//! Rule and lobby problems surface as [`ConfigError`] before the first tick.
//! Misuse from the scripting layer surfaces as [`ScriptError`] so the caller
//! can catch it. Broken simulation invariants are not errors: they panic.

use thiserror::Error;

/// Invalid rules or lobby settings, detected while setting up a match.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{actor}` is proximity capturable, which requires the player actor to have a ProximityCaptor")]
    MissingPlayerCaptor { actor: String },

    #[error("domination score interval must be at least one tick")]
    InvalidScoreInterval,

    #[error("unknown game mode `{0}`")]
    UnknownGameMode(String),

    #[error("lobby option `{key}` has invalid value `{value}`")]
    InvalidLobbyOption { key: String, value: String },

    #[error("unknown actor type `{0}`")]
    UnknownActor(String),

    #[error("map actor `{actor}` is owned by player slot {slot}, which does not exist")]
    UnknownPlayerSlot { actor: String, slot: usize },

    #[error("failed to parse rules: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A scripted action was directed at an actor that cannot perform or receive it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Actor '{0}' cannot gain experience!")]
    CannotGainExperience(String),

    #[error("Actor '{actor}' does not have the {capability} capability")]
    MissingCapability {
        actor: String,
        capability: &'static str,
    },

    #[error("Actor '{0}' is not in the world")]
    NotInWorld(String),
}
