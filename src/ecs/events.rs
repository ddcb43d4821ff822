use bevy_ecs::entity::Entity;
use bevy_ecs::message::Message;

use crate::model::{CaptureTypes, WinState};

/// Reactive events emitted by the command applicator for cross-system reactions.
///
/// Each variant carries an `event_id` linking back to the EventLog entry that
/// caused it.
#[derive(Message, Clone, Debug)]
pub enum SimReactiveEvent {
    // -- Capture --
    Captured {
        event_id: u64,
        region: Entity,
        captor: Entity,
        old_owner: Entity,
        new_owner: Entity,
        captor_types: CaptureTypes,
    },

    // -- Objectives --
    ObjectiveCompleted {
        event_id: u64,
        player: Entity,
        objective: usize,
    },
    ObjectiveFailed {
        event_id: u64,
        player: Entity,
        objective: usize,
    },

    // -- Win state --
    PlayerWon {
        event_id: u64,
        player: Entity,
    },
    PlayerLost {
        event_id: u64,
        player: Entity,
    },
    TimeLimitExpired {
        event_id: u64,
    },

    // -- Actors --
    OwnerChanged {
        event_id: u64,
        actor: Entity,
        old_owner: Entity,
        new_owner: Entity,
    },
    ActorRemoved {
        event_id: u64,
        actor: Entity,
    },
}

impl SimReactiveEvent {
    /// The win state a `PlayerWon`/`PlayerLost` event announces.
    pub fn win_state(&self) -> Option<(Entity, WinState)> {
        match self {
            SimReactiveEvent::PlayerWon { player, .. } => Some((*player, WinState::Won)),
            SimReactiveEvent::PlayerLost { player, .. } => Some((*player, WinState::Lost)),
            _ => None,
        }
    }
}
