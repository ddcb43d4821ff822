pub mod applicator;
mod apply_capture;
mod apply_experience;
mod apply_lifecycle;
mod apply_objectives;

use bevy_ecs::entity::Entity;
use bevy_ecs::message::Message;

use crate::model::event::{EventKind, ParticipantRole};

pub use applicator::apply_sim_commands;

/// A command describing an intended state change in the simulation.
///
/// Systems emit these via `MessageWriter<SimCommand>`. The centralized applicator
/// in `SimPhase::PostUpdate` processes them: re-checks that the entities involved
/// are still in the world, applies state changes, records audit trail entries in
/// `EventLog`, and emits `SimReactiveEvent` messages.
#[derive(Message, Clone, Debug)]
pub struct SimCommand {
    /// The intent: what state change to apply.
    pub kind: SimCommandKind,
    /// Human-readable description for the EventLog.
    pub description: String,
    /// Causal chain: event_id of the event that triggered this command.
    pub caused_by: Option<u64>,
    /// What EventKind to record in the EventLog.
    pub event_kind: EventKind,
    /// Entities involved and their roles.
    pub participants: Vec<(Entity, ParticipantRole)>,
    /// Structured metadata for the Event.data field.
    pub event_data: serde_json::Value,
}

impl SimCommand {
    /// Create a command that records a full Event in the log.
    pub fn new(kind: SimCommandKind, event_kind: EventKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            caused_by: None,
            event_kind,
            participants: Vec::new(),
            event_data: serde_json::Value::Null,
        }
    }

    pub fn caused_by(mut self, event_id: u64) -> Self {
        self.caused_by = Some(event_id);
        self
    }

    pub fn with_participant(mut self, entity: Entity, role: ParticipantRole) -> Self {
        self.participants.push((entity, role));
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.event_data = data;
        self
    }
}

/// All state-change intents the applicator understands.
#[derive(Clone, Debug)]
pub enum SimCommandKind {
    // -- Capture --
    /// Give `region` to the owner of `captor`. A player entity as captor
    /// means the player itself.
    TransferOwnership {
        region: Entity,
        captor: Entity,
    },
    ChangeOwner {
        actor: Entity,
        new_owner: Entity,
    },

    // -- Objectives --
    MarkObjectiveCompleted {
        player: Entity,
        objective: usize,
    },
    MarkObjectiveFailed {
        player: Entity,
        objective: usize,
    },
    ForceDefeat {
        player: Entity,
    },

    // -- Experience --
    GrantPlayerExperience {
        player: Entity,
        amount: i64,
    },
    DonateExperience {
        deliverer: Entity,
        target: Entity,
        levels: u32,
        player_experience: i64,
    },

    // -- Lifecycle --
    RemoveFromWorld {
        actor: Entity,
    },
    ExpireTimeLimit,
}
