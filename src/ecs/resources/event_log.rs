use bevy_ecs::resource::Resource;

use crate::model::effect::EventEffect;
use crate::model::event::{EventKind, EventParticipant};

/// An audit-log record stamped with the world tick it was applied on.
#[derive(Debug, Clone, PartialEq)]
pub struct EcsEvent {
    pub id: u64,
    pub kind: EventKind,
    pub tick: u64,
    pub description: String,
    pub caused_by: Option<u64>,
    pub data: serde_json::Value,
}

/// Accumulates events, participants, and effects until the host drains them.
#[derive(Resource, Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<EcsEvent>,
    pub participants: Vec<EventParticipant>,
    pub effects: Vec<EventEffect>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.participants.clear();
        self.effects.clear();
    }

    pub fn events_of_kind<'a>(&'a self, kind: &'a EventKind) -> impl Iterator<Item = &'a EcsEvent> {
        self.events.iter().filter(move |e| &e.kind == kind)
    }
}
