use std::collections::BTreeMap;

use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;

/// Bidirectional mapping between stable actor ids (u64) and Bevy entities.
///
/// Actor ids are what the audit log and hosts see; entities stay internal.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActorRegistry {
    to_entity: BTreeMap<u64, Entity>,
    to_actor: BTreeMap<Entity, u64>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping. Panics if the actor id is already registered.
    pub fn insert(&mut self, actor_id: u64, entity: Entity) {
        let prev = self.to_entity.insert(actor_id, entity);
        assert!(prev.is_none(), "duplicate actor id {actor_id} in ActorRegistry");
        self.to_actor.insert(entity, actor_id);
    }

    pub fn entity(&self, actor_id: u64) -> Option<Entity> {
        self.to_entity.get(&actor_id).copied()
    }

    pub fn actor_id(&self, entity: Entity) -> Option<u64> {
        self.to_actor.get(&entity).copied()
    }

    pub fn len(&self) -> usize {
        self.to_entity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_entity.is_empty()
    }
}
