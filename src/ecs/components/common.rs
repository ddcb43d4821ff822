use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;

use crate::model::WPos;

/// Identity present on every ECS entity that maps to a match actor, players included.
#[derive(Component, Debug, Clone)]
pub struct SimActor {
    pub id: u64,
    pub name: String,
    pub spawned_at: u64,
    /// Tick the actor left the world; `None` while it is in the world.
    pub removed_at: Option<u64>,
}

impl SimActor {
    pub fn is_in_world(&self) -> bool {
        self.removed_at.is_none()
    }
}

/// The player entity that owns this actor.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(pub Entity);

/// World-space center of an actor.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CenterPosition(pub WPos);

/// Counts towards its owner's domination score while in the world.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct StrategicPoint;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_in_world_until_removed() {
        let mut actor = SimActor {
            id: 7,
            name: "flag".into(),
            spawned_at: 1,
            removed_at: None,
        };
        assert!(actor.is_in_world());
        actor.removed_at = Some(40);
        assert!(!actor.is_in_world());
    }
}
