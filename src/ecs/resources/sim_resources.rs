use std::collections::BTreeMap;

use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;

use crate::IdGenerator;

/// ID generator for audit-log events.
#[derive(Resource, Default)]
pub struct EcsIdGenerator(pub IdGenerator);

/// ID generator for actors spawned into the match.
#[derive(Resource, Default)]
pub struct ActorIdGenerator(pub IdGenerator);

/// Team totals computed on the latest scoring tick, keyed by player.
///
/// Written once per scoring tick after every award of that tick was applied;
/// read-only for everything else.
#[derive(Resource, Debug, Clone, Default)]
pub struct TeamScores {
    pub totals: BTreeMap<Entity, i64>,
    /// Tick the totals were computed on.
    pub tick: u64,
}

impl TeamScores {
    pub fn total(&self, player: Entity) -> Option<i64> {
        self.totals.get(&player).copied()
    }
}

/// Optional match time limit, in world ticks.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeLimit {
    pub limit: Option<u64>,
    pub expired: bool,
}

impl TimeLimit {
    pub fn at_tick(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            expired: false,
        }
    }

    pub fn is_reached(&self, world_tick: u64) -> bool {
        !self.expired && self.limit.is_some_and(|limit| world_tick >= limit)
    }
}

/// The player controlled from this peer, if any. Only it hears speech notifications.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalPlayer(pub Option<Entity>);
