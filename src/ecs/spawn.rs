use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::config::{ActorInfo, MissionObjectivesInfo, ProximityCapturableInfo};
use crate::ecs::clock::MatchClock;
use crate::ecs::components::*;
use crate::ecs::resources::{ActorIdGenerator, ActorRegistry};
use crate::model::{CPos, CaptureTypes, WPos};

fn register(world: &mut World, id: u64, entity: Entity) {
    // Graceful when ActorRegistry is temporarily removed from the world
    // (e.g. during apply_sim_commands, which extracts it into ApplyCtx).
    if let Some(mut registry) = world.get_resource_mut::<ActorRegistry>() {
        registry.insert(id, entity);
    }
}

fn sim_actor(world: &mut World, name: &str) -> SimActor {
    let id = match world.get_resource_mut::<ActorIdGenerator>() {
        Some(mut ids) => ids.0.next_id(),
        None => 0,
    };
    let spawned_at = world
        .get_resource::<MatchClock>()
        .map_or(1, |clock| clock.world_tick);
    SimActor {
        id,
        name: name.to_string(),
        spawned_at,
        removed_at: None,
    }
}

/// Spawn a player entity with an empty ledger and no objectives.
pub fn spawn_player(
    world: &mut World,
    core: PlayerCore,
    captor: Option<ProximityCaptor>,
    objectives: MissionObjectivesInfo,
) -> Entity {
    let actor = sim_actor(world, &core.name);
    let id = actor.id;
    let mut entity = world.spawn((
        actor,
        core,
        WinStatus::default(),
        PlayerExperience::default(),
        MissionObjectives::new(objectives),
    ));
    if let Some(captor) = captor {
        entity.insert(captor);
    }
    let entity = entity.id();
    register(world, id, entity);
    entity
}

/// Spawn a positioned actor owned by `owner`.
pub fn spawn_actor(world: &mut World, name: &str, owner: Entity, position: WPos) -> Entity {
    let actor = sim_actor(world, name);
    let id = actor.id;
    let entity = world
        .spawn((actor, Owner(owner), CenterPosition(position)))
        .id();
    register(world, id, entity);
    entity
}

/// Spawn an actor able to capture proximity capturables of matching types.
pub fn spawn_captor(
    world: &mut World,
    name: &str,
    owner: Entity,
    position: WPos,
    types: CaptureTypes,
) -> Entity {
    let entity = spawn_actor(world, name, owner, position);
    world.entity_mut(entity).insert(ProximityCaptor { types });
    entity
}

/// Spawn a proximity capturable. `area` overrides the rule's cells for area regions.
pub fn spawn_capturable(
    world: &mut World,
    name: &str,
    owner: Entity,
    position: WPos,
    info: ProximityCapturableInfo,
    area: Option<Vec<CPos>>,
) -> Entity {
    let area = area.unwrap_or_else(|| info.area.clone());
    let entity = spawn_actor(world, name, owner, position);
    world
        .entity_mut(entity)
        .insert(ProximityCapturable::new(info, owner, area));
    entity
}

/// Spawn an actor with the components its rules describe.
pub fn spawn_actor_from_info(
    world: &mut World,
    name: &str,
    info: &ActorInfo,
    owner: Entity,
    position: WPos,
    area: Option<Vec<CPos>>,
) -> Entity {
    let entity = match &info.proximity_capturable {
        Some(capturable) => spawn_capturable(world, name, owner, position, capturable.clone(), area),
        None => spawn_actor(world, name, owner, position),
    };

    let mut actor = world.entity_mut(entity);
    if let Some(captor) = &info.proximity_captor {
        actor.insert(ProximityCaptor {
            types: captor.types.clone(),
        });
    }
    if info.strategic_point {
        actor.insert(StrategicPoint);
    }
    if let Some(must) = &info.must_be_destroyed {
        actor.insert(MustBeDestroyed {
            required_for_short_game: must.required_for_short_game,
        });
    }
    if let Some(gains) = &info.gains_experience {
        actor.insert(GainsExperience::new(gains.max_level));
    }
    if let Some(delivers) = &info.delivers_experience {
        actor.insert(DeliversExperience {
            player_experience: delivers.player_experience.clone(),
        });
    }
    entity
}
