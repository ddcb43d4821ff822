use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::ecs::components::SimActor;
use crate::ecs::events::SimReactiveEvent;
use crate::model::effect::StateChange;

use super::SimCommand;
use super::applicator::ApplyCtx;

/// Take an actor out of the world: set `SimActor.removed_at`.
/// Idempotent: if already removed, no-op (nothing recorded).
pub(crate) fn apply_remove_from_world(
    ctx: &mut ApplyCtx,
    world: &mut World,
    cmd: &SimCommand,
    actor: Entity,
) {
    let in_world = world
        .get::<SimActor>(actor)
        .is_some_and(SimActor::is_in_world);
    if !in_world {
        return;
    }
    let event_id = ctx.record_event(cmd);
    remove_from_world(ctx, world, event_id, actor);
}

pub(crate) fn remove_from_world(ctx: &mut ApplyCtx, world: &mut World, event_id: u64, actor: Entity) {
    let Some(mut sim_actor) = world.get_mut::<SimActor>(actor) else {
        return;
    };
    if sim_actor.removed_at.is_some() {
        return;
    }
    sim_actor.removed_at = Some(ctx.tick);

    ctx.record_effect(event_id, actor, StateChange::RemovedFromWorld);
    ctx.emit(SimReactiveEvent::ActorRemoved { event_id, actor });
}

pub(crate) fn apply_expire_time_limit(ctx: &mut ApplyCtx, cmd: &SimCommand) {
    let event_id = ctx.record_event(cmd);
    tracing::info!(tick = ctx.tick, "time limit expired");
    ctx.emit(SimReactiveEvent::TimeLimitExpired { event_id });
}
