use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::ecs::components::{Owner, PlayerCore, ProximityCaptor, ProximityCapturable};
use crate::ecs::events::SimReactiveEvent;
use crate::model::event::ParticipantRole;

use super::SimCommand;
use super::applicator::{ApplyCtx, is_in_world};

/// The player a captor acts for: a player entity captures for itself,
/// anything else for its owner.
fn acting_player(world: &World, captor: Entity) -> Option<Entity> {
    if world.get::<PlayerCore>(captor).is_some() {
        return Some(captor);
    }
    world.get::<Owner>(captor).map(|o| o.0)
}

/// Transfer a capturable region to the captor's player.
///
/// Skipped when either side has left the world since the command was issued,
/// or when the region already belongs to that player.
pub(crate) fn apply_transfer_ownership(
    ctx: &mut ApplyCtx,
    world: &mut World,
    cmd: &SimCommand,
    region: Entity,
    captor: Entity,
) {
    if !is_in_world(world, region) || !is_in_world(world, captor) {
        tracing::debug!(?region, ?captor, "skipping ownership transfer, actor left the world");
        return;
    }

    let Some(new_owner) = acting_player(world, captor) else {
        tracing::debug!(?captor, "skipping ownership transfer, captor has no owner");
        return;
    };
    let Some(old_owner) = world.get::<Owner>(region).map(|o| o.0) else {
        tracing::warn!(?region, "ownership transfer for an unowned region");
        return;
    };
    if old_owner == new_owner {
        return;
    }

    let captor_types = world
        .get::<ProximityCaptor>(captor)
        .map(|c| c.types.clone())
        .unwrap_or_default();

    if let Some(mut capturable) = world.get_mut::<ProximityCapturable>(region) {
        capturable.skip_trigger_update = true;
    }
    world.entity_mut(region).insert(Owner(new_owner));

    let event_id = ctx.record_event(cmd);
    ctx.add_participant(event_id, old_owner, ParticipantRole::PreviousOwner);
    ctx.add_participant(event_id, new_owner, ParticipantRole::NewOwner);
    let effect = ctx.owner_effect(old_owner, new_owner);
    ctx.record_effect(event_id, region, effect);

    tracing::info!(?region, ?old_owner, ?new_owner, "region captured");

    ctx.emit(SimReactiveEvent::Captured {
        event_id,
        region,
        captor,
        old_owner,
        new_owner,
        captor_types,
    });
}

/// Hand an actor to another player outright.
pub(crate) fn apply_change_owner(
    ctx: &mut ApplyCtx,
    world: &mut World,
    cmd: &SimCommand,
    actor: Entity,
    new_owner: Entity,
) {
    if !is_in_world(world, actor) {
        tracing::debug!(?actor, "skipping owner change, actor left the world");
        return;
    }
    let Some(old_owner) = world.get::<Owner>(actor).map(|o| o.0) else {
        tracing::warn!(?actor, "owner change for an unowned actor");
        return;
    };
    if old_owner == new_owner {
        return;
    }

    world.entity_mut(actor).insert(Owner(new_owner));

    let event_id = ctx.record_event(cmd);
    ctx.add_participant(event_id, old_owner, ParticipantRole::PreviousOwner);
    ctx.add_participant(event_id, new_owner, ParticipantRole::NewOwner);
    let effect = ctx.owner_effect(old_owner, new_owner);
    ctx.record_effect(event_id, actor, effect);
    ctx.emit(SimReactiveEvent::OwnerChanged {
        event_id,
        actor,
        old_owner,
        new_owner,
    });
}
