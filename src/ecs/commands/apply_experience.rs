use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::ecs::components::{GainsExperience, Owner, PlayerExperience};
use crate::model::effect::StateChange;

use super::SimCommand;
use super::applicator::{ApplyCtx, is_in_world};
use super::apply_lifecycle::remove_from_world;

/// Add experience to a player's ledger.
pub(crate) fn apply_grant_player_experience(
    ctx: &mut ApplyCtx,
    world: &mut World,
    cmd: &SimCommand,
    player: Entity,
    amount: i64,
) {
    let Some((old, new)) = give_player_experience(world, player, amount) else {
        tracing::warn!(?player, "experience grant for a player without a ledger");
        return;
    };
    let event_id = ctx.record_event(cmd);
    ctx.record_effect(event_id, player, StateChange::ExperienceChanged { old, new });
}

fn give_player_experience(world: &mut World, player: Entity, amount: i64) -> Option<(i64, i64)> {
    let mut ledger = world.get_mut::<PlayerExperience>(player)?;
    let old = ledger.experience;
    ledger.give(amount);
    Some((old, ledger.experience))
}

/// The deliverer hands `levels` to the target and leaves the world. Its owner
/// earns `player_experience` when the target belongs to someone else.
pub(crate) fn apply_donate_experience(
    ctx: &mut ApplyCtx,
    world: &mut World,
    cmd: &SimCommand,
    deliverer: Entity,
    target: Entity,
    levels: u32,
    player_experience: i64,
) {
    if !is_in_world(world, deliverer) || !is_in_world(world, target) {
        tracing::debug!(?deliverer, ?target, "skipping experience delivery, actor left the world");
        return;
    }

    let (old_level, new_level) = {
        let Some(mut gains) = world.get_mut::<GainsExperience>(target) else {
            tracing::debug!(?target, "skipping experience delivery, target cannot gain experience");
            return;
        };
        let old = gains.level;
        gains.give_levels(levels);
        (old, gains.level)
    };

    let event_id = ctx.record_event(cmd);
    if new_level != old_level {
        ctx.record_effect(
            event_id,
            target,
            StateChange::LevelChanged {
                old: old_level,
                new: new_level,
            },
        );
    }

    let deliverer_owner = world.get::<Owner>(deliverer).map(|o| o.0);
    let target_owner = world.get::<Owner>(target).map(|o| o.0);
    if let Some(owner) = deliverer_owner
        && deliverer_owner != target_owner
        && player_experience != 0
        && let Some((old, new)) = give_player_experience(world, owner, player_experience)
    {
        ctx.record_effect(event_id, owner, StateChange::ExperienceChanged { old, new });
    }

    remove_from_world(ctx, world, event_id, deliverer);
}
