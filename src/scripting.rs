//! Actions exposed to mission scripts.
//!
//! Script calls check their preconditions synchronously and report misuse as
//! a [`ScriptError`]; the state change itself is queued as a command and
//! applied with the rest of the tick's commands.

use bevy_ecs::entity::Entity;
use bevy_ecs::message::Messages;
use bevy_ecs::world::World;

use crate::ecs::commands::{SimCommand, SimCommandKind};
use crate::ecs::components::{DeliversExperience, GainsExperience, SimActor};
use crate::ecs::resources::ActiveGameMode;
use crate::error::ScriptError;
use crate::model::event::{EventKind, ParticipantRole};

fn name_of(world: &World, entity: Entity) -> String {
    world
        .get::<SimActor>(entity)
        .map_or_else(|| format!("{entity:?}"), |a| a.name.clone())
}

/// Have `deliverer` hand its experience to `target` and leave the world.
///
/// The target gains as many levels as the deliverer has (at least one), capped
/// at its maximum. A target already at its maximum level is left alone.
pub fn deliver_experience(
    world: &mut World,
    deliverer: Entity,
    target: Entity,
) -> Result<(), ScriptError> {
    for actor in [deliverer, target] {
        if !world
            .get::<SimActor>(actor)
            .is_some_and(SimActor::is_in_world)
        {
            return Err(ScriptError::NotInWorld(name_of(world, actor)));
        }
    }

    let Some(delivers) = world.get::<DeliversExperience>(deliverer) else {
        return Err(ScriptError::MissingCapability {
            actor: name_of(world, deliverer),
            capability: "DeliversExperience",
        });
    };
    let Some(deliverer_level) = world.get::<GainsExperience>(deliverer).map(|g| g.level) else {
        return Err(ScriptError::MissingCapability {
            actor: name_of(world, deliverer),
            capability: "GainsExperience",
        });
    };
    let Some(target_experience) = world.get::<GainsExperience>(target) else {
        return Err(ScriptError::CannotGainExperience(name_of(world, target)));
    };
    if !target_experience.can_gain_level() {
        return Ok(());
    }

    let player_experience = world
        .get_resource::<ActiveGameMode>()
        .map_or(0, |mode| mode.player_experience(&delivers.player_experience));
    let levels = deliverer_level.max(1);

    let command = SimCommand::new(
        SimCommandKind::DonateExperience {
            deliverer,
            target,
            levels,
            player_experience,
        },
        EventKind::ExperienceDelivered,
        format!(
            "{} delivered experience to {}",
            name_of(world, deliverer),
            name_of(world, target)
        ),
    )
    .with_participant(deliverer, ParticipantRole::Subject)
    .with_participant(target, ParticipantRole::Target);

    world.resource_mut::<Messages<SimCommand>>().write(command);
    Ok(())
}
