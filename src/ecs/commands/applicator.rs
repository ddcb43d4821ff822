use std::collections::VecDeque;

use bevy_ecs::entity::Entity;
use bevy_ecs::message::Messages;
use bevy_ecs::world::World;

use crate::ecs::clock::MatchClock;
use crate::ecs::components::SimActor;
use crate::ecs::events::SimReactiveEvent;
use crate::ecs::resources::{ActorRegistry, EcsEvent, EcsIdGenerator, EventLog};
use crate::model::effect::{EventEffect, StateChange};
use crate::model::event::{EventKind, EventParticipant, ParticipantRole};

use super::apply_capture;
use super::apply_experience;
use super::apply_lifecycle;
use super::apply_objectives;
use super::{SimCommand, SimCommandKind};

/// Context passed to all `apply_*` sub-functions, providing mutable access
/// to the resources they need without requiring direct World access.
pub(crate) struct ApplyCtx {
    pub event_log: EventLog,
    pub id_gen: EcsIdGenerator,
    pub registry: ActorRegistry,
    pub tick: u64,
    pub reactive_events: Vec<SimReactiveEvent>,
    /// Commands produced while applying another; applied right after it.
    pub follow_ups: Vec<SimCommand>,
}

impl ApplyCtx {
    fn actor_id(&self, entity: Entity) -> u64 {
        self.registry.actor_id(entity).unwrap_or(0)
    }

    /// Record an Event entry in the log for a command. Returns the event_id.
    pub(crate) fn record_event(&mut self, cmd: &SimCommand) -> u64 {
        let event_id = self.push_event(
            cmd.event_kind.clone(),
            cmd.description.clone(),
            cmd.caused_by,
            cmd.event_data.clone(),
        );
        for (entity, role) in &cmd.participants {
            self.add_participant(event_id, *entity, role.clone());
        }
        event_id
    }

    /// Record an event that follows from another one in the same pass.
    pub(crate) fn record_derived(
        &mut self,
        kind: EventKind,
        description: String,
        caused_by: u64,
        participants: &[(Entity, ParticipantRole)],
    ) -> u64 {
        let event_id = self.push_event(kind, description, Some(caused_by), serde_json::Value::Null);
        for (entity, role) in participants {
            self.add_participant(event_id, *entity, role.clone());
        }
        event_id
    }

    fn push_event(
        &mut self,
        kind: EventKind,
        description: String,
        caused_by: Option<u64>,
        data: serde_json::Value,
    ) -> u64 {
        let event_id = self.id_gen.0.next_id();
        self.event_log.events.push(EcsEvent {
            id: event_id,
            kind,
            tick: self.tick,
            description,
            caused_by,
            data,
        });
        event_id
    }

    /// Link an entity to an event.
    pub(crate) fn add_participant(&mut self, event_id: u64, entity: Entity, role: ParticipantRole) {
        if let Some(actor_id) = self.registry.actor_id(entity) {
            self.event_log.participants.push(EventParticipant {
                event_id,
                actor_id,
                role,
            });
        }
    }

    /// Record a state-change effect against an entity.
    pub(crate) fn record_effect(&mut self, event_id: u64, entity: Entity, change: StateChange) {
        let actor_id = self.actor_id(entity);
        self.event_log.effects.push(EventEffect {
            event_id,
            actor_id,
            effect: change,
        });
    }

    pub(crate) fn owner_effect(&self, old_owner: Entity, new_owner: Entity) -> StateChange {
        StateChange::OwnerChanged {
            old_owner: self.actor_id(old_owner),
            new_owner: self.actor_id(new_owner),
        }
    }

    /// Queue a reactive event for emission after all commands are processed.
    pub(crate) fn emit(&mut self, event: SimReactiveEvent) {
        self.reactive_events.push(event);
    }

    pub(crate) fn follow_up(&mut self, cmd: SimCommand) {
        self.follow_ups.push(cmd);
    }
}

/// Whether `entity` still exists and has not left the world.
pub(crate) fn is_in_world(world: &World, entity: Entity) -> bool {
    world
        .get::<SimActor>(entity)
        .is_some_and(SimActor::is_in_world)
}

pub(crate) fn actor_name(world: &World, entity: Entity) -> String {
    world
        .get::<SimActor>(entity)
        .map_or_else(|| format!("{entity:?}"), |a| a.name.clone())
}

/// Exclusive system that drains all pending `SimCommand` messages, applies
/// state changes, records audit trail, and emits `SimReactiveEvent` messages.
///
/// Commands are applied in the order they were written. Follow-up commands
/// (such as force-defeating the opponents of a winner) run immediately after
/// the command that produced them, ahead of the rest of the queue.
///
/// Runs in `SimPhase::PostUpdate`. Reaction systems that write commands chain
/// another run after themselves in `SimPhase::Reactions`.
pub fn apply_sim_commands(world: &mut World) {
    let mut queue: VecDeque<SimCommand> = {
        let Some(mut messages) = world.get_resource_mut::<Messages<SimCommand>>() else {
            return;
        };
        messages.drain().collect()
    };

    if queue.is_empty() {
        return;
    }

    let tick = world.resource::<MatchClock>().world_tick;
    let event_log = world.remove_resource::<EventLog>().unwrap_or_default();
    let id_gen = world.remove_resource::<EcsIdGenerator>().unwrap_or_default();
    let registry = world.remove_resource::<ActorRegistry>().unwrap_or_default();

    let mut ctx = ApplyCtx {
        event_log,
        id_gen,
        registry,
        tick,
        reactive_events: Vec::new(),
        follow_ups: Vec::new(),
    };

    while let Some(cmd) = queue.pop_front() {
        match &cmd.kind {
            // Capture
            SimCommandKind::TransferOwnership { region, captor } => {
                apply_capture::apply_transfer_ownership(&mut ctx, world, &cmd, *region, *captor);
            }
            SimCommandKind::ChangeOwner { actor, new_owner } => {
                apply_capture::apply_change_owner(&mut ctx, world, &cmd, *actor, *new_owner);
            }

            // Objectives
            SimCommandKind::MarkObjectiveCompleted { player, objective } => {
                apply_objectives::apply_mark_objective(
                    &mut ctx, world, &cmd, *player, *objective, true,
                );
            }
            SimCommandKind::MarkObjectiveFailed { player, objective } => {
                apply_objectives::apply_mark_objective(
                    &mut ctx, world, &cmd, *player, *objective, false,
                );
            }
            SimCommandKind::ForceDefeat { player } => {
                apply_objectives::apply_force_defeat(&mut ctx, world, &cmd, *player);
            }

            // Experience
            SimCommandKind::GrantPlayerExperience { player, amount } => {
                apply_experience::apply_grant_player_experience(
                    &mut ctx, world, &cmd, *player, *amount,
                );
            }
            SimCommandKind::DonateExperience {
                deliverer,
                target,
                levels,
                player_experience,
            } => {
                apply_experience::apply_donate_experience(
                    &mut ctx,
                    world,
                    &cmd,
                    *deliverer,
                    *target,
                    *levels,
                    *player_experience,
                );
            }

            // Lifecycle
            SimCommandKind::RemoveFromWorld { actor } => {
                apply_lifecycle::apply_remove_from_world(&mut ctx, world, &cmd, *actor);
            }
            SimCommandKind::ExpireTimeLimit => {
                apply_lifecycle::apply_expire_time_limit(&mut ctx, &cmd);
            }
        }

        for follow_up in ctx.follow_ups.drain(..).rev() {
            queue.push_front(follow_up);
        }
    }

    let reactive_events = std::mem::take(&mut ctx.reactive_events);
    if let Some(mut messages) = world.get_resource_mut::<Messages<SimReactiveEvent>>() {
        messages.write_batch(reactive_events);
    }

    world.insert_resource(ctx.event_log);
    world.insert_resource(ctx.id_gen);
    world.insert_resource(ctx.registry);
}
