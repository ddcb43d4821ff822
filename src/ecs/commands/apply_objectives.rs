use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::ecs::components::{DominationVictoryConditions, MissionObjectives, WinStatus};
use crate::ecs::events::SimReactiveEvent;
use crate::model::effect::StateChange;
use crate::model::event::{EventKind, ParticipantRole};
use crate::model::{ObjectiveState, WinState};

use super::applicator::{ApplyCtx, actor_name};
use super::{SimCommand, SimCommandKind};

/// Complete or fail one objective. Objectives that already left the
/// incomplete state are left alone and nothing is recorded.
pub(crate) fn apply_mark_objective(
    ctx: &mut ApplyCtx,
    world: &mut World,
    cmd: &SimCommand,
    player: Entity,
    objective: usize,
    completed: bool,
) {
    let (changed, outcome) = {
        let Some(mut objectives) = world.get_mut::<MissionObjectives>(player) else {
            tracing::warn!(?player, "objective update for a player without objectives");
            return;
        };
        let changed = if completed {
            objectives.mark_completed(objective)
        } else {
            objectives.mark_failed(objective)
        };
        (changed, objectives.evaluate())
    };
    if !changed {
        return;
    }

    let event_id = ctx.record_event(cmd);
    let state = if completed {
        ObjectiveState::Completed
    } else {
        ObjectiveState::Failed
    };
    ctx.record_effect(
        event_id,
        player,
        StateChange::ObjectiveChanged { objective, state },
    );
    tracing::info!(?player, objective, %state, "objective updated");

    if completed {
        ctx.emit(SimReactiveEvent::ObjectiveCompleted {
            event_id,
            player,
            objective,
        });
    } else {
        ctx.emit(SimReactiveEvent::ObjectiveFailed {
            event_id,
            player,
            objective,
        });
    }

    if outcome != WinState::Undefined {
        settle_win_state(ctx, world, event_id, player, outcome);
    }
}

/// Fail every incomplete objective and mark the player lost.
pub(crate) fn apply_force_defeat(
    ctx: &mut ApplyCtx,
    world: &mut World,
    cmd: &SimCommand,
    player: Entity,
) {
    let undecided = world
        .get::<WinStatus>(player)
        .is_some_and(|s| s.0 == WinState::Undefined);
    let failed = world
        .get_mut::<MissionObjectives>(player)
        .map(|mut o| o.force_defeat())
        .unwrap_or_default();

    if failed.is_empty() && !undecided {
        return;
    }

    let event_id = ctx.record_event(cmd);
    for objective in failed {
        ctx.record_effect(
            event_id,
            player,
            StateChange::ObjectiveChanged {
                objective,
                state: ObjectiveState::Failed,
            },
        );
        ctx.emit(SimReactiveEvent::ObjectiveFailed {
            event_id,
            player,
            objective,
        });
    }
    settle_win_state(ctx, world, event_id, player, WinState::Lost);
}

/// Move a player out of `Undefined`. Terminal states never change again.
///
/// A winner with an enabled domination condition force-defeats its opponents
/// in the same pass.
fn settle_win_state(
    ctx: &mut ApplyCtx,
    world: &mut World,
    caused_by: u64,
    player: Entity,
    outcome: WinState,
) {
    {
        let Some(mut status) = world.get_mut::<WinStatus>(player) else {
            return;
        };
        if status.0 != WinState::Undefined {
            return;
        }
        status.0 = outcome;
    }

    let name = actor_name(world, player);
    let (kind, description) = match outcome {
        WinState::Won => (EventKind::PlayerWon, format!("{name} is victorious")),
        _ => (EventKind::PlayerLost, format!("{name} is defeated")),
    };
    let event_id = ctx.record_derived(
        kind,
        description,
        caused_by,
        &[(player, ParticipantRole::Player)],
    );
    ctx.record_effect(event_id, player, StateChange::WinStateChanged { state: outcome });
    tracing::info!(?player, %outcome, "win state settled");

    if outcome == WinState::Won {
        ctx.emit(SimReactiveEvent::PlayerWon { event_id, player });

        let opponents: Vec<Entity> = world
            .get::<DominationVictoryConditions>(player)
            .filter(|dvc| dvc.is_enabled())
            .map(|dvc| dvc.opponents().to_vec())
            .unwrap_or_default();
        for opponent in opponents {
            let opponent_name = actor_name(world, opponent);
            ctx.follow_up(
                SimCommand::new(
                    SimCommandKind::ForceDefeat { player: opponent },
                    EventKind::ObjectiveFailed,
                    format!("{opponent_name} defeated by {name}"),
                )
                .caused_by(event_id)
                .with_participant(opponent, ParticipantRole::Player),
            );
        }
    } else {
        ctx.emit(SimReactiveEvent::PlayerLost { event_id, player });
    }
}
