//! Domination victory: score accumulation, objective evaluation, the time
//! limit tie-break and end-of-match reactions.
//!
//! Scores are awarded straight into each player's [`PlayerExperience`] ledger
//! in a first pass so every award of a tick lands before any team total is
//! read in the second pass. Objective changes go through the command queue.

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::{MessageReader, MessageWriter};
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, Res, ResMut};

use crate::ecs::clock::MatchClock;
use crate::ecs::commands::{SimCommand, SimCommandKind, apply_sim_commands};
use crate::ecs::components::{
    DominationVictoryConditions, MissionObjectives, MustBeDestroyed, Owner, OwnerLostAction,
    PlayerCore, PlayerExperience, SimActor, StrategicPoint, WinStatus,
};
use crate::ecs::conditions::{is_interval_tick, time_limit_reached};
use crate::ecs::events::SimReactiveEvent;
use crate::ecs::relationships::Diplomacy;
use crate::ecs::resources::{Feedback, FeedbackOutbox, LocalPlayer, TeamScores, TimeLimit};
use crate::ecs::schedule::{DomainSet, SimPhase, SimTick};
use crate::model::event::{EventKind, ParticipantRole};
use crate::model::{ObjectiveType, WinState};

const SYSTEM_LINE_PREFIX: &str = "Battlefield Control";

pub struct DominationPlugin;

impl Plugin for DominationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            SimTick,
            accumulate_domination_score.in_set(DomainSet::Scoring),
        );
        app.add_systems(
            SimTick,
            resolve_time_limit
                .run_if(time_limit_reached)
                .in_set(DomainSet::Victory),
        );
        app.add_systems(
            SimTick,
            (handle_win_state_changes, apply_sim_commands)
                .chain()
                .in_set(SimPhase::Reactions),
        );
    }
}

type PlayerState = (
    Entity,
    &'static SimActor,
    &'static PlayerCore,
    &'static WinStatus,
    &'static mut MissionObjectives,
    &'static mut PlayerExperience,
    Option<&'static mut DominationVictoryConditions>,
);

struct RosterEntry {
    id: u64,
    entity: Entity,
    combatant: bool,
}

fn objective_command(
    player: Entity,
    name: &str,
    objective: usize,
    completed: bool,
    reason: &str,
) -> SimCommand {
    let (kind, event_kind, verb) = if completed {
        (
            SimCommandKind::MarkObjectiveCompleted { player, objective },
            EventKind::ObjectiveCompleted,
            "completed",
        )
    } else {
        (
            SimCommandKind::MarkObjectiveFailed { player, objective },
            EventKind::ObjectiveFailed,
            "failed",
        )
    };
    SimCommand::new(
        kind,
        event_kind,
        format!("{name} {verb} the domination objective: {reason}"),
    )
    .with_participant(player, ParticipantRole::Player)
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

fn accumulate_domination_score(
    clock: Res<MatchClock>,
    diplomacy: Res<Diplomacy>,
    mut players: Query<PlayerState>,
    points: Query<(&SimActor, &Owner), With<StrategicPoint>>,
    required: Query<(&SimActor, &Owner, &MustBeDestroyed)>,
    mut scores: ResMut<TeamScores>,
    mut commands: MessageWriter<SimCommand>,
) {
    let tick = clock.world_tick;

    let mut roster: Vec<RosterEntry> = players
        .iter()
        .map(|(entity, actor, core, ..)| RosterEntry {
            id: actor.id,
            entity,
            combatant: !core.non_combatant,
        })
        .collect();
    roster.sort_by_key(|entry| entry.id);
    let combatants: Vec<Entity> = roster
        .iter()
        .filter(|entry| entry.combatant)
        .map(|entry| entry.entity)
        .collect();

    // Pass 1: activate, cache rosters, award points.
    let mut active = Vec::new();
    for entry in &roster {
        let Ok((entity, _, core, status, mut objectives, mut experience, Some(mut dvc))) =
            players.get_mut(entry.entity)
        else {
            continue;
        };
        if !dvc.is_enabled() || status.0 != WinState::Undefined || core.non_combatant {
            continue;
        }

        if dvc.objective_id.is_none() {
            let text = dvc.info.objective_text(dvc.score_limit);
            dvc.objective_id = Some(objectives.add(text, ObjectiveType::Primary));
        }
        if dvc.allies.is_none() {
            let (allies, opponents): (Vec<Entity>, Vec<Entity>) = combatants
                .iter()
                .copied()
                .partition(|&other| diplomacy.is_allied_with(other, entity));
            dvc.allies = Some(allies);
            dvc.opponents = Some(opponents);
        }

        if is_interval_tick(tick, dvc.info.score_interval) {
            let controlled = points
                .iter()
                .filter(|(actor, owner)| owner.0 == entity && actor.is_in_world())
                .count() as i64;
            experience.give(controlled * dvc.info.points_per_capture);
        }
        active.push(entity);
    }

    // Pass 2: evaluate against the updated ledgers.
    for entity in active {
        let Ok((_, actor, _, _, _, _, Some(dvc))) = players.get(entity) else {
            continue;
        };
        let Some(objective) = dvc.objective_id else {
            continue;
        };
        let name = actor.name.clone();
        let allies = dvc.allies().to_vec();
        let opponents = dvc.opponents().to_vec();
        let score_limit = dvc.score_limit;
        let short_game = dvc.short_game;
        let scoring = is_interval_tick(tick, dvc.info.score_interval);

        if scoring {
            let team_total: i64 = allies
                .iter()
                .filter_map(|&ally| players.get(ally).ok())
                .map(|(.., experience, _)| experience.experience)
                .sum();
            scores.totals.insert(entity, team_total);
            scores.tick = tick;
            if team_total >= score_limit {
                commands.write(objective_command(
                    entity,
                    &name,
                    objective,
                    true,
                    "score limit reached",
                ));
            }
        }

        let has_required_units = required.iter().any(|(actor, owner, must)| {
            owner.0 == entity && actor.is_in_world() && (!short_game || must.required_for_short_game)
        });
        if !has_required_units {
            commands.write(objective_command(
                entity,
                &name,
                objective,
                false,
                "no required units left",
            ));
        }

        if opponents.is_empty() {
            continue;
        }
        let state_of = |player: Entity| {
            players
                .get(player)
                .map_or(WinState::Undefined, |(_, _, _, status, ..)| status.0)
        };
        if opponents.iter().any(|&o| state_of(o) == WinState::Won) {
            commands.write(objective_command(
                entity,
                &name,
                objective,
                false,
                "an opponent won",
            ));
        } else if opponents.iter().all(|&o| state_of(o) == WinState::Lost) {
            commands.write(objective_command(
                entity,
                &name,
                objective,
                true,
                "every opponent was defeated",
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// Time limit
// ---------------------------------------------------------------------------

/// One player's individual result at time-limit expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing {
    pub player: Entity,
    pub team: u32,
    pub score: i64,
}

/// A team's members in individual rank order, with the team total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamStanding {
    pub team: u32,
    pub total: i64,
    pub members: Vec<Standing>,
}

/// Rank individuals by score, group them by team in order of first
/// appearance, then rank the groups by total. Both sorts are stable, so ties
/// keep enumeration order.
pub fn rank_standings(standings: &[Standing]) -> Vec<TeamStanding> {
    let mut individuals = standings.to_vec();
    individuals.sort_by(|a, b| b.score.cmp(&a.score));

    let mut teams: Vec<TeamStanding> = Vec::new();
    for standing in individuals {
        match teams.iter_mut().find(|t| t.team == standing.team) {
            Some(team) => {
                team.total += standing.score;
                team.members.push(standing);
            }
            None => teams.push(TeamStanding {
                team: standing.team,
                total: standing.score,
                members: vec![standing],
            }),
        }
    }
    teams.sort_by(|a, b| b.total.cmp(&a.total));
    teams
}

/// The top team wins. Team 0 means "no team", so there only the top
/// individual of the group wins.
pub fn wins_on_time_limit(ranked: &[TeamStanding], player: Entity, team: u32) -> bool {
    let Some(top) = ranked.first() else {
        return false;
    };
    top.team == team && (team != 0 || top.members.first().is_some_and(|s| s.player == player))
}

fn resolve_time_limit(
    clock: Res<MatchClock>,
    mut limit: ResMut<TimeLimit>,
    players: Query<(
        Entity,
        &SimActor,
        &PlayerCore,
        &PlayerExperience,
        Option<&DominationVictoryConditions>,
    )>,
    mut commands: MessageWriter<SimCommand>,
) {
    limit.expired = true;
    commands.write(SimCommand::new(
        SimCommandKind::ExpireTimeLimit,
        EventKind::TimeLimitExpired,
        format!("Time limit reached at tick {}", clock.world_tick),
    ));

    let mut roster: Vec<_> = players.iter().collect();
    roster.sort_by_key(|(_, actor, ..)| actor.id);

    let standings: Vec<Standing> = roster
        .iter()
        .filter(|(_, _, core, ..)| !core.non_combatant && core.playable)
        .map(|(entity, _, core, experience, _)| Standing {
            player: *entity,
            team: core.team,
            score: experience.experience,
        })
        .collect();
    let ranked = rank_standings(&standings);

    for (entity, actor, core, _, dvc) in &roster {
        let Some(objective) = dvc.and_then(|d| d.objective_id()) else {
            continue;
        };
        let won = wins_on_time_limit(&ranked, *entity, core.team);
        let reason = if won {
            "top score at the time limit"
        } else {
            "outscored at the time limit"
        };
        commands.write(objective_command(*entity, &actor.name, objective, won, reason));
    }
}

// ---------------------------------------------------------------------------
// End-of-match reactions
// ---------------------------------------------------------------------------

fn handle_win_state_changes(
    mut events: MessageReader<SimReactiveEvent>,
    players: Query<(&PlayerCore, &MissionObjectives, &DominationVictoryConditions)>,
    actors: Query<(Entity, &SimActor, &Owner, &OwnerLostAction)>,
    local: Res<LocalPlayer>,
    mut outbox: ResMut<FeedbackOutbox>,
    mut commands: MessageWriter<SimCommand>,
) {
    for event in events.read() {
        let Some((player, state)) = event.win_state() else {
            continue;
        };
        let Ok((core, objectives, dvc)) = players.get(player) else {
            continue;
        };
        if !dvc.is_enabled() {
            continue;
        }

        if state == WinState::Lost {
            let mut owned: Vec<_> = actors
                .iter()
                .filter(|(_, actor, owner, _)| owner.0 == player && actor.is_in_world())
                .collect();
            owned.sort_by_key(|(_, actor, ..)| actor.id);
            for (entity, actor, _, action) in owned {
                let command = match *action {
                    OwnerLostAction::ChangeOwner(new_owner) => SimCommand::new(
                        SimCommandKind::ChangeOwner {
                            actor: entity,
                            new_owner,
                        },
                        EventKind::OwnerChanged,
                        format!("{} changed hands after {} lost", actor.name, core.name),
                    ),
                    OwnerLostAction::RemoveFromWorld => SimCommand::new(
                        SimCommandKind::RemoveFromWorld { actor: entity },
                        EventKind::RemovedFromWorld,
                        format!("{} removed after {} lost", actor.name, core.name),
                    ),
                };
                commands.write(command.with_participant(entity, ParticipantRole::Subject));
            }
        }

        if dvc.info.suppress_notifications {
            continue;
        }

        let (text, notification) = match state {
            WinState::Won => (
                format!("{} is victorious.", core.name),
                &objectives.info.win_notification,
            ),
            _ => (
                format!("{} is defeated.", core.name),
                &objectives.info.lose_notification,
            ),
        };
        outbox.push(Feedback::SystemLine {
            prefix: SYSTEM_LINE_PREFIX.to_string(),
            text,
        });
        if local.0 == Some(player)
            && let Some(notification) = notification
        {
            outbox.push(Feedback::DelayedNotification {
                delay_ms: dvc.info.notification_delay,
                notification: notification.clone(),
                faction: core.faction.clone(),
            });
        }
    }
}
