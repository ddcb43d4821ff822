//! Proximity capture systems.
//!
//! Three systems per tick:
//! 1. `sync_capture_triggers` (Triggers): registers a trigger when a region
//!    enters the world, drops it when the region leaves, and moves range
//!    triggers whose anchor moved
//! 2. `track_occupancy` (Capture): applies occupancy events to the occupant
//!    sets and runs the ownership policy after every accepted change
//! 3. `finish_ownership_transfers` (Last): re-enables occupancy tracking after
//!    a transfer and releases permanently captured regions

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::{MessageReader, MessageWriter};
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, Res, ResMut};

use crate::config::ProximityCapturableKind;
use crate::ecs::commands::{SimCommand, SimCommandKind};
use crate::ecs::components::{
    CenterPosition, Owner, OwnershipDecision, PlayerCore, ProximityCaptor, ProximityCapturable,
    SimActor,
};
use crate::ecs::relationships::Diplomacy;
use crate::ecs::schedule::{DomainSet, SimPhase, SimTick};
use crate::ecs::spatial::{ActorMap, OccupancyChange, OccupancyEvent, update_actor_map};
use crate::model::event::{EventKind, ParticipantRole};
use crate::model::expand_footprint;

pub struct CapturePlugin;

impl Plugin for CapturePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            SimTick,
            (sync_capture_triggers, update_actor_map)
                .chain()
                .in_set(DomainSet::Triggers),
        );
        app.add_systems(SimTick, track_occupancy.in_set(DomainSet::Capture));
        app.add_systems(SimTick, finish_ownership_transfers.in_set(SimPhase::Last));
    }
}

// ---------------------------------------------------------------------------
// System 1: Trigger lifecycle
// ---------------------------------------------------------------------------

fn sync_capture_triggers(
    mut map: ResMut<ActorMap>,
    mut regions: Query<(Entity, &SimActor, &CenterPosition, &mut ProximityCapturable)>,
) {
    let mut order: Vec<(u64, Entity)> = regions
        .iter()
        .map(|(entity, actor, _, _)| (actor.id, entity))
        .collect();
    order.sort();

    for (_, entity) in order {
        let Ok((entity, actor, position, mut capturable)) = regions.get_mut(entity) else {
            continue;
        };
        if capturable.released {
            continue;
        }
        let position = position.0;

        match (actor.is_in_world(), capturable.trigger) {
            (true, None) => {
                if capturable.skip_trigger_update {
                    continue;
                }
                let handle = match capturable.info.kind {
                    ProximityCapturableKind::Range => {
                        map.add_proximity_trigger(entity, position, capturable.info.range)
                    }
                    ProximityCapturableKind::Area => {
                        if capturable.area.is_empty() {
                            capturable.area = expand_footprint(&[position.to_cell()], true);
                        }
                        map.add_cell_trigger(entity, &capturable.area)
                    }
                };
                capturable.trigger = Some(handle);
                capturable.anchor_position = Some(position);
            }
            (true, Some(handle)) => {
                if capturable.info.kind == ProximityCapturableKind::Range
                    && capturable.anchor_position != Some(position)
                {
                    map.update_proximity_trigger(handle, position, capturable.info.range);
                    capturable.anchor_position = Some(position);
                }
            }
            (false, Some(handle)) => {
                if capturable.skip_trigger_update {
                    continue;
                }
                map.remove_trigger(handle);
                capturable.trigger = None;
                capturable.clear_occupants();
            }
            (false, None) => {}
        }
    }
}

// ---------------------------------------------------------------------------
// System 2: Occupancy and ownership policy
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn track_occupancy(
    mut events: MessageReader<OccupancyEvent>,
    mut regions: Query<(&SimActor, &Owner, &mut ProximityCapturable)>,
    captors: Query<&ProximityCaptor>,
    owners: Query<&Owner>,
    players: Query<(), With<PlayerCore>>,
    names: Query<&SimActor>,
    diplomacy: Res<Diplomacy>,
    mut map: ResMut<ActorMap>,
    mut commands: MessageWriter<SimCommand>,
) {
    let owner_of = |entity: Entity| -> Entity {
        if players.contains(entity) {
            return entity;
        }
        owners.get(entity).map_or(entity, |o| o.0)
    };
    let name_of = |entity: Entity| -> String {
        names
            .get(entity)
            .map_or_else(|_| format!("{entity:?}"), |a| a.name.clone())
    };

    for event in events.read() {
        let Ok((region_actor, owner, mut capturable)) = regions.get_mut(event.region) else {
            continue;
        };
        if capturable.ignores_occupancy() || capturable.trigger != Some(event.trigger) {
            continue;
        }

        let changed = match event.change {
            OccupancyChange::Entered => {
                let eligible = event.actor != event.region
                    && captors
                        .get(event.actor)
                        .is_ok_and(|c| c.types.overlaps(&capturable.info.captor_types));
                eligible && capturable.add_occupant(event.actor)
            }
            // Honoured even if the actor lost its captor: it may be gone already.
            OccupancyChange::Left => capturable.remove_occupant(event.actor),
        };
        if !changed {
            continue;
        }

        let decision = capturable.decide_ownership(owner.0, &owner_of, |a, b| {
            diplomacy.are_mutual_allies(a, b)
        });

        match decision {
            OwnershipDecision::Unchanged => {}
            OwnershipDecision::ReleasePermanently => {
                if let Some(handle) = capturable.trigger.take() {
                    map.remove_trigger(handle);
                }
                capturable.released = true;
                capturable.clear_occupants();
                tracing::debug!(region = region_actor.id, "permanently captured, trigger released");
            }
            OwnershipDecision::TransferTo { captor } => {
                commands.write(
                    SimCommand::new(
                        SimCommandKind::TransferOwnership {
                            region: event.region,
                            captor,
                        },
                        EventKind::Capture,
                        format!("{} captured by {}", region_actor.name, name_of(captor)),
                    )
                    .with_participant(event.region, ParticipantRole::Subject)
                    .with_participant(captor, ParticipantRole::Captor),
                );
            }
            OwnershipDecision::RevertToOriginal => {
                let original = capturable.original_owner;
                commands.write(
                    SimCommand::new(
                        SimCommandKind::TransferOwnership {
                            region: event.region,
                            captor: original,
                        },
                        EventKind::Capture,
                        format!("{} reverted to {}", region_actor.name, name_of(original)),
                    )
                    .with_participant(event.region, ParticipantRole::Subject)
                    .with_participant(original, ParticipantRole::Captor),
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// System 3: End-of-tick bookkeeping
// ---------------------------------------------------------------------------

fn finish_ownership_transfers(
    mut map: ResMut<ActorMap>,
    mut regions: Query<(&Owner, &mut ProximityCapturable)>,
) {
    for (owner, mut capturable) in &mut regions {
        if capturable.released {
            continue;
        }
        if capturable.skip_trigger_update {
            capturable.skip_trigger_update = false;
        }
        if capturable.info.permanent && capturable.is_captured(owner.0) {
            if let Some(handle) = capturable.trigger.take() {
                map.remove_trigger(handle);
            }
            capturable.released = true;
            capturable.clear_occupants();
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy_app::App;
    use bevy_ecs::entity::Entity;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::config::ProximityCapturableInfo;
    use crate::ecs::app::build_sim_app;
    use crate::ecs::components::{CenterPosition, PlayerCore};
    use crate::ecs::events::SimReactiveEvent;
    use crate::ecs::resources::EventLog;
    use crate::ecs::spawn;
    use crate::ecs::test_helpers::{tick, tick_n};
    use crate::model::{CPos, CaptureTypes, WDist, WPos};

    struct Match {
        app: App,
        neutral: Entity,
        red: Entity,
        blue: Entity,
    }

    fn player(app: &mut App, name: &str, team: u32) -> Entity {
        spawn::spawn_player(
            app.world_mut(),
            PlayerCore {
                name: name.to_string(),
                faction: "allies".into(),
                team,
                non_combatant: false,
                playable: true,
            },
            Some(ProximityCaptor {
                types: CaptureTypes::new(["Player"]),
            }),
            Default::default(),
        )
    }

    fn setup() -> Match {
        let mut app = build_sim_app();
        app.add_plugins(CapturePlugin);
        let neutral = player(&mut app, "Neutral", 0);
        let red = player(&mut app, "Red", 0);
        let blue = player(&mut app, "Blue", 0);
        Match {
            app,
            neutral,
            red,
            blue,
        }
    }

    const FAR: WPos = WPos::new(100 * 1024, 100 * 1024);

    fn flag_at(m: &mut Match, info: ProximityCapturableInfo) -> Entity {
        spawn::spawn_capturable(
            m.app.world_mut(),
            "flag",
            m.neutral,
            CPos::new(10, 10).center(),
            info,
            None,
        )
    }

    impl Match {
        fn infantry(&mut self, owner: Entity, position: WPos) -> Entity {
            spawn::spawn_captor(
                self.app.world_mut(),
                "rifleman",
                owner,
                position,
                CaptureTypes::new(["Infantry"]),
            )
        }
    }

    fn owner(m: &Match, region: Entity) -> Entity {
        m.app.world().get::<Owner>(region).unwrap().0
    }

    fn move_to(m: &mut Match, actor: Entity, position: WPos) {
        m.app.world_mut().get_mut::<CenterPosition>(actor).unwrap().0 = position;
    }

    fn near_flag(cells: i32) -> WPos {
        CPos::new(10, 10).center().offset_cells(cells, 0)
    }

    #[test]
    fn trigger_registered_once_region_is_in_world() {
        let mut m = setup();
        let flag = flag_at(&mut m, ProximityCapturableInfo::default());
        tick(&mut m.app);
        assert_eq!(m.app.world().resource::<ActorMap>().trigger_count(), 1);
        let capturable = m.app.world().get::<ProximityCapturable>(flag).unwrap();
        assert!(capturable.trigger().is_some());
    }

    #[test]
    fn area_region_defaults_to_neighbouring_cells() {
        let mut m = setup();
        let info = ProximityCapturableInfo {
            kind: ProximityCapturableKind::Area,
            ..Default::default()
        };
        let flag = flag_at(&mut m, info);
        let unit = m.infantry(m.red, CPos::new(11, 11).center());
        tick(&mut m.app);
        assert_eq!(
            m.app.world().get::<ProximityCapturable>(flag).unwrap().area.len(),
            9
        );
        assert_eq!(owner(&m, flag), m.red);

        move_to(&mut m, unit, CPos::new(12, 11).center());
        tick(&mut m.app);
        assert_eq!(owner(&m, flag), m.neutral);
    }

    #[test]
    fn entering_captures_and_leaving_reverts() {
        let mut m = setup();
        let flag = flag_at(&mut m, ProximityCapturableInfo::default());
        let unit = m.infantry(m.red, FAR);
        tick(&mut m.app);
        assert_eq!(owner(&m, flag), m.neutral);

        move_to(&mut m, unit, near_flag(2));
        tick(&mut m.app);
        assert_eq!(owner(&m, flag), m.red);

        move_to(&mut m, unit, FAR);
        tick(&mut m.app);
        assert_eq!(owner(&m, flag), m.neutral);

        let log = m.app.world().resource::<EventLog>();
        assert_eq!(log.events_of_kind(&EventKind::Capture).count(), 2);
    }

    #[test]
    fn sticky_region_keeps_captor_after_leaving() {
        let mut m = setup();
        let flag = flag_at(
            &mut m,
            ProximityCapturableInfo {
                sticky: true,
                ..Default::default()
            },
        );
        let unit = m.infantry(m.red, near_flag(1));
        tick(&mut m.app);
        assert_eq!(owner(&m, flag), m.red);
        move_to(&mut m, unit, FAR);
        tick_n(&mut m.app, 3);
        assert_eq!(owner(&m, flag), m.red);
    }

    #[test]
    fn earliest_arrival_beats_closer_later_arrival() {
        let mut m = setup();
        let flag = flag_at(&mut m, ProximityCapturableInfo::default());
        let _red_unit = m.infantry(m.red, near_flag(4));
        tick(&mut m.app);
        assert_eq!(owner(&m, flag), m.red);

        let _blue_unit = m.infantry(m.blue, near_flag(0));
        tick_n(&mut m.app, 2);
        assert_eq!(owner(&m, flag), m.red);
    }

    #[test]
    fn ineligible_actors_are_ignored() {
        let mut m = setup();
        let flag = flag_at(&mut m, ProximityCapturableInfo::default());
        spawn::spawn_captor(
            m.app.world_mut(),
            "aircraft",
            m.red,
            near_flag(1),
            CaptureTypes::new(["Aircraft"]),
        );
        spawn::spawn_actor(m.app.world_mut(), "crate", m.red, near_flag(1));
        tick_n(&mut m.app, 2);
        assert_eq!(owner(&m, flag), m.neutral);
        assert!(
            m.app
                .world()
                .get::<ProximityCapturable>(flag)
                .unwrap()
                .occupants()
                .is_empty()
        );
    }

    #[test]
    fn permanent_capture_is_final() {
        let mut m = setup();
        let flag = flag_at(
            &mut m,
            ProximityCapturableInfo {
                permanent: true,
                ..Default::default()
            },
        );
        let red_unit = m.infantry(m.red, near_flag(1));
        tick(&mut m.app);
        assert_eq!(owner(&m, flag), m.red);
        assert!(m.app.world().get::<ProximityCapturable>(flag).unwrap().is_released());
        assert_eq!(m.app.world().resource::<ActorMap>().trigger_count(), 0);

        move_to(&mut m, red_unit, FAR);
        m.infantry(m.blue, near_flag(0));
        tick_n(&mut m.app, 3);
        assert_eq!(owner(&m, flag), m.red);
    }

    #[test]
    fn must_be_clear_reverts_when_contested_and_recaptures_when_clear() {
        let mut m = setup();
        let flag = flag_at(
            &mut m,
            ProximityCapturableInfo {
                must_be_clear: true,
                ..Default::default()
            },
        );
        let _red_unit = m.infantry(m.red, near_flag(1));
        tick(&mut m.app);
        assert_eq!(owner(&m, flag), m.red);

        let blue_unit = m.infantry(m.blue, FAR);
        move_to(&mut m, blue_unit, near_flag(2));
        tick(&mut m.app);
        assert_eq!(owner(&m, flag), m.neutral);

        move_to(&mut m, blue_unit, FAR);
        tick(&mut m.app);
        assert_eq!(owner(&m, flag), m.red);
    }

    #[test]
    fn mutual_allies_do_not_contest() {
        let mut m = setup();
        m.app
            .world_mut()
            .resource_mut::<Diplomacy>()
            .set_mutual_allies(m.red, m.blue);
        let flag = flag_at(
            &mut m,
            ProximityCapturableInfo {
                must_be_clear: true,
                ..Default::default()
            },
        );
        m.infantry(m.red, near_flag(1));
        m.infantry(m.blue, near_flag(1));
        tick(&mut m.app);
        assert_eq!(owner(&m, flag), m.red);
    }

    #[test]
    fn captured_event_carries_captor_types() {
        let mut m = setup();
        let flag = flag_at(&mut m, ProximityCapturableInfo::default());
        let unit = m.infantry(m.red, near_flag(1));
        tick(&mut m.app);

        let captured: Vec<SimReactiveEvent> = m
            .app
            .world_mut()
            .resource_mut::<bevy_ecs::message::Messages<SimReactiveEvent>>()
            .drain()
            .collect();
        let found = captured.iter().any(|e| {
            matches!(e, SimReactiveEvent::Captured { region, captor, old_owner, new_owner, captor_types, .. }
                if *region == flag && *captor == unit && *old_owner == m.neutral
                    && *new_owner == m.red && captor_types.contains("Infantry"))
        });
        assert!(found);
    }

    #[test]
    fn captor_removed_before_transfer_is_skipped() {
        let mut m = setup();
        let flag = flag_at(&mut m, ProximityCapturableInfo::default());
        let unit = m.infantry(m.red, near_flag(1));
        // Let the spatial index see the unit, then remove it before the
        // transfer written this tick is applied.
        m.app.add_systems(
            SimTick,
            (move |mut actors: Query<&mut SimActor>| {
                if let Ok(mut actor) = actors.get_mut(unit) {
                    actor.removed_at = Some(1);
                }
            })
            .after(DomainSet::Capture)
            .in_set(SimPhase::Update),
        );
        tick(&mut m.app);
        assert_eq!(owner(&m, flag), m.neutral);
    }

    #[test]
    fn removing_region_from_world_drops_trigger() {
        let mut m = setup();
        let flag = flag_at(&mut m, ProximityCapturableInfo::default());
        m.infantry(m.red, near_flag(1));
        tick(&mut m.app);
        m.app.world_mut().get_mut::<SimActor>(flag).unwrap().removed_at = Some(2);
        tick(&mut m.app);
        assert_eq!(m.app.world().resource::<ActorMap>().trigger_count(), 0);
        let capturable = m.app.world().get::<ProximityCapturable>(flag).unwrap();
        assert!(capturable.occupants().is_empty());
        assert!(capturable.trigger().is_none());
    }

    #[test]
    fn range_trigger_follows_moving_anchor() {
        let mut m = setup();
        let info = ProximityCapturableInfo {
            range: WDist::from_cells(2),
            ..Default::default()
        };
        let flag = flag_at(&mut m, info);
        m.infantry(m.red, FAR);
        tick(&mut m.app);
        assert_eq!(owner(&m, flag), m.neutral);

        move_to(&mut m, flag, FAR.offset_cells(1, 0));
        tick(&mut m.app);
        assert_eq!(owner(&m, flag), m.red);
    }

    #[test]
    fn random_walk_ownership_matches_first_occupant() {
        let mut m = setup();
        let flag = flag_at(&mut m, ProximityCapturableInfo::default());
        let mut units = Vec::new();
        for i in 0..6 {
            let side = if i % 2 == 0 { m.red } else { m.blue };
            units.push((m.infantry(side, FAR), side));
        }
        tick(&mut m.app);

        let mut rng = SmallRng::seed_from_u64(7);
        let mut inside: Vec<Entity> = Vec::new();
        for _ in 0..200 {
            let (unit, _) = units[rng.random_range(0..units.len())];
            if let Some(pos) = inside.iter().position(|&u| u == unit) {
                inside.remove(pos);
                move_to(&mut m, unit, FAR);
            } else {
                inside.push(unit);
                move_to(&mut m, unit, near_flag(1));
            }
            tick(&mut m.app);

            let capturable = m.app.world().get::<ProximityCapturable>(flag).unwrap();
            assert_eq!(capturable.occupants(), inside.as_slice());
            let expected = inside
                .first()
                .map(|first| units.iter().find(|(u, _)| u == first).unwrap().1)
                .unwrap_or(m.neutral);
            assert_eq!(owner(&m, flag), expected);
        }
    }
}
