//! Reference spatial index.
//!
//! Hosts with their own actor map can skip [`update_actor_map`] and write
//! [`OccupancyEvent`] messages themselves; the capture systems only depend on
//! the messages and on the trigger bookkeeping in [`ActorMap`].

use std::collections::{BTreeMap, BTreeSet};

use bevy_ecs::entity::Entity;
use bevy_ecs::message::{Message, MessageWriter};
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Query, ResMut};

use crate::ecs::components::{CenterPosition, SimActor};
use crate::model::{CPos, WDist, WPos};

/// Opaque token for a registered trigger.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriggerHandle(u64);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OccupancyChange {
    Entered,
    Left,
}

/// An actor crossed the boundary of a trigger zone.
#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub struct OccupancyEvent {
    pub trigger: TriggerHandle,
    /// The entity that registered the trigger.
    pub region: Entity,
    pub actor: Entity,
    pub change: OccupancyChange,
}

#[derive(Debug, Clone)]
enum TriggerShape {
    Proximity { center: WPos, range: WDist },
    Cells(BTreeSet<CPos>),
}

impl TriggerShape {
    fn contains(&self, pos: WPos) -> bool {
        match self {
            TriggerShape::Proximity { center, range } => range.covers(*center, pos),
            TriggerShape::Cells(cells) => cells.contains(&pos.to_cell()),
        }
    }
}

#[derive(Debug, Clone)]
struct Trigger {
    region: Entity,
    shape: TriggerShape,
    occupants: Vec<Entity>,
}

/// Trigger registry diffed against actor positions once per tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActorMap {
    triggers: BTreeMap<TriggerHandle, Trigger>,
    next_handle: u64,
}

impl ActorMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, region: Entity, shape: TriggerShape) -> TriggerHandle {
        self.next_handle += 1;
        let handle = TriggerHandle(self.next_handle);
        self.triggers.insert(
            handle,
            Trigger {
                region,
                shape,
                occupants: Vec::new(),
            },
        );
        handle
    }

    pub fn add_proximity_trigger(&mut self, region: Entity, center: WPos, range: WDist) -> TriggerHandle {
        self.insert(region, TriggerShape::Proximity { center, range })
    }

    pub fn add_cell_trigger(&mut self, region: Entity, cells: &[CPos]) -> TriggerHandle {
        self.insert(region, TriggerShape::Cells(cells.iter().copied().collect()))
    }

    /// Move a proximity trigger. Occupants are re-evaluated on the next refresh.
    pub fn update_proximity_trigger(&mut self, handle: TriggerHandle, center: WPos, range: WDist) {
        match self.triggers.get_mut(&handle) {
            Some(trigger) => trigger.shape = TriggerShape::Proximity { center, range },
            None => tracing::warn!(?handle, "update of unknown proximity trigger"),
        }
    }

    /// Drop a trigger. No leave events are emitted for its occupants.
    pub fn remove_trigger(&mut self, handle: TriggerHandle) -> bool {
        self.triggers.remove(&handle).is_some()
    }

    pub fn contains(&self, handle: TriggerHandle) -> bool {
        self.triggers.contains_key(&handle)
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    pub fn occupants(&self, handle: TriggerHandle) -> &[Entity] {
        self.triggers
            .get(&handle)
            .map_or(&[], |t| t.occupants.as_slice())
    }

    /// Diff every trigger against `actors` (in-world actors and their positions).
    ///
    /// Per trigger, in handle order: `Left` events in previous-occupant order,
    /// then `Entered` events in the order of `actors`. Actors missing from
    /// `actors` leave every trigger.
    pub fn refresh(&mut self, actors: &[(Entity, WPos)], out: &mut Vec<OccupancyEvent>) {
        for (&handle, trigger) in self.triggers.iter_mut() {
            let inside: Vec<Entity> = actors
                .iter()
                .filter(|(_, pos)| trigger.shape.contains(*pos))
                .map(|(entity, _)| *entity)
                .collect();
            let inside_set: BTreeSet<Entity> = inside.iter().copied().collect();

            let mut retained = Vec::with_capacity(trigger.occupants.len());
            for &occupant in &trigger.occupants {
                if inside_set.contains(&occupant) {
                    retained.push(occupant);
                } else {
                    out.push(OccupancyEvent {
                        trigger: handle,
                        region: trigger.region,
                        actor: occupant,
                        change: OccupancyChange::Left,
                    });
                }
            }

            for entity in inside {
                if !retained.contains(&entity) {
                    retained.push(entity);
                    out.push(OccupancyEvent {
                        trigger: handle,
                        region: trigger.region,
                        actor: entity,
                        change: OccupancyChange::Entered,
                    });
                }
            }

            trigger.occupants = retained;
        }
    }
}

/// Refresh the actor map from current positions and publish the resulting events.
pub fn update_actor_map(
    mut map: ResMut<ActorMap>,
    actors: Query<(Entity, &SimActor, &CenterPosition)>,
    mut writer: MessageWriter<OccupancyEvent>,
) {
    if map.trigger_count() == 0 {
        return;
    }

    // Actor ids follow spawn order; `Entity` ordering does not.
    let mut in_world: Vec<_> = actors
        .iter()
        .filter(|(_, actor, _)| actor.is_in_world())
        .collect();
    in_world.sort_by_key(|(_, actor, _)| actor.id);
    let positions: Vec<(Entity, WPos)> = in_world
        .into_iter()
        .map(|(entity, _, pos)| (entity, pos.0))
        .collect();

    let mut events = Vec::new();
    map.refresh(&positions, &mut events);
    for event in events {
        writer.write(event);
    }
}
