//! Proximity capture state.
//!
//! A [`ProximityCapturable`] keeps the ordered set of eligible occupants of
//! its zone. After every change to that set, [`ProximityCapturable::decide_ownership`]
//! turns it into an [`OwnershipDecision`]; the systems in
//! `ecs::systems::capture` carry the decision out.

use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;

use crate::config::ProximityCapturableInfo;
use crate::ecs::spatial::TriggerHandle;
use crate::model::{CPos, CaptureTypes, WPos};

/// Lets an actor capture proximity capturables whose captor types overlap its own.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct ProximityCaptor {
    pub types: CaptureTypes,
}

/// What should happen to a region's ownership after its occupants changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipDecision {
    Unchanged,
    /// Captured and permanent: drop the trigger and stop tracking for good.
    ReleasePermanently,
    /// Hand the region to the owner of `captor`.
    TransferTo { captor: Entity },
    /// Hand the region back to its original owner.
    RevertToOriginal,
}

#[derive(Component, Debug, Clone)]
pub struct ProximityCapturable {
    pub info: ProximityCapturableInfo,
    pub original_owner: Entity,
    /// Cells watched by an area region. Unused for range regions.
    pub area: Vec<CPos>,
    occupants: Vec<Entity>,
    pub(crate) trigger: Option<TriggerHandle>,
    pub(crate) anchor_position: Option<WPos>,
    pub(crate) skip_trigger_update: bool,
    pub(crate) released: bool,
}

impl ProximityCapturable {
    pub fn new(info: ProximityCapturableInfo, original_owner: Entity, area: Vec<CPos>) -> Self {
        Self {
            info,
            original_owner,
            area,
            occupants: Vec::new(),
            trigger: None,
            anchor_position: None,
            skip_trigger_update: false,
            released: false,
        }
    }

    /// Occupants in arrival order.
    pub fn occupants(&self) -> &[Entity] {
        &self.occupants
    }

    /// Returns false if `entity` was already an occupant.
    pub fn add_occupant(&mut self, entity: Entity) -> bool {
        if self.occupants.contains(&entity) {
            return false;
        }
        self.occupants.push(entity);
        true
    }

    /// Returns false if `entity` was not an occupant.
    pub fn remove_occupant(&mut self, entity: Entity) -> bool {
        let Some(index) = self.occupants.iter().position(|&e| e == entity) else {
            return false;
        };
        self.occupants.remove(index);
        true
    }

    pub(crate) fn clear_occupants(&mut self) {
        self.occupants.clear();
    }

    /// The occupant that has been inside the zone the longest.
    pub fn captor(&self) -> Option<Entity> {
        self.occupants.first().copied()
    }

    pub fn is_captured(&self, current_owner: Entity) -> bool {
        current_owner != self.original_owner
    }

    pub fn trigger(&self) -> Option<TriggerHandle> {
        self.trigger
    }

    /// True once a permanent capture has dropped the trigger for good.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// True while occupancy events should be ignored.
    pub fn ignores_occupancy(&self) -> bool {
        self.skip_trigger_update || self.released
    }

    /// Ownership policy, evaluated against the current occupant set.
    ///
    /// `owner_of` resolves an occupant to its owning player and
    /// `mutual_allies` reports whether two players are allied both ways.
    pub fn decide_ownership(
        &self,
        current_owner: Entity,
        owner_of: impl Fn(Entity) -> Entity,
        mutual_allies: impl Fn(Entity, Entity) -> bool,
    ) -> OwnershipDecision {
        let captured = self.is_captured(current_owner);
        if captured && self.info.permanent {
            return OwnershipDecision::ReleasePermanently;
        }

        let Some(captor) = self.captor() else {
            if captured && !self.info.sticky {
                return OwnershipDecision::RevertToOriginal;
            }
            return OwnershipDecision::Unchanged;
        };

        let captor_owner = owner_of(captor);
        if self.info.must_be_clear {
            let clear = self.occupants.iter().all(|&occupant| {
                let owner = owner_of(occupant);
                owner == captor_owner || mutual_allies(owner, captor_owner)
            });

            if captured && !clear {
                OwnershipDecision::RevertToOriginal
            } else if current_owner != captor_owner && clear {
                OwnershipDecision::TransferTo { captor }
            } else {
                OwnershipDecision::Unchanged
            }
        } else if current_owner != captor_owner {
            OwnershipDecision::TransferTo { captor }
        } else {
            OwnershipDecision::Unchanged
        }
    }
}
