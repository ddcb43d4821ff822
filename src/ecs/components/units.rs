use std::collections::BTreeMap;

use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;

/// The owning player is defeated once it has none of these left in the world.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MustBeDestroyed {
    /// Counts for the short-game check.
    pub required_for_short_game: bool,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GainsExperience {
    pub level: u32,
    pub max_level: u32,
}

impl GainsExperience {
    pub fn new(max_level: u32) -> Self {
        Self {
            level: 0,
            max_level,
        }
    }

    pub fn can_gain_level(&self) -> bool {
        self.level < self.max_level
    }

    /// Raise the level by up to `levels`, returning the number actually gained.
    pub fn give_levels(&mut self, levels: u32) -> u32 {
        let gained = levels.min(self.max_level.saturating_sub(self.level));
        self.level += gained;
        gained
    }
}

/// Can hand its own experience to another unit, crediting its owner as well.
#[derive(Component, Debug, Clone, Default)]
pub struct DeliversExperience {
    /// Player experience per game mode.
    pub player_experience: BTreeMap<String, i64>,
}

/// What happens to an actor when its owning player loses.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerLostAction {
    ChangeOwner(Entity),
    RemoveFromWorld,
}
