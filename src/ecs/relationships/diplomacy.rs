use std::collections::BTreeMap;

use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;

/// How one player regards another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stance {
    #[default]
    Enemy,
    Neutral,
    Ally,
}

/// Directed player stances, fixed once the match starts.
///
/// Stances are one-way: `a` may consider `b` an ally while `b` does not
/// reciprocate. Unlisted pairs are enemies, and every player is allied with
/// itself. BTreeMap for deterministic iteration.
#[derive(Resource, Debug, Clone, Default)]
pub struct Diplomacy {
    stances: BTreeMap<(Entity, Entity), Stance>,
}

impl Diplomacy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Players on the same non-zero team are mutual allies.
    pub fn from_teams(players: &[(Entity, u32)]) -> Self {
        let mut diplomacy = Self::new();
        for &(a, team_a) in players {
            for &(b, team_b) in players {
                if a != b && team_a != 0 && team_a == team_b {
                    diplomacy.set_stance(a, b, Stance::Ally);
                }
            }
        }
        diplomacy
    }

    pub fn set_stance(&mut self, from: Entity, to: Entity, stance: Stance) {
        self.stances.insert((from, to), stance);
    }

    pub fn set_mutual_allies(&mut self, a: Entity, b: Entity) {
        self.set_stance(a, b, Stance::Ally);
        self.set_stance(b, a, Stance::Ally);
    }

    pub fn stance(&self, from: Entity, to: Entity) -> Stance {
        if from == to {
            return Stance::Ally;
        }
        self.stances.get(&(from, to)).copied().unwrap_or_default()
    }

    pub fn is_allied_with(&self, from: Entity, to: Entity) -> bool {
        self.stance(from, to) == Stance::Ally
    }

    pub fn are_mutual_allies(&self, a: Entity, b: Entity) -> bool {
        self.is_allied_with(a, b) && self.is_allied_with(b, a)
    }
}
