use serde::{Deserialize, Serialize};

use super::player::{ObjectiveState, WinState};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventEffect {
    pub event_id: u64,
    pub actor_id: u64,
    pub effect: StateChange,
}

/// A single state mutation attributed to an audit-log event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateChange {
    OwnerChanged {
        old_owner: u64,
        new_owner: u64,
    },
    ExperienceChanged {
        old: i64,
        new: i64,
    },
    LevelChanged {
        old: u32,
        new: u32,
    },
    ObjectiveChanged {
        objective: usize,
        state: ObjectiveState,
    },
    WinStateChanged {
        state: WinState,
    },
    RemovedFromWorld,
}

impl StateChange {
    /// The serde tag for this variant.
    pub fn effect_type_str(&self) -> &'static str {
        match self {
            StateChange::OwnerChanged { .. } => "owner_changed",
            StateChange::ExperienceChanged { .. } => "experience_changed",
            StateChange::LevelChanged { .. } => "level_changed",
            StateChange::ObjectiveChanged { .. } => "objective_changed",
            StateChange::WinStateChanged { .. } => "win_state_changed",
            StateChange::RemovedFromWorld => "removed_from_world",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_owner_change() {
        let effect = EventEffect {
            event_id: 1,
            actor_id: 9,
            effect: StateChange::OwnerChanged {
                old_owner: 2,
                new_owner: 3,
            },
        };
        let json = serde_json::to_value(&effect).unwrap();
        assert_eq!(json["effect"]["type"], "owner_changed");
        assert_eq!(json["effect"]["old_owner"], 2);
        assert_eq!(json["effect"]["new_owner"], 3);
    }

    #[test]
    fn tag_matches_effect_type_str() {
        let changes = [
            StateChange::ExperienceChanged { old: 0, new: 4 },
            StateChange::ObjectiveChanged {
                objective: 0,
                state: ObjectiveState::Failed,
            },
            StateChange::WinStateChanged {
                state: WinState::Won,
            },
            StateChange::RemovedFromWorld,
        ];
        for change in changes {
            let json = serde_json::to_value(&change).unwrap();
            assert_eq!(json["type"], change.effect_type_str());
        }
    }
}
