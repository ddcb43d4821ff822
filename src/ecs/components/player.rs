use bevy_ecs::component::Component;

use crate::config::MissionObjectivesInfo;
use crate::model::{ObjectiveState, ObjectiveType, WinState};

/// Static per-player metadata, fixed once the match starts.
#[derive(Component, Debug, Clone, Default)]
pub struct PlayerCore {
    pub name: String,
    pub faction: String,
    /// Lobby team; 0 means no team.
    pub team: u32,
    pub non_combatant: bool,
    pub playable: bool,
}

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WinStatus(pub WinState);

/// Score ledger. Domination points accumulate here alongside regular experience.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerExperience {
    pub experience: i64,
}

impl PlayerExperience {
    pub fn give(&mut self, amount: i64) {
        self.experience += amount;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Objective {
    pub description: String,
    pub kind: ObjectiveType,
    pub state: ObjectiveState,
}

/// Objectives tracked for one player, and the win state they imply.
#[derive(Component, Debug, Clone, Default)]
pub struct MissionObjectives {
    pub info: MissionObjectivesInfo,
    objectives: Vec<Objective>,
}

impl MissionObjectives {
    pub fn new(info: MissionObjectivesInfo) -> Self {
        Self {
            info,
            objectives: Vec::new(),
        }
    }

    /// Register an objective and return its id.
    pub fn add(&mut self, description: impl Into<String>, kind: ObjectiveType) -> usize {
        self.objectives.push(Objective {
            description: description.into(),
            kind,
            state: ObjectiveState::Incomplete,
        });
        self.objectives.len() - 1
    }

    pub fn get(&self, id: usize) -> Option<&Objective> {
        self.objectives.get(id)
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Returns true only when the objective moved from incomplete to completed.
    pub fn mark_completed(&mut self, id: usize) -> bool {
        self.transition(id, ObjectiveState::Completed)
    }

    /// Returns true only when the objective moved from incomplete to failed.
    pub fn mark_failed(&mut self, id: usize) -> bool {
        self.transition(id, ObjectiveState::Failed)
    }

    fn transition(&mut self, id: usize, state: ObjectiveState) -> bool {
        match self.objectives.get_mut(id) {
            Some(objective) if objective.state == ObjectiveState::Incomplete => {
                objective.state = state;
                true
            }
            _ => false,
        }
    }

    /// Fail every incomplete objective, returning the ids that changed.
    pub fn force_defeat(&mut self) -> Vec<usize> {
        let mut failed = Vec::new();
        for (id, objective) in self.objectives.iter_mut().enumerate() {
            if objective.state == ObjectiveState::Incomplete {
                objective.state = ObjectiveState::Failed;
                failed.push(id);
            }
        }
        failed
    }

    /// Any failed primary loses; all primaries completed wins.
    pub fn evaluate(&self) -> WinState {
        let mut primaries = self
            .objectives
            .iter()
            .filter(|o| o.kind == ObjectiveType::Primary)
            .peekable();
        if primaries.peek().is_none() {
            return WinState::Undefined;
        }

        let mut all_completed = true;
        for objective in primaries {
            match objective.state {
                ObjectiveState::Failed => return WinState::Lost,
                ObjectiveState::Incomplete => all_completed = false,
                ObjectiveState::Completed => {}
            }
        }
        if all_completed {
            WinState::Won
        } else {
            WinState::Undefined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marking_is_idempotent() {
        let mut objectives = MissionObjectives::default();
        let id = objectives.add("Hold the hill", ObjectiveType::Primary);
        assert!(objectives.mark_completed(id));
        assert!(!objectives.mark_completed(id));
        assert!(!objectives.mark_failed(id));
        assert_eq!(objectives.get(id).unwrap().state, ObjectiveState::Completed);
    }

    #[test]
    fn unknown_objective_is_ignored() {
        let mut objectives = MissionObjectives::default();
        assert!(!objectives.mark_failed(3));
    }

    #[test]
    fn evaluation_follows_primaries() {
        let mut objectives = MissionObjectives::default();
        assert_eq!(objectives.evaluate(), WinState::Undefined);

        let main = objectives.add("Win", ObjectiveType::Primary);
        let side = objectives.add("Scout", ObjectiveType::Secondary);
        assert_eq!(objectives.evaluate(), WinState::Undefined);

        objectives.mark_failed(side);
        assert_eq!(objectives.evaluate(), WinState::Undefined);

        objectives.mark_completed(main);
        assert_eq!(objectives.evaluate(), WinState::Won);
    }

    #[test]
    fn failed_primary_loses() {
        let mut objectives = MissionObjectives::default();
        let a = objectives.add("A", ObjectiveType::Primary);
        objectives.add("B", ObjectiveType::Primary);
        objectives.mark_failed(a);
        assert_eq!(objectives.evaluate(), WinState::Lost);
    }

    #[test]
    fn force_defeat_fails_only_incomplete() {
        let mut objectives = MissionObjectives::default();
        let a = objectives.add("A", ObjectiveType::Primary);
        let b = objectives.add("B", ObjectiveType::Secondary);
        objectives.mark_completed(a);
        assert_eq!(objectives.force_defeat(), vec![b]);
        assert!(objectives.force_defeat().is_empty());
    }

    #[test]
    fn experience_accumulates() {
        let mut ledger = PlayerExperience::default();
        ledger.give(3);
        ledger.give(2);
        assert_eq!(ledger.experience, 5);
    }
}
