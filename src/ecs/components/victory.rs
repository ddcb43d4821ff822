use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;

use crate::config::DominationVictoryInfo;

/// Domination victory condition attached to a player.
///
/// The objective id and the ally/opponent rosters are filled in lazily on the
/// first tick the condition is active; players and alliances are fixed once a
/// match starts, so the rosters never need refreshing.
#[derive(Component, Debug, Clone)]
pub struct DominationVictoryConditions {
    pub info: DominationVictoryInfo,
    pub score_limit: i64,
    pub short_game: bool,
    enabled: bool,
    initialized: bool,
    pub(crate) objective_id: Option<usize>,
    pub(crate) allies: Option<Vec<Entity>>,
    pub(crate) opponents: Option<Vec<Entity>>,
}

impl DominationVictoryConditions {
    pub fn new(info: DominationVictoryInfo, score_limit: i64, short_game: bool) -> Self {
        Self {
            info,
            score_limit,
            short_game,
            enabled: false,
            initialized: false,
            objective_id: None,
            allies: None,
            opponents: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Apply the initial enabled state from the granted game-mode conditions.
    ///
    /// # Panics
    ///
    /// Victory conditions cannot be toggled once the match has set them up.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.initialized {
            if enabled {
                panic!("Enabling a victory conditions trait mid-game is not supported.");
            }
            panic!("Disabling a victory conditions trait mid-game is not supported.");
        }
        self.enabled = enabled;
        self.initialized = true;
    }

    pub fn objective_id(&self) -> Option<usize> {
        self.objective_id
    }

    pub fn opponents(&self) -> &[Entity] {
        self.opponents.as_deref().unwrap_or(&[])
    }

    pub fn allies(&self) -> &[Entity] {
        self.allies.as_deref().unwrap_or(&[])
    }
}
