use std::collections::BTreeMap;

use bevy_ecs::resource::Resource;

use crate::config::{GameModeInfo, LobbySettings};
use crate::error::ConfigError;

/// The game mode chosen in the lobby and the condition it grants.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveGameMode {
    /// Internal name of the active mode; `None` when the rules declare no modes.
    pub name: Option<String>,
    pub condition: Option<String>,
}

impl ActiveGameMode {
    /// Pick the mode named by the `gamemode` lobby option, defaulting to the
    /// first declared mode.
    pub fn resolve(modes: &[GameModeInfo], lobby: &LobbySettings) -> Result<Self, ConfigError> {
        let Some(first) = modes.first() else {
            return Ok(Self::default());
        };

        let requested = lobby.option_or_default("gamemode", &first.internal_name);
        let mode = modes
            .iter()
            .find(|m| m.internal_name == requested)
            .ok_or_else(|| ConfigError::UnknownGameMode(requested.to_string()))?;

        Ok(Self {
            name: Some(mode.internal_name.clone()),
            condition: mode.condition.clone(),
        })
    }

    pub fn grants(&self, condition: &str) -> bool {
        self.condition.as_deref() == Some(condition)
    }

    /// Map actors restricted to some modes only spawn in one of them.
    pub fn prevents_spawn(&self, restricted_to: &[String]) -> bool {
        if restricted_to.is_empty() {
            return false;
        }
        match &self.name {
            Some(name) => !restricted_to.iter().any(|m| m == name),
            None => true,
        }
    }

    /// Look up a per-mode experience table, defaulting to 0.
    pub fn player_experience(&self, table: &BTreeMap<String, i64>) -> i64 {
        self.name
            .as_ref()
            .and_then(|name| table.get(name))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modes() -> Vec<GameModeInfo> {
        vec![
            GameModeInfo {
                internal_name: "conquest".into(),
                name: "Conquest".into(),
                condition: None,
            },
            GameModeInfo {
                internal_name: "domination".into(),
                name: "Domination".into(),
                condition: Some("domination".into()),
            },
        ]
    }

    #[test]
    fn defaults_to_first_mode() {
        let mode = ActiveGameMode::resolve(&modes(), &LobbySettings::new()).unwrap();
        assert_eq!(mode.name.as_deref(), Some("conquest"));
        assert!(!mode.grants("domination"));
    }

    #[test]
    fn lobby_selects_mode_and_grants_condition() {
        let lobby = LobbySettings::new().with_option("gamemode", "domination");
        let mode = ActiveGameMode::resolve(&modes(), &lobby).unwrap();
        assert!(mode.grants("domination"));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let lobby = LobbySettings::new().with_option("gamemode", "koth");
        assert!(matches!(
            ActiveGameMode::resolve(&modes(), &lobby),
            Err(ConfigError::UnknownGameMode(m)) if m == "koth"
        ));
    }

    #[test]
    fn spawn_filter() {
        let lobby = LobbySettings::new().with_option("gamemode", "domination");
        let mode = ActiveGameMode::resolve(&modes(), &lobby).unwrap();
        assert!(!mode.prevents_spawn(&[]));
        assert!(!mode.prevents_spawn(&["domination".to_string()]));
        assert!(mode.prevents_spawn(&["conquest".to_string()]));
    }

    #[test]
    fn experience_table_lookup() {
        let lobby = LobbySettings::new().with_option("gamemode", "domination");
        let mode = ActiveGameMode::resolve(&modes(), &lobby).unwrap();
        let table = BTreeMap::from([("domination".to_string(), 15), ("conquest".to_string(), 5)]);
        assert_eq!(mode.player_experience(&table), 15);
        assert_eq!(ActiveGameMode::default().player_experience(&table), 0);
    }
}
