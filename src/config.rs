//! Rule definitions and lobby settings.
//!
//! Rules are plain serde structs loaded from JSON. Every field has a default,
//! so a rules document only lists what differs. [`Ruleset::validate`] runs the
//! cross-actor checks that must pass before a match starts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{CPos, CaptureTypes, WDist};

/// Whether a captor must be within a radius or inside a set of cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityCapturableKind {
    #[default]
    Range,
    Area,
}

/// Rules for an actor that changes hands when captors stand near it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityCapturableInfo {
    pub kind: ProximityCapturableKind,
    /// Capture radius for [`ProximityCapturableKind::Range`].
    pub range: WDist,
    /// Capture cells for [`ProximityCapturableKind::Area`]. Empty means the
    /// anchor cell and its eight neighbours, unless the spawned actor supplies
    /// its own area.
    pub area: Vec<CPos>,
    pub captor_types: CaptureTypes,
    /// Ownership only moves while no hostile captor is inside the zone.
    pub must_be_clear: bool,
    /// Ownership stays with the captor after it leaves.
    pub sticky: bool,
    /// The first capture is final. Implies sticky.
    pub permanent: bool,
}

impl Default for ProximityCapturableInfo {
    fn default() -> Self {
        Self {
            kind: ProximityCapturableKind::Range,
            range: WDist::from_cells(5),
            area: Vec::new(),
            captor_types: CaptureTypes::default_captors(),
            must_be_clear: false,
            sticky: false,
            permanent: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityCaptorInfo {
    pub types: CaptureTypes,
}

/// Domination: hold strategic points to accumulate score up to a limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DominationVictoryInfo {
    /// Objective text; `{0}` is replaced by the lobby score limit.
    pub objective: String,
    pub points_per_capture: i64,
    /// Ticks between score awards.
    pub score_interval: u64,
    /// Delay of the end-of-game speech notification, in milliseconds.
    pub notification_delay: u64,
    pub suppress_notifications: bool,
    /// Game-mode condition that enables this victory condition. `None` means
    /// always enabled.
    pub requires_condition: Option<String>,
}

impl Default for DominationVictoryInfo {
    fn default() -> Self {
        Self {
            objective: "Reach a score of {0} by capturing strategic points on the map!".to_string(),
            points_per_capture: 1,
            score_interval: 25,
            notification_delay: 1500,
            suppress_notifications: false,
            requires_condition: None,
        }
    }
}

impl DominationVictoryInfo {
    pub fn objective_text(&self, score_limit: i64) -> String {
        self.objective.replace("{0}", &score_limit.to_string())
    }
}

/// Speech notifications played to the local player when the match ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionObjectivesInfo {
    pub win_notification: Option<String>,
    pub lose_notification: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MustBeDestroyedInfo {
    /// Counts towards the short-game survival check.
    pub required_for_short_game: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainsExperienceInfo {
    pub max_level: u32,
}

impl Default for GainsExperienceInfo {
    fn default() -> Self {
        Self { max_level: 4 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliversExperienceInfo {
    /// Experience for the owning player, keyed by game mode.
    pub player_experience: BTreeMap<String, i64>,
}

/// Capabilities of one actor type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorInfo {
    pub proximity_capturable: Option<ProximityCapturableInfo>,
    pub proximity_captor: Option<ProximityCaptorInfo>,
    pub strategic_point: bool,
    pub must_be_destroyed: Option<MustBeDestroyedInfo>,
    pub gains_experience: Option<GainsExperienceInfo>,
    pub delivers_experience: Option<DeliversExperienceInfo>,
}

/// Traits of the per-player actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerActorInfo {
    pub proximity_captor: Option<ProximityCaptorInfo>,
    pub domination: Option<DominationVictoryInfo>,
    pub objectives: MissionObjectivesInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameModeInfo {
    pub internal_name: String,
    pub name: String,
    /// Condition granted while this mode is active.
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// Default for the short-game lobby option: players are defeated once
    /// they lose every actor flagged `required_for_short_game`.
    pub short_game: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self { short_game: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    pub player: PlayerActorInfo,
    pub actors: BTreeMap<String, ActorInfo>,
    pub game_modes: Vec<GameModeInfo>,
    pub map_options: MapOptions,
}

impl Ruleset {
    /// Parse and validate a JSON rules document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let rules: Ruleset = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player.proximity_captor.is_none()
            && let Some((name, _)) = self
                .actors
                .iter()
                .find(|(_, info)| info.proximity_capturable.is_some())
        {
            return Err(ConfigError::MissingPlayerCaptor {
                actor: name.clone(),
            });
        }

        if let Some(domination) = &self.player.domination
            && domination.score_interval == 0
        {
            return Err(ConfigError::InvalidScoreInterval);
        }

        Ok(())
    }

    pub fn actor(&self, name: &str) -> Result<&ActorInfo, ConfigError> {
        self.actors
            .get(name)
            .ok_or_else(|| ConfigError::UnknownActor(name.to_string()))
    }
}

/// Global lobby options as chosen by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LobbySettings {
    options: BTreeMap<String, String>,
}

impl LobbySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn option_or_default<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.options.get(key).map_or(default, String::as_str)
    }

    /// The `scorelimit` option, defaulting to 1.
    pub fn score_limit(&self) -> Result<i64, ConfigError> {
        let value = self.option_or_default("scorelimit", "1");
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidLobbyOption {
                key: "scorelimit".to_string(),
                value: value.to_string(),
            })
    }

    /// The `shortgame` option, falling back to the map default.
    pub fn short_game(&self, map: &MapOptions) -> Result<bool, ConfigError> {
        match self.options.get("shortgame").map(String::as_str) {
            None => Ok(map.short_game),
            Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
            Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
            Some(v) => Err(ConfigError::InvalidLobbyOption {
                key: "shortgame".to_string(),
                value: v.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capturable_defaults() {
        let info = ProximityCapturableInfo::default();
        assert_eq!(info.kind, ProximityCapturableKind::Range);
        assert_eq!(info.range, WDist::from_cells(5));
        assert!(info.captor_types.contains("Infantry"));
        assert!(!info.sticky && !info.permanent && !info.must_be_clear);
    }

    #[test]
    fn objective_text_substitutes_limit() {
        let info = DominationVictoryInfo::default();
        assert_eq!(
            info.objective_text(250),
            "Reach a score of 250 by capturing strategic points on the map!"
        );
    }

    #[test]
    fn rules_parse_with_partial_fields() {
        let json = r#"{
            "player": { "proximity_captor": { "types": ["Player"] }, "domination": { "score_interval": 10 } },
            "actors": {
                "flag": { "proximity_capturable": { "kind": "area", "sticky": true }, "strategic_point": true },
                "rifleman": { "proximity_captor": { "types": ["Infantry"] } }
            }
        }"#;
        let rules = Ruleset::from_json(json).unwrap();
        let flag = rules.actor("flag").unwrap();
        let capturable = flag.proximity_capturable.as_ref().unwrap();
        assert_eq!(capturable.kind, ProximityCapturableKind::Area);
        assert!(capturable.sticky);
        assert_eq!(capturable.range, WDist::from_cells(5));
        assert_eq!(rules.player.domination.as_ref().unwrap().score_interval, 10);
        assert!(rules.map_options.short_game);
    }

    #[test]
    fn capturable_without_player_captor_is_rejected() {
        let json = r#"{ "actors": { "flag": { "proximity_capturable": {} } } }"#;
        let err = Ruleset::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPlayerCaptor { actor } if actor == "flag"));
    }

    #[test]
    fn zero_score_interval_is_rejected() {
        let json = r#"{ "player": { "domination": { "score_interval": 0 } } }"#;
        assert!(matches!(
            Ruleset::from_json(json),
            Err(ConfigError::InvalidScoreInterval)
        ));
    }

    #[test]
    fn unknown_actor_lookup_fails() {
        let rules = Ruleset::default();
        assert!(matches!(rules.actor("mcv"), Err(ConfigError::UnknownActor(_))));
    }

    #[test]
    fn score_limit_defaults_to_one() {
        assert_eq!(LobbySettings::new().score_limit().unwrap(), 1);
        let lobby = LobbySettings::new().with_option("scorelimit", "300");
        assert_eq!(lobby.score_limit().unwrap(), 300);
    }

    #[test]
    fn malformed_score_limit_is_a_config_error() {
        let lobby = LobbySettings::new().with_option("scorelimit", "lots");
        assert!(matches!(
            lobby.score_limit(),
            Err(ConfigError::InvalidLobbyOption { key, .. }) if key == "scorelimit"
        ));
    }

    #[test]
    fn short_game_falls_back_to_map_default() {
        let map = MapOptions { short_game: false };
        assert!(!LobbySettings::new().short_game(&map).unwrap());
        let lobby = LobbySettings::new().with_option("shortgame", "True");
        assert!(lobby.short_game(&map).unwrap());
        let lobby = LobbySettings::new().with_option("shortgame", "maybe");
        assert!(lobby.short_game(&map).is_err());
    }
}
