//! Match setup: turns rules, lobby options and map data into a populated world.

use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::config::{LobbySettings, Ruleset};
use crate::ecs::components::{DominationVictoryConditions, PlayerCore, ProximityCaptor};
use crate::ecs::relationships::Diplomacy;
use crate::ecs::resources::{ActiveGameMode, LocalPlayer};
use crate::ecs::spawn;
use crate::error::ConfigError;
use crate::model::{CPos, WPos};

/// One lobby slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSlot {
    pub name: String,
    pub faction: String,
    /// 0 means no team.
    pub team: u32,
    pub non_combatant: bool,
    pub playable: bool,
    /// The slot controlled from this peer.
    pub local: bool,
}

impl PlayerSlot {
    pub fn new(name: impl Into<String>, faction: impl Into<String>, team: u32) -> Self {
        Self {
            name: name.into(),
            faction: faction.into(),
            team,
            non_combatant: false,
            playable: true,
            local: false,
        }
    }

    pub fn local(mut self) -> Self {
        self.local = true;
        self
    }
}

/// An actor placed on the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapActor {
    /// Key into `Ruleset::actors`.
    pub actor_type: String,
    pub name: String,
    /// Index into the player slots; `None` means the neutral player.
    pub owner: Option<usize>,
    pub position: WPos,
    /// Game modes this actor spawns in. Empty means every mode.
    pub game_modes: Vec<String>,
    /// Cells for an area capturable, overriding the rules.
    pub area: Option<Vec<CPos>>,
}

impl MapActor {
    pub fn new(actor_type: impl Into<String>, owner: Option<usize>, position: WPos) -> Self {
        let actor_type = actor_type.into();
        Self {
            name: actor_type.clone(),
            actor_type,
            owner,
            position,
            game_modes: Vec::new(),
            area: None,
        }
    }
}

/// Entities created by [`setup_match`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSetup {
    /// One entity per slot, in slot order.
    pub players: Vec<Entity>,
    pub neutral: Entity,
    /// One entry per map actor; `None` where the game mode prevented the spawn.
    pub actors: Vec<Option<Entity>>,
}

/// Validate the rules and populate `world` for a new match.
///
/// Every error is detected before anything is spawned.
pub fn setup_match(
    world: &mut World,
    rules: &Ruleset,
    lobby: &LobbySettings,
    slots: &[PlayerSlot],
    map_actors: &[MapActor],
) -> Result<MatchSetup, ConfigError> {
    rules.validate()?;
    let mode = ActiveGameMode::resolve(&rules.game_modes, lobby)?;
    let score_limit = lobby.score_limit()?;
    let short_game = lobby.short_game(&rules.map_options)?;
    for actor in map_actors {
        rules.actor(&actor.actor_type)?;
        if let Some(slot) = actor.owner
            && slot >= slots.len()
        {
            return Err(ConfigError::UnknownPlayerSlot {
                actor: actor.name.clone(),
                slot,
            });
        }
    }

    let captor = rules
        .player
        .proximity_captor
        .as_ref()
        .map(|info| ProximityCaptor {
            types: info.types.clone(),
        });

    let neutral = spawn::spawn_player(
        world,
        PlayerCore {
            name: "Neutral".to_string(),
            faction: String::new(),
            team: 0,
            non_combatant: true,
            playable: false,
        },
        captor.clone(),
        rules.player.objectives.clone(),
    );

    let mut players = Vec::with_capacity(slots.len());
    let mut local = None;
    for slot in slots {
        let player = spawn::spawn_player(
            world,
            PlayerCore {
                name: slot.name.clone(),
                faction: slot.faction.clone(),
                team: slot.team,
                non_combatant: slot.non_combatant,
                playable: slot.playable,
            },
            captor.clone(),
            rules.player.objectives.clone(),
        );
        if let Some(info) = &rules.player.domination {
            let mut dvc = DominationVictoryConditions::new(info.clone(), score_limit, short_game);
            let enabled = info
                .requires_condition
                .as_deref()
                .is_none_or(|condition| mode.grants(condition));
            dvc.set_enabled(enabled);
            world.entity_mut(player).insert(dvc);
        }
        if slot.local {
            local = Some(player);
        }
        players.push(player);
    }

    let teams: Vec<(Entity, u32)> = players
        .iter()
        .zip(slots)
        .map(|(&player, slot)| (player, slot.team))
        .collect();
    world.insert_resource(Diplomacy::from_teams(&teams));
    world.insert_resource(LocalPlayer(local));

    let mut actors = Vec::with_capacity(map_actors.len());
    for actor in map_actors {
        if mode.prevents_spawn(&actor.game_modes) {
            tracing::debug!(actor = %actor.name, "not spawned in this game mode");
            actors.push(None);
            continue;
        }
        let info = rules.actor(&actor.actor_type)?;
        let owner = actor.owner.map_or(neutral, |slot| players[slot]);
        actors.push(Some(spawn::spawn_actor_from_info(
            world,
            &actor.name,
            info,
            owner,
            actor.position,
            actor.area.clone(),
        )));
    }

    tracing::info!(
        mode = mode.name.as_deref().unwrap_or("none"),
        players = players.len(),
        actors = actors.iter().flatten().count(),
        score_limit,
        short_game,
        "match set up"
    );
    world.insert_resource(mode);

    Ok(MatchSetup {
        players,
        neutral,
        actors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ActorInfo, DominationVictoryInfo, GameModeInfo, ProximityCaptorInfo,
        ProximityCapturableInfo,
    };
    use crate::ecs::app::build_match_app;
    use crate::ecs::components::{Owner, ProximityCapturable, StrategicPoint};
    use crate::model::CaptureTypes;

    fn rules() -> Ruleset {
        let mut rules = Ruleset::default();
        rules.player.proximity_captor = Some(ProximityCaptorInfo {
            types: CaptureTypes::new(["Player"]),
        });
        rules.player.domination = Some(DominationVictoryInfo {
            requires_condition: Some("domination".into()),
            ..Default::default()
        });
        rules.game_modes = vec![
            GameModeInfo {
                internal_name: "domination".into(),
                name: "Domination".into(),
                condition: Some("domination".into()),
            },
            GameModeInfo {
                internal_name: "conquest".into(),
                name: "Conquest".into(),
                condition: None,
            },
        ];
        rules.actors.insert(
            "flag".into(),
            ActorInfo {
                proximity_capturable: Some(ProximityCapturableInfo::default()),
                strategic_point: true,
                ..Default::default()
            },
        );
        rules
    }

    fn slots() -> Vec<PlayerSlot> {
        vec![
            PlayerSlot::new("Red", "allies", 1).local(),
            PlayerSlot::new("Blue", "soviet", 2),
        ]
    }

    fn flag(game_modes: &[&str]) -> MapActor {
        MapActor {
            game_modes: game_modes.iter().map(|m| m.to_string()).collect(),
            ..MapActor::new("flag", None, CPos::new(5, 5).center())
        }
    }

    #[test]
    fn default_mode_enables_domination() {
        let mut app = build_match_app();
        let lobby = LobbySettings::new().with_option("scorelimit", "300");
        let setup = setup_match(app.world_mut(), &rules(), &lobby, &slots(), &[flag(&[])]).unwrap();

        let world = app.world();
        assert_eq!(
            world.resource::<ActiveGameMode>().name.as_deref(),
            Some("domination")
        );
        assert_eq!(world.resource::<LocalPlayer>().0, Some(setup.players[0]));
        let dvc = world
            .get::<DominationVictoryConditions>(setup.players[1])
            .unwrap();
        assert!(dvc.is_enabled());
        assert_eq!(dvc.score_limit, 300);

        let flag = setup.actors[0].unwrap();
        assert_eq!(world.get::<Owner>(flag).unwrap().0, setup.neutral);
        assert!(world.get::<StrategicPoint>(flag).is_some());
        assert!(world.get::<ProximityCapturable>(flag).is_some());
    }

    #[test]
    fn other_mode_disables_domination_and_filters_actors() {
        let mut app = build_match_app();
        let lobby = LobbySettings::new().with_option("gamemode", "conquest");
        let setup = setup_match(
            app.world_mut(),
            &rules(),
            &lobby,
            &slots(),
            &[flag(&["domination"]), flag(&["conquest"])],
        )
        .unwrap();

        let dvc = app
            .world()
            .get::<DominationVictoryConditions>(setup.players[0])
            .unwrap();
        assert!(!dvc.is_enabled());
        assert_eq!(setup.actors[0], None);
        assert!(setup.actors[1].is_some());
    }

    #[test]
    fn teams_become_alliances() {
        let mut app = build_match_app();
        let slots = vec![
            PlayerSlot::new("Red", "allies", 1),
            PlayerSlot::new("Pink", "allies", 1),
            PlayerSlot::new("Blue", "soviet", 0),
            PlayerSlot::new("Teal", "soviet", 0),
        ];
        let setup =
            setup_match(app.world_mut(), &rules(), &LobbySettings::new(), &slots, &[]).unwrap();
        let diplomacy = app.world().resource::<Diplomacy>();
        let p = &setup.players;
        assert!(diplomacy.are_mutual_allies(p[0], p[1]));
        assert!(!diplomacy.is_allied_with(p[2], p[3]));
    }

    #[test]
    fn invalid_lobby_and_rules_are_rejected() {
        let mut app = build_match_app();
        let lobby = LobbySettings::new().with_option("gamemode", "koth");
        let err = setup_match(app.world_mut(), &rules(), &lobby, &slots(), &[]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownGameMode(ref m) if m == "koth"));

        let lobby = LobbySettings::new().with_option("scorelimit", "lots");
        let err = setup_match(app.world_mut(), &rules(), &lobby, &slots(), &[]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLobbyOption { .. }));

        let mut missing_captor = rules();
        missing_captor.player.proximity_captor = None;
        let err = setup_match(
            app.world_mut(),
            &missing_captor,
            &LobbySettings::new(),
            &slots(),
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingPlayerCaptor { .. }));

        let stray = MapActor::new("flag", Some(7), WPos::new(0, 0));
        let err = setup_match(app.world_mut(), &rules(), &LobbySettings::new(), &slots(), &[stray])
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPlayerSlot { slot: 7, .. }));

        let unknown = MapActor::new("tower", None, WPos::new(0, 0));
        let err = setup_match(app.world_mut(), &rules(), &LobbySettings::new(), &slots(), &[unknown])
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownActor(ref a) if a == "tower"));

        assert!(app.world().resource::<crate::ecs::resources::ActorRegistry>().is_empty());
    }
}
