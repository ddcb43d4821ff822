#![allow(dead_code)]

use bevy_app::App;
use bevy_ecs::entity::Entity;
use domination_sim::ecs::{
    CenterPosition, MapActor, MatchClock, MatchSetup, Owner, PlayerSlot, SimTick, build_match_app,
    setup_match,
};
use domination_sim::{CPos, LobbySettings, Ruleset, WPos};

pub const RULES: &str = r#"{
    "player": {
        "proximity_captor": { "types": ["Player"] },
        "domination": { "score_interval": 25, "requires_condition": "domination" },
        "objectives": { "win_notification": "Win", "lose_notification": "Lose" }
    },
    "actors": {
        "flag": { "proximity_capturable": { "range": 3072 }, "strategic_point": true },
        "sticky_flag": { "proximity_capturable": { "range": 3072, "sticky": true }, "strategic_point": true },
        "area_flag": { "proximity_capturable": { "kind": "area" }, "strategic_point": true },
        "rifleman": { "proximity_captor": { "types": ["Infantry"] } },
        "mcv": { "must_be_destroyed": { "required_for_short_game": true } }
    },
    "game_modes": [
        { "internal_name": "domination", "name": "Domination", "condition": "domination" },
        { "internal_name": "conquest", "name": "Conquest" }
    ]
}"#;

pub const FLAG_CELL: CPos = CPos::new(10, 10);

pub fn far_away() -> WPos {
    CPos::new(60, 60).center()
}

pub fn near_flag() -> WPos {
    FLAG_CELL.center().offset_cells(1, 0)
}

pub fn slots() -> Vec<PlayerSlot> {
    vec![
        PlayerSlot::new("Red", "allies", 1).local(),
        PlayerSlot::new("Blue", "soviet", 2),
    ]
}

/// Each slot gets an mcv so the short-game check keeps it alive.
pub fn with_bases(mut actors: Vec<MapActor>, slots: usize) -> Vec<MapActor> {
    for slot in 0..slots {
        actors.push(MapActor::new("mcv", Some(slot), CPos::new(0, slot as i32 * 4).center()));
    }
    actors
}

pub fn start(lobby: LobbySettings, actors: Vec<MapActor>) -> (App, MatchSetup) {
    let rules = Ruleset::from_json(RULES).unwrap();
    let slots = slots();
    let actors = with_bases(actors, slots.len());
    let mut app = build_match_app();
    let setup = setup_match(app.world_mut(), &rules, &lobby, &slots, &actors).unwrap();
    (app, setup)
}

pub fn tick(app: &mut App) {
    app.world_mut().run_schedule(SimTick);
}

pub fn tick_n(app: &mut App, n: u64) {
    for _ in 0..n {
        tick(app);
    }
}

/// Run until `world_tick` is the next tick to execute.
pub fn run_until(app: &mut App, world_tick: u64) {
    while app.world().resource::<MatchClock>().world_tick < world_tick {
        tick(app);
    }
}

pub fn move_to(app: &mut App, actor: Entity, position: WPos) {
    app.world_mut().get_mut::<CenterPosition>(actor).unwrap().0 = position;
}

pub fn owner(app: &App, actor: Entity) -> Entity {
    app.world().get::<Owner>(actor).unwrap().0
}
