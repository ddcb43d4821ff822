use bevy_app::App;

use crate::ecs::clock::MatchClock;
use crate::ecs::schedule::SimTick;

/// Run a single simulation tick.
pub fn tick(app: &mut App) {
    app.world_mut().run_schedule(SimTick);
}

/// Run `n` simulation ticks.
pub fn tick_n(app: &mut App, n: u64) {
    for _ in 0..n {
        tick(app);
    }
}

/// Run ticks until the clock reads `world_tick`, so the next tick executed is that one.
pub fn run_until(app: &mut App, world_tick: u64) {
    while current_tick(app) < world_tick {
        tick(app);
    }
}

/// The tick the next `SimTick` run will execute.
pub fn current_tick(app: &App) -> u64 {
    app.world().resource::<MatchClock>().world_tick
}
