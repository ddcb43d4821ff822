use bevy_ecs::system::Res;

use super::clock::MatchClock;
use super::resources::TimeLimit;

/// True on ticks that are a multiple of `interval`. A zero interval never fires.
pub fn is_interval_tick(tick: u64, interval: u64) -> bool {
    interval != 0 && tick % interval == 0
}

/// Run condition: the configured time limit has been reached and not yet handled.
pub fn time_limit_reached(clock: Res<MatchClock>, limit: Res<TimeLimit>) -> bool {
    limit.is_reached(clock.world_tick)
}
