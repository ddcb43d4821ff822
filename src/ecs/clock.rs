use bevy_ecs::resource::Resource;
use bevy_ecs::system::ResMut;

/// Match clock counting lockstep world ticks.
///
/// The first tick is tick 1. `advance_clock` moves the clock forward at the
/// end of each tick (in `SimPhase::Last`), so every system of a tick sees the
/// same `world_tick`.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchClock {
    pub world_tick: u64,
}

impl MatchClock {
    pub fn new() -> Self {
        Self { world_tick: 1 }
    }

    pub fn advance(&mut self) {
        self.world_tick += 1;
    }
}

impl Default for MatchClock {
    fn default() -> Self {
        Self::new()
    }
}

pub fn advance_clock(mut clock: ResMut<MatchClock>) {
    clock.advance();
}
