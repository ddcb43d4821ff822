pub mod app;
pub mod clock;
pub mod commands;
pub mod components;
pub mod conditions;
pub mod events;
pub mod plugin;
pub mod relationships;
pub mod resources;
pub mod schedule;
pub mod setup;
pub mod spatial;
pub mod spawn;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use app::{build_match_app, build_sim_app, build_sim_app_with_executor};
pub use clock::MatchClock;
pub use commands::{SimCommand, SimCommandKind};
pub use components::{
    CenterPosition, DeliversExperience, DominationVictoryConditions, GainsExperience,
    MissionObjectives, MustBeDestroyed, Objective, Owner, OwnerLostAction, OwnershipDecision,
    PlayerCore, PlayerExperience, ProximityCaptor, ProximityCapturable, SimActor, StrategicPoint,
    WinStatus,
};
pub use conditions::{is_interval_tick, time_limit_reached};
pub use events::SimReactiveEvent;
pub use plugin::SimPlugin;
pub use relationships::{Diplomacy, Stance};
pub use resources::{
    ActiveGameMode, ActorRegistry, EcsEvent, EventLog, Feedback, FeedbackOutbox, LocalPlayer,
    TeamScores, TimeLimit,
};
pub use schedule::{DomainSet, SimPhase, SimTick, configure_sim_schedule};
pub use setup::{MapActor, MatchSetup, PlayerSlot, setup_match};
pub use spatial::{ActorMap, OccupancyChange, OccupancyEvent, TriggerHandle};
pub use systems::domination::{Standing, TeamStanding, rank_standings, wins_on_time_limit};
