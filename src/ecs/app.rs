use bevy_app::App;
use bevy_ecs::message::MessageRegistry;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs};

use super::clock::MatchClock;
use super::commands::{SimCommand, apply_sim_commands};
use super::events::SimReactiveEvent;
use super::plugin::SimPlugin;
use super::relationships::Diplomacy;
use super::resources::{
    ActiveGameMode, ActorIdGenerator, ActorRegistry, EcsIdGenerator, EventLog, FeedbackOutbox,
    LocalPlayer, TeamScores, TimeLimit,
};
use super::schedule::{SimPhase, configure_sim_schedule};
use super::spatial::{ActorMap, OccupancyEvent};

/// Build a headless Bevy app with the match clock, core resources, message
/// types and the command applicator, but no domain systems.
///
/// Manual tick control:
/// ```no_run
/// # use domination_sim::ecs::{build_sim_app, SimTick};
/// let mut app = build_sim_app();
/// for _ in 0..1500 {
///     app.world_mut().run_schedule(SimTick);
/// }
/// ```
pub fn build_sim_app() -> App {
    build_sim_app_with_executor(ExecutorKind::SingleThreaded)
}

/// Build a headless Bevy app with a specific executor kind.
///
/// Lockstep matches must use `SingleThreaded`; the multi-threaded executor is
/// only safe when every peer tolerates system reordering within a phase.
pub fn build_sim_app_with_executor(executor: ExecutorKind) -> App {
    let mut app = App::empty();

    // Core resources
    app.insert_resource(MatchClock::new());
    app.insert_resource(EventLog::new());
    app.insert_resource(EcsIdGenerator::default());
    app.insert_resource(ActorIdGenerator::default());
    app.insert_resource(ActorRegistry::new());
    app.insert_resource(ActorMap::new());
    app.insert_resource(Diplomacy::new());
    app.init_resource::<TeamScores>();
    app.init_resource::<TimeLimit>();
    app.init_resource::<FeedbackOutbox>();
    app.init_resource::<LocalPlayer>();
    app.init_resource::<ActiveGameMode>();

    // Register message types
    MessageRegistry::register_message::<SimCommand>(app.world_mut());
    MessageRegistry::register_message::<SimReactiveEvent>(app.world_mut());
    MessageRegistry::register_message::<OccupancyEvent>(app.world_mut());

    // Build schedule with message rotation + applicator
    let mut schedule = configure_sim_schedule(executor);
    schedule.add_systems(bevy_ecs::message::message_update_system.in_set(SimPhase::PreUpdate));
    schedule.add_systems(apply_sim_commands.in_set(SimPhase::PostUpdate));
    app.add_schedule(schedule);
    app
}

/// [`build_sim_app`] with capture and domination systems installed.
pub fn build_match_app() -> App {
    let mut app = build_sim_app();
    app.add_plugins(SimPlugin);
    app
}
