use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, ScheduleLabel, SystemSet};

use super::clock::advance_clock;

/// Schedule label for one lockstep simulation tick.
/// Run manually each tick via `app.world_mut().run_schedule(SimTick)`.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimTick;

/// Ordered phases within each simulation tick.
///
/// Phases run in declaration order: PreUpdate < Update < PostUpdate < Reactions < Last.
/// Commands written during `Update` are applied in `PostUpdate`; the reactive
/// events they produce are read in `Reactions`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimPhase {
    PreUpdate,
    Update,
    PostUpdate,
    Reactions,
    Last,
}

/// Per-domain system sets within `SimPhase::Update`.
///
/// ```text
/// Triggers → Capture → Scoring → Victory
/// ```
///
/// Triggers refreshes the spatial index and emits occupancy events, Capture
/// consumes them, Scoring awards points and checks objectives, Victory handles
/// the time limit.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainSet {
    Triggers,
    Capture,
    Scoring,
    Victory,
}

fn configure_domain_ordering(schedule: &mut Schedule) {
    schedule.configure_sets(
        (
            DomainSet::Triggers,
            DomainSet::Capture,
            DomainSet::Scoring,
            DomainSet::Victory,
        )
            .chain()
            .in_set(SimPhase::Update),
    );
}

/// Build a configured `SimTick` schedule with phase ordering.
pub fn configure_sim_schedule(executor: ExecutorKind) -> Schedule {
    let mut schedule = Schedule::new(SimTick);
    schedule.set_executor_kind(executor);
    schedule.configure_sets(
        (
            SimPhase::PreUpdate,
            SimPhase::Update,
            SimPhase::PostUpdate,
            SimPhase::Reactions,
            SimPhase::Last,
        )
            .chain(),
    );
    configure_domain_ordering(&mut schedule);
    schedule.add_systems(advance_clock.in_set(SimPhase::Last));
    schedule
}
