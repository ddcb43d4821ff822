use serde::{Deserialize, Serialize};

/// What happened, as recorded in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Capture,
    ObjectiveCompleted,
    ObjectiveFailed,
    PlayerWon,
    PlayerLost,
    ExperienceGranted,
    ExperienceDelivered,
    OwnerChanged,
    RemovedFromWorld,
    TimeLimitExpired,
}

display_names!(EventKind {
    Capture => "capture",
    ObjectiveCompleted => "objective_completed",
    ObjectiveFailed => "objective_failed",
    PlayerWon => "player_won",
    PlayerLost => "player_lost",
    ExperienceGranted => "experience_granted",
    ExperienceDelivered => "experience_delivered",
    OwnerChanged => "owner_changed",
    RemovedFromWorld => "removed_from_world",
    TimeLimitExpired => "time_limit_expired",
});

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    Subject,
    Captor,
    PreviousOwner,
    NewOwner,
    Player,
    Target,
}

display_names!(ParticipantRole {
    Subject => "subject",
    Captor => "captor",
    PreviousOwner => "previous_owner",
    NewOwner => "new_owner",
    Player => "player",
    Target => "target",
});

/// Links an actor (by its stable actor id) to an audit-log event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventParticipant {
    pub event_id: u64,
    pub actor_id: u64,
    pub role: ParticipantRole,
}
