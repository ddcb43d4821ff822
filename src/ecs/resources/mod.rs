pub mod actor_registry;
pub mod event_log;
pub mod feedback;
pub mod game_mode;
pub mod sim_resources;

pub use actor_registry::ActorRegistry;
pub use event_log::{EcsEvent, EventLog};
pub use feedback::{Feedback, FeedbackOutbox};
pub use game_mode::ActiveGameMode;
pub use sim_resources::{ActorIdGenerator, EcsIdGenerator, LocalPlayer, TeamScores, TimeLimit};
