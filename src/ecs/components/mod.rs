pub mod capture;
pub mod common;
pub mod player;
pub mod units;
pub mod victory;

pub use capture::{OwnershipDecision, ProximityCaptor, ProximityCapturable};
pub use common::{CenterPosition, Owner, SimActor, StrategicPoint};
pub use player::{MissionObjectives, Objective, PlayerCore, PlayerExperience, WinStatus};
pub use units::{DeliversExperience, GainsExperience, MustBeDestroyed, OwnerLostAction};
pub use victory::DominationVictoryConditions;
