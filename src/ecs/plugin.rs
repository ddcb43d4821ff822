use bevy_app::{App, Plugin};

use super::systems::capture::CapturePlugin;
use super::systems::domination::DominationPlugin;

/// Aggregate plugin that installs the capture and domination systems.
pub struct SimPlugin;

impl Plugin for SimPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((CapturePlugin, DominationPlugin));
    }
}
