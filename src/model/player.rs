use serde::{Deserialize, Serialize};

/// Outcome of the match for one player. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinState {
    #[default]
    Undefined,
    Won,
    Lost,
}

display_names!(WinState {
    Undefined => "undefined",
    Won => "won",
    Lost => "lost",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveState {
    #[default]
    Incomplete,
    Completed,
    Failed,
}

display_names!(ObjectiveState {
    Incomplete => "incomplete",
    Completed => "completed",
    Failed => "failed",
});

/// Primary objectives decide the match; secondary ones are informational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveType {
    #[default]
    Primary,
    Secondary,
}

display_names!(ObjectiveType {
    Primary => "primary",
    Secondary => "secondary",
});
