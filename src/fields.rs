//! Field enums shared by the CLI and the TUI.

use clap::ValueEnum;

/// Which completion states the task projection keeps.
///
/// UI-only state: never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FilterMode {
    #[default]
    All,
    Completed,
    Pending,
}

impl FilterMode {
    /// Cycle order used by the TUI filter key.
    pub fn next(self) -> Self {
        match self {
            FilterMode::All => FilterMode::Completed,
            FilterMode::Completed => FilterMode::Pending,
            FilterMode::Pending => FilterMode::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::All => "All",
            FilterMode::Completed => "Completed",
            FilterMode::Pending => "Pending",
        }
    }
}
