//! Screen states for the terminal user interface.

/// Which screen the TUI is showing.
#[derive(Clone, Copy, PartialEq)]
pub enum AppState {
    TaskList,
    AddTask,
    EditTask,
    ConfirmDelete,
    Help,
}
