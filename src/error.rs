//! Error types for the task store.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A draft failed validation on add or save. The task list is unchanged.
    #[error("{0}")]
    InvalidDraft(String),

    /// An operation referenced a task id that does not exist.
    #[error("no task with id {0}")]
    NotFound(u64),

    /// `save_edit` was called while no task was being edited.
    #[error("no edit in progress")]
    NoActiveEdit,

    /// The storage backend failed to read or write.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Stored task data could not be parsed.
    #[error("corrupt task data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl Error {
    /// True for errors from the storage backend. A mutating operation that
    /// returns one of these has still applied its change in memory, so
    /// interactive callers downgrade it to a warning and keep going.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Storage(_) | Error::Corrupt(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
