//! Persistence backends for the task list.
//!
//! The store never touches the filesystem directly; it goes through the
//! `TaskStorage` trait, so tests run against an in-memory backend and the
//! binary against a JSON file.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

use crate::error::Result;
use crate::task::Task;

/// Load and save of the whole task sequence, in insertion order.
///
/// The sequence is the unit of persistence: `save` replaces everything
/// previously stored.
pub trait TaskStorage {
    fn load(&self) -> Result<Vec<Task>>;
    fn save(&self, tasks: &[Task]) -> Result<()>;
}

/// JSON file backend. The file holds a flat array of task objects, the same
/// shape the original browser widget kept in local storage.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }
}

impl TaskStorage for JsonFileStorage {
    /// A missing file is an empty task list, not an error.
    fn load(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut buf = String::new();
        File::open(&self.path)?.read_to_string(&mut buf)?;
        Ok(serde_json::from_str(&buf)?)
    }

    /// Atomic-ish write via temp file + rename.
    fn save(&self, tasks: &[Task]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(tasks)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory backend for tests. Clones share the same underlying list, so a
/// test can keep a handle while the store owns another.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryStorage {
    tasks: std::rc::Rc<std::cell::RefCell<Vec<Task>>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        MemoryStorage {
            tasks: std::rc::Rc::new(std::cell::RefCell::new(tasks)),
        }
    }

    /// Copy of what has been saved so far.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }
}

#[cfg(test)]
impl TaskStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.borrow().clone())
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        *self.tasks.borrow_mut() = tasks.to_vec();
        Ok(())
    }
}
