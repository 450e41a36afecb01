//! The task store: authoritative task list, form state machine, and the
//! filter/search projection.

use chrono::{NaiveDate, Utc};

use crate::date::parse_due_input;
use crate::error::{Error, Result};
use crate::fields::FilterMode;
use crate::storage::TaskStorage;
use crate::task::{Draft, Task};

/// What the add/edit form is currently bound to.
///
/// At most one task can be in edit mode; the pointer and its draft travel
/// together so "editing" cannot exist without knowing which task.
#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Idle,
    Creating(Draft),
    Editing { id: u64, draft: Draft },
}

impl FormState {
    pub fn is_editing(&self) -> bool {
        matches!(self, FormState::Editing { .. })
    }
}

/// The authoritative task list plus the pending form draft.
///
/// Every mutation writes the whole list through to the storage backend
/// immediately. A failed write leaves the mutation applied: the in-memory
/// list stays the source of truth for the session and the storage error is
/// returned for the caller to surface (see `Error::is_persistence`).
pub struct TaskStore<S: TaskStorage> {
    tasks: Vec<Task>,
    form: FormState,
    storage: S,
}

impl<S: TaskStorage> TaskStore<S> {
    /// Read the persisted task list — the only read from storage. A backend
    /// with nothing stored yields an empty store; an unreadable one degrades
    /// to empty with a warning on stderr.
    pub fn open(storage: S) -> Self {
        let tasks = match storage.load() {
            Ok(tasks) => tasks,
            Err(e) => {
                eprintln!("warning: could not read stored tasks, starting empty: {e}");
                Vec::new()
            }
        };
        TaskStore {
            tasks,
            form: FormState::Idle,
            storage,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Next fresh id: max-plus-one, so two rapid adds can never collide.
    /// Millisecond-timestamp ids loaded from files written by the original
    /// widget simply push the counter past themselves.
    fn next_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Title and due date are required; the due date must also parse.
    fn validate(draft: &Draft) -> Result<NaiveDate> {
        if draft.title.trim().is_empty() {
            return Err(Error::InvalidDraft("title is required".into()));
        }
        if draft.due_date.trim().is_empty() {
            return Err(Error::InvalidDraft("due date is required".into()));
        }
        parse_due_input(&draft.due_date).ok_or_else(|| {
            Error::InvalidDraft(format!(
                "unrecognised due date '{}'",
                draft.due_date.trim()
            ))
        })
    }

    /// Enter create mode with an empty draft.
    pub fn begin_create(&mut self) {
        self.form = FormState::Creating(Draft::default());
    }

    /// Append a new task built from `draft` and return it. Fails validation
    /// without touching the list; on success the form returns to idle.
    pub fn add_task(&mut self, draft: Draft) -> Result<Task> {
        let due_date = Self::validate(&draft)?;
        let task = Task {
            id: self.next_id(),
            title: draft.title.trim().to_string(),
            description: draft.description,
            due_date,
            completed: false,
            created_at: Utc::now(),
        };
        self.tasks.push(task.clone());
        self.form = FormState::Idle;
        self.persist()?;
        Ok(task)
    }

    /// Flip `completed` on the task with this id, preserving its position
    /// and every other field.
    pub fn toggle_completion(&mut self, id: u64) -> Result<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::NotFound(id))?;
        task.completed = !task.completed;
        self.persist()
    }

    /// Remove the task with this id. Removing an absent id is a no-op.
    pub fn delete_task(&mut self, id: u64) -> Result<()> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(());
        }
        self.persist()
    }

    /// Copy the task's fields into a fresh draft and enter edit mode.
    pub fn begin_edit(&mut self, id: u64) -> Result<Draft> {
        let task = self.get(id).ok_or(Error::NotFound(id))?;
        let draft = Draft::from_task(task);
        self.form = FormState::Editing {
            id,
            draft: draft.clone(),
        };
        Ok(draft)
    }

    /// Apply `draft` to the task under edit, leaving id, completion state
    /// and creation time untouched. Same validation as `add_task`; a
    /// validation failure keeps the edit in progress.
    pub fn save_edit(&mut self, draft: Draft) -> Result<Task> {
        let id = match self.form {
            FormState::Editing { id, .. } => id,
            _ => return Err(Error::NoActiveEdit),
        };
        let due_date = Self::validate(&draft)?;
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::NotFound(id))?;
        task.title = draft.title.trim().to_string();
        task.description = draft.description;
        task.due_date = due_date;
        let task = task.clone();
        self.form = FormState::Idle;
        self.persist()?;
        Ok(task)
    }

    /// Drop the pending draft without mutating any task.
    pub fn cancel_edit(&mut self) {
        self.form = FormState::Idle;
    }

    /// The projection: filter by completion state, then case-insensitive
    /// substring match of `search` against the title only. Insertion order
    /// is preserved; recomputed on every call.
    pub fn list(&self, filter: FilterMode, search: &str) -> Vec<&Task> {
        let needle = search.to_lowercase();
        self.tasks
            .iter()
            .filter(|t| match filter {
                FilterMode::All => true,
                FilterMode::Completed => t.completed,
                FilterMode::Pending => !t.completed,
            })
            .filter(|t| needle.is_empty() || t.title.to_lowercase().contains(&needle))
            .collect()
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(&self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn draft(title: &str, due: &str) -> Draft {
        Draft {
            title: title.into(),
            description: String::new(),
            due_date: due.into(),
        }
    }

    fn store_with(titles_done: &[(&str, bool)]) -> TaskStore<MemoryStorage> {
        let mut store = TaskStore::open(MemoryStorage::new());
        for (title, done) in titles_done {
            let task = store.add_task(draft(title, "2024-01-01")).unwrap();
            if *done {
                store.toggle_completion(task.id).unwrap();
            }
        }
        store
    }

    #[test]
    fn add_rejects_empty_title() {
        let mut store = TaskStore::open(MemoryStorage::new());
        let err = store.add_task(draft("  ", "2024-01-01")).unwrap_err();
        assert!(matches!(err, Error::InvalidDraft(_)));
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn add_rejects_empty_or_invalid_due_date() {
        let mut store = TaskStore::open(MemoryStorage::new());
        assert!(matches!(
            store.add_task(draft("A", "")),
            Err(Error::InvalidDraft(_))
        ));
        assert!(matches!(
            store.add_task(draft("A", "someday")),
            Err(Error::InvalidDraft(_))
        ));
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn add_appends_a_pending_task_with_fresh_id() {
        let mut store = TaskStore::open(MemoryStorage::new());
        let task = store
            .add_task(Draft {
                title: "A".into(),
                description: String::new(),
                due_date: "2024-01-01".into(),
            })
            .unwrap();
        assert_eq!(store.tasks().len(), 1);
        assert!(!task.completed);
        assert_eq!(task.due_date.to_string(), "2024-01-01");

        let second = store.add_task(draft("B", "2024-01-02")).unwrap();
        assert!(second.id > task.id);
        assert_eq!(store.form(), &FormState::Idle);
    }

    #[test]
    fn ids_stay_monotonic_past_legacy_timestamp_ids() {
        let legacy = Task {
            id: 1_700_000_000_000,
            title: "old".into(),
            description: String::new(),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            completed: false,
            created_at: Utc::now(),
        };
        let mut store = TaskStore::open(MemoryStorage::with_tasks(vec![legacy]));
        let task = store.add_task(draft("new", "2024-01-01")).unwrap();
        assert_eq!(task.id, 1_700_000_000_001);
    }

    #[test]
    fn toggle_twice_restores_original_state() {
        let mut store = store_with(&[("A", false)]);
        let id = store.tasks()[0].id;
        let original = store.get(id).unwrap().clone();

        store.toggle_completion(id).unwrap();
        assert!(store.get(id).unwrap().completed);
        store.toggle_completion(id).unwrap();
        assert_eq!(store.get(id).unwrap(), &original);
    }

    #[test]
    fn toggle_unknown_id_reports_not_found() {
        let mut store = store_with(&[("A", false)]);
        assert!(matches!(
            store.toggle_completion(999),
            Err(Error::NotFound(999))
        ));
    }

    #[test]
    fn delete_is_an_idempotent_no_op_for_unknown_ids() {
        let mut store = store_with(&[("A", false), ("B", true)]);
        let before: Vec<Task> = store.tasks().to_vec();
        store.delete_task(999).unwrap();
        assert_eq!(store.tasks(), before.as_slice());

        let id = before[0].id;
        store.delete_task(id).unwrap();
        store.delete_task(id).unwrap();
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn begin_then_cancel_leaves_the_task_untouched() {
        let mut store = store_with(&[("A", false)]);
        let id = store.tasks()[0].id;
        let original = store.get(id).unwrap().clone();

        let draft = store.begin_edit(id).unwrap();
        assert_eq!(draft.title, "A");
        assert!(store.form().is_editing());

        store.cancel_edit();
        assert_eq!(store.form(), &FormState::Idle);
        assert_eq!(store.get(id).unwrap(), &original);
    }

    #[test]
    fn begin_edit_unknown_id_reports_not_found() {
        let mut store = store_with(&[("A", false)]);
        assert!(matches!(store.begin_edit(42), Err(Error::NotFound(42))));
        assert_eq!(store.form(), &FormState::Idle);
    }

    #[test]
    fn save_edit_replaces_exactly_the_draft_fields() {
        let mut store = store_with(&[("A", true)]);
        let id = store.tasks()[0].id;
        let original = store.get(id).unwrap().clone();

        store.begin_edit(id).unwrap();
        let saved = store
            .save_edit(Draft {
                title: "New title".into(),
                description: "new words".into(),
                due_date: "2025-03-03".into(),
            })
            .unwrap();

        assert_eq!(saved.title, "New title");
        assert_eq!(saved.description, "new words");
        assert_eq!(saved.due_date.to_string(), "2025-03-03");
        assert_eq!(saved.id, original.id);
        assert_eq!(saved.completed, original.completed);
        assert_eq!(saved.created_at, original.created_at);
        assert_eq!(store.form(), &FormState::Idle);
    }

    #[test]
    fn save_edit_validation_failure_keeps_the_edit_open() {
        let mut store = store_with(&[("A", false)]);
        let id = store.tasks()[0].id;
        store.begin_edit(id).unwrap();

        let err = store.save_edit(draft("", "2024-01-01")).unwrap_err();
        assert!(matches!(err, Error::InvalidDraft(_)));
        assert!(store.form().is_editing());
        assert_eq!(store.get(id).unwrap().title, "A");
    }

    #[test]
    fn save_edit_without_begin_reports_no_active_edit() {
        let mut store = store_with(&[("A", false)]);
        assert!(matches!(
            store.save_edit(draft("X", "2024-01-01")),
            Err(Error::NoActiveEdit)
        ));
    }

    #[test]
    fn save_edit_after_target_deleted_reports_not_found() {
        let mut store = store_with(&[("A", false)]);
        let id = store.tasks()[0].id;
        store.begin_edit(id).unwrap();
        store.delete_task(id).unwrap();
        assert!(matches!(
            store.save_edit(draft("X", "2024-01-01")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn filter_modes_partition_in_original_order() {
        let store = store_with(&[("one", true), ("two", false), ("three", true)]);

        let completed = store.list(FilterMode::Completed, "");
        let titles: Vec<&str> = completed.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["one", "three"]);

        let pending = store.list(FilterMode::Pending, "");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "two");

        assert_eq!(store.list(FilterMode::All, "").len(), 3);
    }

    #[test]
    fn search_matches_title_only_case_insensitively() {
        let mut store = TaskStore::open(MemoryStorage::new());
        store
            .add_task(Draft {
                title: "Buy Milk".into(),
                description: "from the corner shop".into(),
                due_date: "2024-01-01".into(),
            })
            .unwrap();

        assert_eq!(store.list(FilterMode::All, "milk").len(), 1);
        assert_eq!(store.list(FilterMode::All, "BUY").len(), 1);
        // Matches the description, not the title: excluded.
        assert_eq!(store.list(FilterMode::All, "corner").len(), 0);
        assert_eq!(store.list(FilterMode::All, "").len(), 1);
    }

    #[test]
    fn every_mutation_writes_through() {
        let storage = MemoryStorage::new();
        let mut store = TaskStore::open(storage.clone());

        let a = store.add_task(draft("A", "2024-01-01")).unwrap();
        let b = store.add_task(draft("B", "2024-01-01")).unwrap();
        assert_eq!(storage.snapshot().len(), 2);

        store.toggle_completion(a.id).unwrap();
        assert!(storage.snapshot()[0].completed);

        store.begin_edit(b.id).unwrap();
        store.save_edit(draft("B2", "2024-02-02")).unwrap();
        assert_eq!(storage.snapshot()[1].title, "B2");

        store.delete_task(a.id).unwrap();
        assert_eq!(storage.snapshot().len(), 1);

        // A fresh store over the same backend observes everything.
        let reopened = TaskStore::open(storage);
        assert_eq!(reopened.tasks().len(), 1);
        assert_eq!(reopened.tasks()[0].title, "B2");
    }
}
