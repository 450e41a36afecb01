//! Task data structure and the transient form draft.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single unit of work.
///
/// Serialized field names follow the historical on-disk format (`dueDate`,
/// `createdAt`), so task files written by earlier versions of this tool load
/// unchanged. `id` and `created_at` are assigned once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Unsaved form input for a task being created or edited.
///
/// The due date stays raw text until validation so a form can hold partially
/// typed input. Not persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub due_date: String,
}

impl Draft {
    /// Draft pre-filled from an existing task, for editing.
    pub fn from_task(task: &Task) -> Self {
        Draft {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Task {
        Task {
            id: 3,
            title: "Buy Milk".into(),
            description: "two litres".into(),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            completed: false,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn serializes_with_historical_field_names() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"dueDate\":\"2024-01-01\""));
        assert!(json.contains("\"createdAt\""));
        assert!(!json.contains("due_date"));
    }

    #[test]
    fn reads_tasks_written_by_the_original_widget() {
        // Millisecond-timestamp id and fractional-seconds createdAt, exactly
        // as the browser version wrote them.
        let json = r#"{
            "id": 1700000000000,
            "title": "Buy Milk",
            "description": "",
            "dueDate": "2024-01-01",
            "completed": true,
            "createdAt": "2023-11-14T22:13:20.000Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, 1_700_000_000_000);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(task.completed);
    }

    #[test]
    fn round_trip_preserves_equality() {
        let task = sample();
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(task, back);
    }

    #[test]
    fn draft_from_task_renders_due_date_as_iso() {
        let draft = Draft::from_task(&sample());
        assert_eq!(draft.due_date, "2024-01-01");
        assert_eq!(draft.title, "Buy Milk");
    }
}
