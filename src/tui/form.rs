//! Add/edit form state for the TUI.
//!
//! Three input fields mirroring a `Draft`, one active at a time. The form is
//! the live copy of what the user is typing; it becomes a `Draft` when
//! submitted to the store.

use crate::task::Draft;
use crate::tui::input::InputField;

pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const DUE_FIELD: usize = 2;
const FIELD_COUNT: usize = 3;

pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub due: InputField,
    pub current_field: usize,
}

impl TaskForm {
    /// Empty form for creating a task.
    pub fn new() -> Self {
        Self::from_draft(&Draft::default())
    }

    /// Form pre-populated from a draft, for editing.
    pub fn from_draft(draft: &Draft) -> Self {
        let mut form = TaskForm {
            title: InputField::with_value(&draft.title),
            description: InputField::with_value(&draft.description),
            due: InputField::with_value(&draft.due_date),
            current_field: TITLE_FIELD,
        };
        form.update_active_field();
        form
    }

    /// The draft this form currently describes.
    pub fn to_draft(&self) -> Draft {
        Draft {
            title: self.title.value.clone(),
            description: self.description.value.clone(),
            due_date: self.due.value.clone(),
        }
    }

    fn current_mut(&mut self) -> &mut InputField {
        match self.current_field {
            DESCRIPTION_FIELD => &mut self.description,
            DUE_FIELD => &mut self.due,
            _ => &mut self.title,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            FIELD_COUNT - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    fn update_active_field(&mut self) {
        self.title.active = self.current_field == TITLE_FIELD;
        self.description.active = self.current_field == DESCRIPTION_FIELD;
        self.due.active = self.current_field == DUE_FIELD;
    }

    pub fn handle_char(&mut self, c: char) {
        self.current_mut().insert_char(c);
    }

    pub fn handle_backspace(&mut self) {
        self.current_mut().backspace();
    }

    pub fn handle_delete(&mut self) {
        self.current_mut().delete();
    }

    pub fn handle_left(&mut self) {
        self.current_mut().move_left();
    }

    pub fn handle_right(&mut self) {
        self.current_mut().move_right();
    }

    pub fn handle_home(&mut self) {
        self.current_mut().move_home();
    }

    pub fn handle_end(&mut self) {
        self.current_mut().move_end();
    }
}
