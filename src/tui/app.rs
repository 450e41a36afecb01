//! Main application logic for the terminal user interface.
//!
//! The `App` struct owns the task store and all screen state, handles user
//! input per screen, and renders the interface. Control flow mirrors the
//! store's design: every key that mutates goes through a store operation,
//! then the visible projection is recomputed and redrawn.

use std::path::Path;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::date::format_due_relative;
use crate::error::Error;
use crate::fields::FilterMode;
use crate::storage::JsonFileStorage;
use crate::store::TaskStore;
use crate::tui::{
    colors::{ACCENT, DONE, OVERDUE},
    enums::AppState,
    form::TaskForm,
    input::InputField,
};

/// TUI state: the store plus everything about what is on screen.
pub struct App {
    state: AppState,
    store: TaskStore<JsonFileStorage>,
    table_state: TableState,
    visible_tasks: Vec<u64>,
    form: TaskForm,
    filter_mode: FilterMode,
    search_text: String,
    search_active: bool,
    status_message: String,
    pending_delete: Option<u64>,
}

impl App {
    /// Create the app, loading the task file at `db_path`.
    pub fn new(db_path: &Path) -> Self {
        let store = TaskStore::open(JsonFileStorage::new(db_path));
        let mut app = App {
            state: AppState::TaskList,
            store,
            table_state: TableState::default(),
            visible_tasks: Vec::new(),
            form: TaskForm::new(),
            filter_mode: FilterMode::All,
            search_text: String::new(),
            search_active: false,
            status_message: String::new(),
            pending_delete: None,
        };
        app.update_visible_tasks();
        app
    }

    /// Recompute the projection and restore the selection if the previously
    /// selected task is still visible.
    fn update_visible_tasks(&mut self) {
        let old_selected_id = self
            .table_state
            .selected()
            .and_then(|idx| self.visible_tasks.get(idx))
            .copied();

        self.visible_tasks = self
            .store
            .list(self.filter_mode, &self.search_text)
            .iter()
            .map(|t| t.id)
            .collect();

        let restored = old_selected_id
            .and_then(|old| self.visible_tasks.iter().position(|&id| id == old));
        self.table_state.select(match restored {
            Some(idx) => Some(idx),
            None if self.visible_tasks.is_empty() => None,
            None => Some(0),
        });
    }

    fn selected_id(&self) -> Option<u64> {
        self.table_state
            .selected()
            .and_then(|idx| self.visible_tasks.get(idx))
            .copied()
    }

    fn set_status(&mut self, msg: String) {
        self.status_message = msg;
    }

    /// Store errors become status bar text. A persistence failure is only a
    /// warning: the in-memory list is still good for this session.
    fn report_error(&mut self, e: Error) {
        if e.is_persistence() {
            self.set_status(format!("warning: change not saved: {e}"));
        } else {
            self.set_status(format!("error: {e}"));
        }
    }

    fn handle_task_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if self.search_active {
            match key {
                KeyCode::Esc => {
                    self.search_active = false;
                    self.search_text.clear();
                    self.update_visible_tasks();
                }
                KeyCode::Enter => {
                    self.search_active = false;
                    self.set_status(format!(
                        "Search '{}': {} tasks",
                        self.search_text,
                        self.visible_tasks.len()
                    ));
                }
                KeyCode::Backspace => {
                    self.search_text.pop();
                    self.update_visible_tasks();
                }
                KeyCode::Char(c) => {
                    self.search_text.push(c);
                    self.update_visible_tasks();
                }
                _ => {}
            }
            return false;
        }

        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.search_text.is_empty() {
                    return true;
                }
                self.search_text.clear();
                self.update_visible_tasks();
            }
            KeyCode::Up => {
                if let Some(selected) = self.table_state.selected() {
                    if selected > 0 {
                        self.table_state.select(Some(selected - 1));
                    }
                } else if !self.visible_tasks.is_empty() {
                    self.table_state.select(Some(0));
                }
            }
            KeyCode::Down => {
                if let Some(selected) = self.table_state.selected() {
                    if selected + 1 < self.visible_tasks.len() {
                        self.table_state.select(Some(selected + 1));
                    }
                } else if !self.visible_tasks.is_empty() {
                    self.table_state.select(Some(0));
                }
            }
            KeyCode::Char('a') => {
                self.store.begin_create();
                self.form = TaskForm::new();
                self.state = AppState::AddTask;
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    match self.store.begin_edit(id) {
                        Ok(draft) => {
                            self.form = TaskForm::from_draft(&draft);
                            self.state = AppState::EditTask;
                        }
                        Err(e) => self.report_error(e),
                    }
                }
            }
            KeyCode::Char('t') | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_id() {
                    if let Err(e) = self.store.toggle_completion(id) {
                        self.report_error(e);
                    }
                    self.update_visible_tasks();
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    self.pending_delete = Some(id);
                    self.state = AppState::ConfirmDelete;
                }
            }
            KeyCode::Char('f') => {
                self.filter_mode = self.filter_mode.next();
                self.update_visible_tasks();
                self.set_status(format!("Filter: {}", self.filter_mode.label()));
            }
            KeyCode::Char('/') => {
                self.search_active = true;
            }
            KeyCode::Char('h') => {
                self.state = AppState::Help;
            }
            _ => {}
        }
        false
    }

    fn handle_form_input(&mut self, key: KeyCode, is_edit: bool) {
        match key {
            KeyCode::Esc => {
                self.store.cancel_edit();
                self.state = AppState::TaskList;
            }
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Left => self.form.handle_left(),
            KeyCode::Right => self.form.handle_right(),
            KeyCode::Home => self.form.handle_home(),
            KeyCode::End => self.form.handle_end(),
            KeyCode::Backspace => self.form.handle_backspace(),
            KeyCode::Delete => self.form.handle_delete(),
            KeyCode::Enter => {
                let draft = self.form.to_draft();
                let result = if is_edit {
                    self.store.save_edit(draft)
                } else {
                    self.store.add_task(draft)
                };
                match result {
                    Ok(task) => {
                        self.state = AppState::TaskList;
                        self.update_visible_tasks();
                        self.set_status(format!(
                            "Task {} {}",
                            task.id,
                            if is_edit { "updated" } else { "added" }
                        ));
                    }
                    Err(e) if e.is_persistence() => {
                        // Change applied in memory; leave the form.
                        self.state = AppState::TaskList;
                        self.update_visible_tasks();
                        self.report_error(e);
                    }
                    Err(e) => self.report_error(e),
                }
            }
            KeyCode::Char(c) => self.form.handle_char(c),
            _ => {}
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(id) = self.pending_delete.take() {
                    if let Err(e) = self.store.delete_task(id) {
                        self.report_error(e);
                    } else {
                        self.set_status(format!("Task {id} deleted"));
                    }
                    self.update_visible_tasks();
                }
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_delete = None;
                self.state = AppState::TaskList;
            }
            _ => {}
        }
    }

    fn handle_input(&mut self) -> std::io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.status_message.clear();

                let should_quit = match self.state {
                    AppState::TaskList => self.handle_task_list_input(key.code, key.modifiers),
                    AppState::AddTask => {
                        self.handle_form_input(key.code, false);
                        false
                    }
                    AppState::EditTask => {
                        self.handle_form_input(key.code, true);
                        false
                    }
                    AppState::ConfirmDelete => {
                        self.handle_confirm_input(key.code);
                        false
                    }
                    AppState::Help => {
                        self.state = AppState::TaskList;
                        false
                    }
                };
                if should_quit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let today = Local::now().date_naive();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let context = format!(
            "Filter: {}   Search: {}",
            self.filter_mode.label(),
            if self.search_text.is_empty() {
                "-"
            } else {
                self.search_text.as_str()
            }
        );
        let header_text = vec![Line::from(vec![
            Span::styled("TASKS", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                context,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];
        let header_block = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, chunks[0]);

        let header_cells = ["ID", "Done", "Due", "Title", "Description"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(ACCENT).fg(Color::White))
            .height(1);

        let rows: Vec<Row> = self
            .visible_tasks
            .iter()
            .filter_map(|&id| self.store.get(id))
            .map(|task| {
                let overdue = !task.completed && task.due_date < today;
                let style = if task.completed {
                    Style::default().fg(DONE)
                } else if overdue {
                    Style::default().fg(OVERDUE).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                Row::new(vec![
                    Cell::from(task.id.to_string()),
                    Cell::from(if task.completed { "x" } else { "-" }),
                    Cell::from(format_due_relative(task.due_date, today)),
                    Cell::from(task.title.clone()),
                    Cell::from(task.description.clone()),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(6),  // ID
            Constraint::Length(4),  // Done
            Constraint::Length(10), // Due
            Constraint::Min(24),    // Title
            Constraint::Min(20),    // Description
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Tasks ({}/{}) - Press 'h' for help",
                self.visible_tasks.len(),
                self.store.tasks().len()
            )))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, chunks[1], &mut self.table_state);
    }

    fn render_field(f: &mut Frame, area: Rect, field: &InputField, label: &str) {
        let border_style = if field.active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let widget = Paragraph::new(field.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(label)
                .border_style(border_style),
        );
        f.render_widget(widget, area);
        if field.active {
            f.set_cursor_position((area.x + 1 + field.cursor_column() as u16, area.y + 1));
        }
    }

    fn render_task_form(&mut self, f: &mut Frame, area: Rect) {
        // The store's form state, not the screen state, decides the
        // affordance: Save while a task is under edit, Add otherwise.
        let is_edit = self.store.form().is_editing();
        let popup = centered_rect(60, area);
        f.render_widget(Clear, popup);

        let title = if is_edit { "Edit Task" } else { "Add Task" };
        let outer = Block::default().borders(Borders::ALL).title(title);
        let inner = outer.inner(popup);
        f.render_widget(outer, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // title
                Constraint::Length(3), // description
                Constraint::Length(3), // due date
                Constraint::Length(2), // hint
                Constraint::Min(0),
            ])
            .split(inner);

        Self::render_field(f, chunks[0], &self.form.title, "Title (required)");
        Self::render_field(f, chunks[1], &self.form.description, "Description");
        Self::render_field(
            f,
            chunks[2],
            &self.form.due,
            "Due date (required, e.g. 2024-09-01, today, in 3d)",
        );

        let hint = if is_edit {
            "Enter: Save   Esc: Cancel   Tab: Next field"
        } else {
            "Enter: Add   Esc: Cancel   Tab: Next field"
        };
        let hint = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint, chunks[3]);
    }

    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let title = self
            .pending_delete
            .and_then(|id| self.store.get(id))
            .map(|t| t.title.clone())
            .unwrap_or_default();

        let popup = centered_rect(50, area);
        f.render_widget(Clear, popup);
        let text = vec![
            Line::from(""),
            Line::from(format!("Delete '{title}'?")),
            Line::from(""),
            Line::from("Press Y to confirm, N or Esc to cancel"),
        ];
        let confirmation = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Delete Task")
                    .border_style(Style::default().fg(Color::Red)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(confirmation, popup);
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let text = vec![
            Line::from(Span::styled(
                "Keys",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("  up/down   select task"),
            Line::from("  a         add task"),
            Line::from("  e         edit selected task"),
            Line::from("  t, space  toggle completed"),
            Line::from("  d         delete selected task"),
            Line::from("  f         cycle filter (All / Completed / Pending)"),
            Line::from("  /         search titles"),
            Line::from("  q, Esc    quit"),
            Line::from(""),
            Line::from("Press any key to return"),
        ];
        let help = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .alignment(Alignment::Left);
        f.render_widget(help, area);
    }

    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.search_active {
            format!("Search: {}_ (Enter to keep, Esc to clear)", self.search_text)
        } else {
            match self.state {
                AppState::TaskList => format!(
                    "{} of {} tasks | a add, e edit, t toggle, d delete, f filter, / search, h help",
                    self.visible_tasks.len(),
                    self.store.tasks().len()
                ),
                AppState::AddTask => "Add Task".to_string(),
                AppState::EditTask => "Edit Task".to_string(),
                AppState::ConfirmDelete => "Confirm Deletion".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(ACCENT).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
            .split(f.area());

        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[0]),
            AppState::AddTask | AppState::EditTask => {
                self.render_task_list(f, chunks[0]);
                self.render_task_form(f, chunks[0]);
            }
            AppState::ConfirmDelete => {
                self.render_task_list(f, chunks[0]);
                self.render_confirm(f, chunks[0]);
            }
            AppState::Help => self.render_help(f, chunks[0]),
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop: render, then process input, until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> std::io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

/// A centered rectangle of the given percentage width, tall enough for the
/// form and confirm popups.
fn centered_rect(percent_x: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Length(16),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
