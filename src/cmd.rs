//! Command implementations for the CLI interface.

use std::path::Path;

use chrono::Local;
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::date::format_due_relative;
use crate::error::Error;
use crate::fields::FilterMode;
use crate::storage::JsonFileStorage;
use crate::store::TaskStore;
use crate::task::{Draft, Task};
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI.
    Ui,

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "in Nd" or "in Nw".
        #[arg(long)]
        due: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
    },

    /// List tasks with optional filtering and title search.
    List {
        /// Which completion states to show.
        #[arg(long, value_enum, default_value_t = FilterMode::All)]
        filter: FilterMode,
        /// Case-insensitive substring match on the title.
        #[arg(long)]
        search: Option<String>,
    },

    /// View every field of a single task.
    View {
        /// Task id to view.
        id: u64,
    },

    /// Toggle a task between pending and completed.
    Toggle {
        /// Task id to toggle.
        id: u64,
    },

    /// Edit fields on a task. Unspecified fields keep their values.
    Edit {
        /// Task id to edit.
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "in Nd" or "in Nw".
        #[arg(long)]
        due: Option<String>,
    },

    /// Delete a task.
    Delete {
        /// Task id to delete.
        id: u64,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

type Store = TaskStore<JsonFileStorage>;

/// Print the error and exit non-zero. A persistence error means the change
/// was applied in memory only, which for a one-shot process means lost, so
/// it still fails the command.
fn fail(e: Error) -> ! {
    if e.is_persistence() {
        eprintln!("error: change was not saved: {e}");
    } else {
        eprintln!("error: {e}");
    }
    std::process::exit(1);
}

/// Launch the terminal user interface.
pub fn cmd_ui(db_path: &Path) {
    if let Err(e) = run_tui(db_path) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task.
pub fn cmd_add(store: &mut Store, title: String, due: String, desc: Option<String>) {
    let draft = Draft {
        title,
        description: desc.unwrap_or_default(),
        due_date: due,
    };
    match store.add_task(draft) {
        Ok(task) => println!("Added task {}", task.id),
        Err(e) => fail(e),
    }
}

/// List tasks through the filter/search projection.
pub fn cmd_list(store: &Store, filter: FilterMode, search: Option<String>) {
    let search = search.unwrap_or_default();
    let tasks = store.list(filter, &search);
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    print_table(&tasks);
}

/// Print every field of one task.
pub fn cmd_view(store: &Store, id: u64) {
    let task = match store.get(id) {
        Some(task) => task,
        None => fail(Error::NotFound(id)),
    };
    let today = Local::now().date_naive();
    println!("ID:          {}", task.id);
    println!("Title:       {}", task.title);
    println!(
        "Description: {}",
        if task.description.is_empty() {
            "-"
        } else {
            task.description.as_str()
        }
    );
    println!(
        "Due:         {} ({})",
        task.due_date,
        format_due_relative(task.due_date, today)
    );
    println!(
        "Status:      {}",
        if task.completed { "completed" } else { "pending" }
    );
    println!("Created:     {}", task.created_at.to_rfc3339());
}

/// Flip completion on a task.
pub fn cmd_toggle(store: &mut Store, id: u64) {
    match store.toggle_completion(id) {
        Ok(()) => {
            let state = store
                .get(id)
                .map(|t| if t.completed { "completed" } else { "pending" })
                .unwrap_or("gone");
            println!("Task {id} is now {state}");
        }
        Err(e) => fail(e),
    }
}

/// Edit a task by driving the store's edit cycle: begin, merge the given
/// overrides into the draft, save.
pub fn cmd_edit(
    store: &mut Store,
    id: u64,
    title: Option<String>,
    desc: Option<String>,
    due: Option<String>,
) {
    let mut draft = match store.begin_edit(id) {
        Ok(draft) => draft,
        Err(e) => fail(e),
    };
    if let Some(title) = title {
        draft.title = title;
    }
    if let Some(desc) = desc {
        draft.description = desc;
    }
    if let Some(due) = due {
        draft.due_date = due;
    }
    match store.save_edit(draft) {
        Ok(task) => println!("Updated task {}", task.id),
        Err(e) => fail(e),
    }
}

/// Delete a task. Deleting an unknown id is a quiet no-op.
pub fn cmd_delete(store: &mut Store, id: u64) {
    match store.delete_task(id) {
        Ok(()) => println!("Deleted task {id}"),
        Err(e) => fail(e),
    }
}

/// Generate shell completions on stdout.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;

    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Print tasks in a formatted table.
fn print_table(tasks: &[&Task]) {
    println!(
        "{:<6} {:<5} {:<10} {:<30} {}",
        "ID", "Done", "Due", "Title", "Description"
    );
    let today = Local::now().date_naive();
    for t in tasks {
        println!(
            "{:<6} {:<5} {:<10} {:<30} {}",
            t.id,
            if t.completed { "x" } else { "-" },
            format_due_relative(t.due_date, today),
            truncate(&t.title, 30),
            truncate(&t.description, 40),
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
