//! # tm — personal task manager
//!
//! A small file-backed task manager: create, edit, filter, search, complete
//! and delete tasks, with the list persisted to a local JSON file after
//! every change.
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task
//! tm add "Renew passport" --due 2024-09-01 --desc "photos first"
//!
//! # Natural short forms work for due dates
//! tm add "Water the plants" --due tomorrow
//!
//! # List, search, filter
//! tm list
//! tm list --filter pending --search passport
//!
//! # Complete, edit, delete
//! tm toggle 3
//! tm edit 3 --due "in 2w"
//! tm delete 3
//!
//! # Or do all of it interactively
//! tm ui
//! ```
//!
//! Tasks live in `~/.tm/tasks.json` (override with `--db`) as a flat JSON
//! array, the same shape the original browser version of this tool kept in
//! local storage, so old task files keep working.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod date;
pub mod error;
pub mod fields;
pub mod storage;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod form;
    pub mod input;
    pub mod run;
}

use cli::Cli;
use cmd::Commands;
use storage::JsonFileStorage;
use store::TaskStore;

fn main() {
    let cli = Cli::parse();

    let db_path = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".tm").join("tasks.json")
    });

    // Commands that never open the store.
    match &cli.command {
        Commands::Completions { shell } => {
            cmd::cmd_completions(*shell);
            return;
        }
        Commands::Ui => {
            cmd::cmd_ui(&db_path);
            return;
        }
        _ => {}
    }

    let mut store = TaskStore::open(JsonFileStorage::new(&db_path));

    match cli.command {
        Commands::Ui | Commands::Completions { .. } => unreachable!("handled above"),
        Commands::Add { title, due, desc } => cmd::cmd_add(&mut store, title, due, desc),
        Commands::List { filter, search } => cmd::cmd_list(&store, filter, search),
        Commands::View { id } => cmd::cmd_view(&store, id),
        Commands::Toggle { id } => cmd::cmd_toggle(&mut store, id),
        Commands::Edit {
            id,
            title,
            desc,
            due,
        } => cmd::cmd_edit(&mut store, id, title, desc, due),
        Commands::Delete { id } => cmd::cmd_delete(&mut store, id),
    }
}
