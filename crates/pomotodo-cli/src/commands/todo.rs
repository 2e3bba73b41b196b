//! To-do list commands for CLI.

use clap::Subcommand;
use pomotodo_core::storage::Database;
use pomotodo_core::{Todo, TodoList};

#[derive(Subcommand)]
pub enum TodoAction {
    /// Add a to-do
    Add {
        /// To-do text (surrounding whitespace is trimmed)
        text: String,
    },
    /// List to-dos, newest first
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Flip the completed flag
    Toggle {
        /// To-do ID or a unique prefix of it
        id: String,
    },
    /// Replace the text of a to-do
    Edit {
        /// To-do ID or a unique prefix of it
        id: String,
        /// New text
        text: String,
    },
    /// Delete a to-do
    Delete {
        /// To-do ID or a unique prefix of it
        id: String,
    },
}

/// Resolve a full ID from `prefix` against the listed records.
fn resolve(items: &[Todo], prefix: &str) -> Result<String, String> {
    let mut matches = items.iter().filter(|t| t.id.starts_with(prefix));
    match (matches.next(), matches.next()) {
        (Some(todo), None) => Ok(todo.id.clone()),
        (None, _) => Err(format!("to-do not found: {prefix}")),
        (Some(_), Some(_)) => Err(format!("ambiguous to-do id: {prefix}")),
    }
}

fn line(todo: &Todo) -> String {
    let mark = if todo.completed { "x" } else { " " };
    let short: String = todo.id.chars().take(8).collect();
    format!("[{mark}] {short}  {}", todo.text)
}

pub fn run(action: TodoAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut list = TodoList::new(Database::open()?);
    list.fetch()?;

    match action {
        TodoAction::Add { text } => match list.add(&text)? {
            Some(todo) => println!("{}", line(todo)),
            None => return Err("to-do text is empty".into()),
        },
        TodoAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(list.items())?);
            } else if list.items().is_empty() {
                println!("no to-dos");
            } else {
                for todo in list.items() {
                    println!("{}", line(todo));
                }
                println!(
                    "{}/{} done ({:.0}%)",
                    list.completed_count(),
                    list.items().len(),
                    list.progress_pct()
                );
            }
        }
        TodoAction::Toggle { id } => {
            let id = resolve(list.items(), &id)?;
            println!("{}", line(list.toggle(&id)?));
        }
        TodoAction::Edit { id, text } => {
            let id = resolve(list.items(), &id)?;
            match list.edit(&id, &text)? {
                Some(todo) => println!("{}", line(todo)),
                None => println!("text is empty; to-do left unchanged"),
            }
        }
        TodoAction::Delete { id } => {
            let id = resolve(list.items(), &id)?;
            list.delete(&id)?;
            println!("deleted: {id}");
        }
    }
    Ok(())
}
