use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use crate::app::{App, BoardView};
use crate::cli::Commands;
use crate::config::Theme;
use crate::model::{Color, NoteId, TaskId};
use crate::storage::KeyValueStore;

#[derive(Args, Debug, Clone)]
pub struct NewArgs {
    /// Title for the note; may be omitted when tasks are given
    #[arg(default_value = "")]
    pub title: String,
    /// Task to add (repeatable)
    #[arg(short, long = "task")]
    pub tasks: Vec<String>,
    /// Color tag (white, red, orange, yellow, green, teal, blue, purple, pink, gray)
    #[arg(short, long)]
    pub color: Option<Color>,
}

#[derive(Args, Debug, Clone)]
pub struct NoteArgs {
    /// Note identifier
    pub note_id: NoteId,
}

#[derive(Args, Debug, Clone)]
pub struct TaskArgs {
    /// Note identifier
    pub note_id: NoteId,
    /// Task identifier
    pub task_id: TaskId,
}

#[derive(Args, Debug, Clone)]
pub struct TaskTextArgs {
    /// Note identifier
    pub note_id: NoteId,
    /// Task text (whitespace trimmed)
    pub text: String,
}

#[derive(Args, Debug, Clone)]
pub struct EditTaskArgs {
    /// Note identifier
    pub note_id: NoteId,
    /// Task identifier
    pub task_id: TaskId,
    /// Replacement text; blank text keeps the current one
    pub text: String,
}

#[derive(Args, Debug, Clone)]
pub struct RenameArgs {
    /// Note identifier
    pub note_id: NoteId,
    /// New title; blank becomes "Untitled"
    #[arg(default_value = "")]
    pub title: String,
}

#[derive(Args, Debug, Clone)]
pub struct ColorArgs {
    /// Note identifier
    pub note_id: NoteId,
    /// Color tag
    pub color: Color,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Notes to delete
    #[arg(required = true)]
    pub note_ids: Vec<NoteId>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ThemeCommand {
    /// Print the current theme
    Show,
    /// Switch to the next theme (light, dark, cream)
    Cycle,
    /// Switch to a specific theme
    Set { theme: Theme },
}

#[derive(Args, Debug, Clone)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: Option<ThemeCommand>,
}

pub fn execute<S: KeyValueStore>(app: &mut App<S>, command: Commands) -> Result<String> {
    match command {
        Commands::List => Ok(format_board(&app.view())),
        Commands::New(args) => new_note(app, args),
        Commands::Toggle(args) => {
            let changed = app
                .toggle_task(args.note_id, args.task_id)
                .context("saving task state")?;
            Ok(report(changed, "Toggled task", &args.note_id))
        }
        Commands::ToggleAll(args) => {
            let changed = app
                .toggle_all_tasks(args.note_id)
                .context("saving task states")?;
            Ok(report(changed, "Toggled all tasks in note", &args.note_id))
        }
        Commands::AddTask(args) => {
            match app
                .add_task(args.note_id, &args.text)
                .context("saving new task")?
            {
                Some(task_id) => Ok(format!("Added task #{task_id} to note #{}\n", args.note_id)),
                None => Ok("Nothing changed.\n".to_string()),
            }
        }
        Commands::EditTask(args) => {
            let changed = app
                .edit_task(args.note_id, args.task_id, &args.text)
                .context("saving task text")?;
            Ok(report(changed, "Updated task in note", &args.note_id))
        }
        Commands::DeleteTask(args) => {
            let changed = app
                .delete_task(args.note_id, args.task_id)
                .context("saving task removal")?;
            Ok(report(changed, "Deleted task from note", &args.note_id))
        }
        Commands::Rename(args) => {
            let changed = app
                .rename_note(args.note_id, &args.title)
                .context("saving note title")?;
            Ok(report(changed, "Renamed note", &args.note_id))
        }
        Commands::Color(args) => {
            let changed = app
                .set_note_color(args.note_id, args.color)
                .context("saving note color")?;
            Ok(report(changed, "Recolored note", &args.note_id))
        }
        Commands::Delete(args) => delete_notes(app, &args.note_ids),
        Commands::Summary => Ok(format!("{}\n", app.store().count_summary())),
        Commands::Theme(args) => theme(app, args.command.unwrap_or(ThemeCommand::Show)),
    }
}

fn new_note<S: KeyValueStore>(app: &mut App<S>, args: NewArgs) -> Result<String> {
    app.discard_draft();
    for task in &args.tasks {
        app.add_pending_task(task);
    }
    let color = args.color.unwrap_or_else(|| app.default_color());
    let created = app
        .create_note_from_draft(&args.title, "", color)
        .context("saving new note")?;
    match created {
        Some(id) => Ok(format!("Created note #{id}\n")),
        None => bail!("a note needs a title or at least one task"),
    }
}

fn delete_notes<S: KeyValueStore>(app: &mut App<S>, ids: &[NoteId]) -> Result<String> {
    app.clear_selection();
    for id in ids {
        if !app.toggle_selection(*id) {
            tracing::debug!(note_id = *id, "skipping unknown note");
        }
    }
    let removed = app.delete_selected().context("saving note removal")?;
    Ok(format!(
        "Deleted {removed} note{}\n",
        if removed == 1 { "" } else { "s" }
    ))
}

fn theme<S: KeyValueStore>(app: &mut App<S>, command: ThemeCommand) -> Result<String> {
    match command {
        ThemeCommand::Show => {}
        ThemeCommand::Cycle => {
            app.cycle_theme().context("saving theme")?;
        }
        ThemeCommand::Set { theme } => {
            app.set_theme(theme).context("saving theme")?;
        }
    }
    Ok(format!("Theme: {}\n", app.theme()))
}

fn report(changed: bool, action: &str, note_id: &NoteId) -> String {
    if changed {
        format!("{action} #{note_id}\n")
    } else {
        "Nothing changed.\n".to_string()
    }
}

pub fn format_board(view: &BoardView) -> String {
    if view.is_empty() {
        return "Notes you add appear here.\n".to_string();
    }
    let mut out = String::new();
    for card in &view.cards {
        let _ = writeln!(
            &mut out,
            "#{}  {}  [{}]  {}",
            card.id, card.title, card.color, card.created_at
        );
        for task in &card.tasks {
            let mark = if task.completed { "x" } else { " " };
            let _ = writeln!(&mut out, "    [{mark}] {}  (#{})", task.text, task.id);
        }
        out.push('\n');
    }
    let _ = writeln!(&mut out, "{}", view.summary);
    out
}
