use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use crate::app::App;
use crate::config::{ConfigLoader, CONFIG_ENV, DATA_ENV, HOME_ENV};
use crate::storage::{PersistenceAdapter, SqliteKvStore};

pub mod commands;

use self::commands::{
    ColorArgs, DeleteArgs, EditTaskArgs, NewArgs, NoteArgs, RenameArgs, TaskArgs, TaskTextArgs,
    ThemeArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "tasknotes",
    version,
    about = "Color-tagged checklist notes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Keep config and notes in one directory (takes precedence over TASKNOTES_HOME)
    #[arg(long)]
    pub home: Option<PathBuf>,

    /// Override the config file location (takes precedence over TASKNOTES_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the data directory (takes precedence over TASKNOTES_DATA)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show every note, newest first (default)
    List,
    /// Create a note from a title and/or tasks
    New(NewArgs),
    /// Flip one task between done and open
    Toggle(TaskArgs),
    /// Complete every task in a note, or reopen them if all are done
    ToggleAll(NoteArgs),
    /// Append a task to a note
    AddTask(TaskTextArgs),
    /// Replace the text of a task
    EditTask(EditTaskArgs),
    /// Remove a task from a note
    DeleteTask(TaskArgs),
    /// Change a note title
    Rename(RenameArgs),
    /// Change a note color tag
    Color(ColorArgs),
    /// Delete one or more notes
    Delete(DeleteArgs),
    /// Print note and task totals
    Summary,
    /// Show, set or cycle the theme
    Theme(ThemeArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.home {
        env::set_var(HOME_ENV, path);
    }
    if let Some(path) = &cli.config {
        env::set_var(CONFIG_ENV, path);
    }
    if let Some(path) = &cli.data_dir {
        env::set_var(DATA_ENV, path);
    }

    init_tracing(&cli.log_level)
        .with_context(|| format!("initialising logging at level {}", cli.log_level))?;
    let loader = ConfigLoader::discover()?;
    let config = loader.load_or_init()?;
    tracing::info!(config = %loader.paths().config_file.display(), "loaded configuration");

    let backend = SqliteKvStore::open(&config.storage).context("opening note storage")?;
    let persistence = PersistenceAdapter::with_options(backend, &config.storage);
    let mut app = App::new(persistence, &config);
    if let Some(err) = app.load_error() {
        eprintln!("warning: stored notes could not be read ({err}); starting empty");
    }

    let command = cli.command.unwrap_or(Commands::List);
    let output = commands::execute(&mut app, command)?;
    print!("{output}");
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        Ok(())
    })
    .map(|_| ())
}
