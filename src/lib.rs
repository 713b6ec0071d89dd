pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod store;

pub use app::App;
pub use config::{AppConfig, ConfigLoader, ConfigPaths};
pub use error::{StorageError, StorageResult};
pub use model::{Color, CountSummary, Note, NoteId, Task, TaskId};
pub use store::{NoteEdit, NoteStore, PendingTaskBuffer};
