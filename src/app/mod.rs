use std::collections::HashSet;

use crate::config::{AppConfig, Layout, Theme};
use crate::error::{StorageError, StorageResult};
use crate::model::{Color, NoteId, TaskId};
use crate::storage::{KeyValueStore, PersistenceAdapter};
use crate::store::{NoteEdit, NoteStore, PendingTaskBuffer};

pub mod selection;
pub mod view;

pub use selection::{SelectionSet, SelectionState};
pub use view::{BoardView, NoteCard, TaskLine};

/// Session state behind the UI: notes, selection, the note draft and display
/// preferences, plus the adapter that mirrors them to durable storage.
///
/// Every mutator returns `Ok(false)` when nothing changed (blank input, stale
/// id) and saves only when something did. A save failure is returned as an
/// error but the in-memory change is kept.
pub struct App<S: KeyValueStore> {
    store: NoteStore,
    selection: SelectionSet,
    pending: PendingTaskBuffer,
    theme: Theme,
    layout: Layout,
    default_color: Color,
    persistence: PersistenceAdapter<S>,
    load_error: Option<StorageError>,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(persistence: PersistenceAdapter<S>, config: &AppConfig) -> Self {
        let outcome = persistence.load_or_empty();
        let theme = match persistence.load_theme() {
            Ok(Some(theme)) => theme,
            Ok(None) => config.default_theme,
            Err(err) => {
                tracing::warn!(error = %err, "reading stored theme failed");
                config.default_theme
            }
        };
        tracing::info!(notes = outcome.store.len(), %theme, "session started");
        Self {
            store: outcome.store,
            selection: SelectionSet::new(),
            pending: PendingTaskBuffer::new(),
            theme,
            layout: config.default_layout,
            default_color: config.default_color,
            persistence,
            load_error: outcome.error,
        }
    }

    /// The error that forced an empty start, if loading failed.
    pub fn load_error(&self) -> Option<&StorageError> {
        self.load_error.as_ref()
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn pending(&self) -> &PendingTaskBuffer {
        &self.pending
    }

    pub fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn default_color(&self) -> Color {
        self.default_color
    }

    pub fn view(&self) -> BoardView {
        view::render(&self.store, &self.selection, self.theme, self.layout)
    }

    pub fn add_pending_task(&mut self, text: &str) -> bool {
        self.pending.push(self.store.ids_mut(), text)
    }

    pub fn remove_pending_task(&mut self, index: usize) -> bool {
        self.pending.remove(index).is_some()
    }

    pub fn discard_draft(&mut self) {
        self.pending.clear();
    }

    /// Creates a note from the draft. Leftover text in the task input is added
    /// to the draft first. The draft is emptied only when a note is created.
    pub fn create_note_from_draft(
        &mut self,
        title: &str,
        leftover_task: &str,
        color: Color,
    ) -> StorageResult<Option<NoteId>> {
        self.add_pending_task(leftover_task);
        let Some(id) = self.store.create_note(title, self.pending.tasks(), color) else {
            return Ok(None);
        };
        self.pending.clear();
        self.save()?;
        Ok(Some(id))
    }

    pub fn toggle_task(&mut self, note_id: NoteId, task_id: TaskId) -> StorageResult<bool> {
        let changed = self.store.toggle_task_completion(note_id, task_id);
        self.save_if(changed)
    }

    pub fn toggle_all_tasks(&mut self, note_id: NoteId) -> StorageResult<bool> {
        let changed = self.store.toggle_all_tasks(note_id);
        self.save_if(changed)
    }

    pub fn rename_note(&mut self, note_id: NoteId, title: &str) -> StorageResult<bool> {
        let changed = self.store.update_note_title(note_id, title);
        self.save_if(changed)
    }

    pub fn set_note_color(&mut self, note_id: NoteId, color: Color) -> StorageResult<bool> {
        let changed = self.store.update_note_color(note_id, color);
        self.save_if(changed)
    }

    pub fn add_task(&mut self, note_id: NoteId, text: &str) -> StorageResult<Option<TaskId>> {
        let task_id = self.store.add_task(note_id, text);
        self.save_if(task_id.is_some())?;
        Ok(task_id)
    }

    pub fn edit_task(&mut self, note_id: NoteId, task_id: TaskId, text: &str) -> StorageResult<bool> {
        let changed = self.store.update_task_text(note_id, task_id, text);
        self.save_if(changed)
    }

    pub fn delete_task(&mut self, note_id: NoteId, task_id: TaskId) -> StorageResult<bool> {
        let changed = self.store.delete_task(note_id, task_id);
        self.save_if(changed)
    }

    pub fn apply_edit(&mut self, note_id: NoteId, edit: &NoteEdit) -> StorageResult<bool> {
        let changed = self.store.apply_edit(note_id, edit);
        self.save_if(changed)
    }

    pub fn delete_note(&mut self, note_id: NoteId) -> StorageResult<bool> {
        let changed = self.store.delete_note(note_id);
        self.selection.remove(note_id);
        self.save_if(changed)
    }

    pub fn delete_notes(&mut self, ids: &HashSet<NoteId>) -> StorageResult<usize> {
        let removed = self.store.delete_notes(ids);
        let store = &self.store;
        self.selection.prune(|id| store.contains(id));
        self.save_if(removed > 0)?;
        Ok(removed)
    }

    pub fn toggle_selection(&mut self, note_id: NoteId) -> bool {
        if !self.store.contains(note_id) {
            return false;
        }
        self.selection.toggle(note_id);
        true
    }

    pub fn toggle_select_all(&mut self) {
        let all_ids: Vec<NoteId> = self.store.note_ids().collect();
        self.selection.toggle_select_all(&all_ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Deletes every selected note and clears the selection.
    pub fn delete_selected(&mut self) -> StorageResult<usize> {
        if self.selection.is_empty() {
            return Ok(0);
        }
        let ids = self.selection.to_set();
        self.selection.clear();
        let removed = self.store.delete_notes(&ids);
        tracing::debug!(removed, "deleted selected notes");
        self.save_if(removed > 0)?;
        Ok(removed)
    }

    pub fn cycle_theme(&mut self) -> StorageResult<Theme> {
        self.set_theme(self.theme.next())?;
        Ok(self.theme)
    }

    /// Switches theme; it stays applied even if saving it fails.
    pub fn set_theme(&mut self, theme: Theme) -> StorageResult<()> {
        self.theme = theme;
        self.persistence.save_theme(theme)
    }

    pub fn toggle_layout(&mut self) -> Layout {
        self.layout = self.layout.toggled();
        self.layout
    }

    fn save_if(&mut self, changed: bool) -> StorageResult<bool> {
        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    fn save(&mut self) -> StorageResult<()> {
        self.persistence.save(&self.store).map_err(|err| {
            tracing::warn!(error = %err, "saving notes failed, keeping in-memory state");
            err
        })
    }
}
