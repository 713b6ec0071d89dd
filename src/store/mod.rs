use std::collections::HashSet;

use crate::model::{
    normalize_title, Color, CountSummary, IdGenerator, Note, NoteId, Task, TaskId,
};

mod pending;

pub use pending::PendingTaskBuffer;

/// A set of changes made from the note editor, applied together.
#[derive(Debug, Clone, Default)]
pub struct NoteEdit {
    pub title: String,
    pub task_texts: Vec<(TaskId, String)>,
    pub new_task: Option<String>,
    pub color: Option<Color>,
}

/// Owns every note, newest first.
///
/// Mutators return `false` (or `None`) instead of failing when the input is
/// blank or an id no longer exists, so a caller holding a stale id cannot
/// break anything.
#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    notes: Vec<Note>,
    ids: IdGenerator,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from persisted notes, keeping their order.
    pub fn from_notes(notes: Vec<Note>) -> Self {
        let floor = issued_ids(&notes).max().unwrap_or_default();
        Self {
            notes,
            ids: IdGenerator::seeded(floor),
        }
    }

    pub fn ids_mut(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    /// Creates a note unless both the title and the task list are empty.
    pub fn create_note(&mut self, title: &str, pending: &[Task], color: Color) -> Option<NoteId> {
        if title.trim().is_empty() && pending.is_empty() {
            tracing::debug!("ignoring note creation without title or tasks");
            return None;
        }
        let tasks = self.adopt_tasks(pending);
        let id = self.ids.next_id();
        let note = Note::new(id, title, tasks, color);
        tracing::debug!(note_id = id, tasks = note.tasks.len(), "created note");
        self.notes.insert(0, note);
        Some(id)
    }

    pub fn toggle_task_completion(&mut self, note_id: NoteId, task_id: TaskId) -> bool {
        let Some(task) = self.task_mut(note_id, task_id) else {
            return false;
        };
        task.completed = !task.completed;
        tracing::debug!(note_id, task_id, completed = task.completed, "toggled task");
        true
    }

    /// Completes every task, or clears them all when they were already complete.
    pub fn toggle_all_tasks(&mut self, note_id: NoteId) -> bool {
        let Some(note) = self.find_note_mut(note_id) else {
            return false;
        };
        if note.tasks.is_empty() {
            return false;
        }
        let target = !note.all_completed();
        for task in &mut note.tasks {
            task.completed = target;
        }
        tracing::debug!(note_id, completed = target, "toggled all tasks");
        true
    }

    pub fn update_note_title(&mut self, note_id: NoteId, title: &str) -> bool {
        let Some(note) = self.find_note_mut(note_id) else {
            return false;
        };
        note.title = normalize_title(title);
        true
    }

    pub fn update_note_color(&mut self, note_id: NoteId, color: Color) -> bool {
        let Some(note) = self.find_note_mut(note_id) else {
            return false;
        };
        note.color = color;
        true
    }

    pub fn add_task(&mut self, note_id: NoteId, text: &str) -> Option<TaskId> {
        if text.trim().is_empty() || self.find_note(note_id).is_none() {
            return None;
        }
        let task = Task::from_input(self.ids.next_id(), text)?;
        let task_id = task.id;
        self.find_note_mut(note_id)?.tasks.push(task);
        Some(task_id)
    }

    /// Replaces a task's text. Blank input leaves the existing text in place.
    pub fn update_task_text(&mut self, note_id: NoteId, task_id: TaskId, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        let Some(task) = self.task_mut(note_id, task_id) else {
            return false;
        };
        task.text = trimmed.to_owned();
        true
    }

    pub fn delete_task(&mut self, note_id: NoteId, task_id: TaskId) -> bool {
        let Some(note) = self.find_note_mut(note_id) else {
            return false;
        };
        let before = note.tasks.len();
        note.tasks.retain(|task| task.id != task_id);
        note.tasks.len() != before
    }

    pub fn delete_note(&mut self, note_id: NoteId) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != note_id);
        self.notes.len() != before
    }

    /// Removes every listed note; returns how many were actually present.
    pub fn delete_notes(&mut self, ids: &HashSet<NoteId>) -> usize {
        let before = self.notes.len();
        self.notes.retain(|note| !ids.contains(&note.id));
        before - self.notes.len()
    }

    /// Applies an editor session: title, task text edits, one optional new
    /// task and an optional color change.
    pub fn apply_edit(&mut self, note_id: NoteId, edit: &NoteEdit) -> bool {
        if self.find_note(note_id).is_none() {
            return false;
        }
        self.update_note_title(note_id, &edit.title);
        for (task_id, text) in &edit.task_texts {
            self.update_task_text(note_id, *task_id, text);
        }
        if let Some(text) = &edit.new_task {
            self.add_task(note_id, text);
        }
        if let Some(color) = edit.color {
            self.update_note_color(note_id, color);
        }
        true
    }

    /// Copies drafted tasks into the store's id space. Drafts may carry ids
    /// from another generator, so every id is observed first and any id that
    /// repeats within the draft or is already in use gets a fresh one.
    fn adopt_tasks(&mut self, pending: &[Task]) -> Vec<Task> {
        let mut in_use: HashSet<i64> = issued_ids(&self.notes).collect();
        for task in pending {
            self.ids.observe(task.id);
        }
        pending
            .iter()
            .cloned()
            .map(|mut task| {
                if !in_use.insert(task.id) {
                    let fresh = self.ids.next_id();
                    tracing::debug!(from = task.id, to = fresh, "reassigned duplicate task id");
                    task.id = fresh;
                    in_use.insert(fresh);
                }
                task
            })
            .collect()
    }

    pub fn find_note(&self, note_id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == note_id)
    }

    fn find_note_mut(&mut self, note_id: NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|note| note.id == note_id)
    }

    fn task_mut(&mut self, note_id: NoteId, task_id: TaskId) -> Option<&mut Task> {
        self.find_note_mut(note_id)?.task_mut(task_id)
    }

    pub fn list_notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note_ids(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.notes.iter().map(|note| note.id)
    }

    pub fn contains(&self, note_id: NoteId) -> bool {
        self.find_note(note_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn count_summary(&self) -> CountSummary {
        self.notes
            .iter()
            .fold(CountSummary::default(), |mut summary, note| {
                summary.note_count += 1;
                summary.task_count += note.tasks.len();
                summary.completed_task_count += note.completed_count();
                summary
            })
    }
}

/// Every note and task id held by `notes`.
fn issued_ids(notes: &[Note]) -> impl Iterator<Item = i64> + '_ {
    notes
        .iter()
        .flat_map(|note| std::iter::once(note.id).chain(note.tasks.iter().map(|t| t.id)))
}
