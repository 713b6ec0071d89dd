use std::collections::HashSet;

use indexmap::IndexSet;

use crate::model::NoteId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    None,
    Partial,
    All,
}

/// Notes marked for bulk actions, held by id only.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    ids: IndexSet<NoteId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new selected state of `id`.
    pub fn toggle(&mut self, id: NoteId) -> bool {
        if self.ids.shift_remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Replaces the selection with exactly `all_ids`.
    pub fn select_all<I>(&mut self, all_ids: I)
    where
        I: IntoIterator<Item = NoteId>,
    {
        self.ids = all_ids.into_iter().collect();
    }

    /// Clears a complete selection, otherwise selects everything.
    pub fn toggle_select_all(&mut self, all_ids: &[NoteId]) {
        if self.is_all_selected(all_ids) {
            self.clear();
        } else {
            self.select_all(all_ids.iter().copied());
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_all_selected(&self, all_ids: &[NoteId]) -> bool {
        if all_ids.is_empty() {
            return false;
        }
        let all: HashSet<NoteId> = all_ids.iter().copied().collect();
        all.len() == self.ids.len() && self.ids.iter().all(|id| all.contains(id))
    }

    pub fn state(&self, all_ids: &[NoteId]) -> SelectionState {
        if self.is_all_selected(all_ids) {
            SelectionState::All
        } else if self.ids.is_empty() {
            SelectionState::None
        } else {
            SelectionState::Partial
        }
    }

    pub fn contains(&self, id: NoteId) -> bool {
        self.ids.contains(&id)
    }

    pub fn remove(&mut self, id: NoteId) -> bool {
        self.ids.shift_remove(&id)
    }

    /// Drops ids rejected by `exists`.
    pub fn prune<F>(&mut self, mut exists: F)
    where
        F: FnMut(NoteId) -> bool,
    {
        self.ids.retain(|id| exists(*id));
    }

    pub fn size(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn to_set(&self) -> HashSet<NoteId> {
        self.ids.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.ids.iter().copied()
    }
}
