use crate::app::selection::{SelectionSet, SelectionState};
use crate::config::{Layout, Theme};
use crate::model::{Color, NoteId, TaskId};
use crate::store::NoteStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLine {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub id: NoteId,
    pub title: String,
    pub color: Color,
    pub created_at: String,
    pub selected: bool,
    pub tasks: Vec<TaskLine>,
}

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub theme: Theme,
    pub layout: Layout,
    pub cards: Vec<NoteCard>,
    pub summary: String,
    pub selected_count: usize,
    pub selection: SelectionState,
}

impl BoardView {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Bulk controls are only shown while something is selected.
    pub fn show_selection_controls(&self) -> bool {
        self.selected_count > 0
    }
}

pub fn render(
    store: &NoteStore,
    selection: &SelectionSet,
    theme: Theme,
    layout: Layout,
) -> BoardView {
    let all_ids: Vec<NoteId> = store.note_ids().collect();
    let cards = store
        .list_notes()
        .iter()
        .map(|note| NoteCard {
            id: note.id,
            title: note.title.clone(),
            color: note.color,
            created_at: note.created_at.clone(),
            selected: selection.contains(note.id),
            tasks: note
                .tasks
                .iter()
                .map(|task| TaskLine {
                    id: task.id,
                    text: task.text.clone(),
                    completed: task.completed,
                })
                .collect(),
        })
        .collect();
    BoardView {
        theme,
        layout,
        cards,
        summary: store.count_summary().to_string(),
        selected_count: selection.size(),
        selection: selection.state(&all_ids),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_renders_no_notes() {
        let view = render(
            &NoteStore::new(),
            &SelectionSet::new(),
            Theme::Dark,
            Layout::List,
        );
        assert!(view.is_empty());
        assert_eq!(view.summary, "No notes");
        assert_eq!(view.selection, SelectionState::None);
        assert!(!view.show_selection_controls());
    }

    #[test]
    fn cards_reflect_selection_and_order() {
        let mut store = NoteStore::new();
        let first = store.create_note("First", &[], Color::Red).expect("created");
        let second = store.create_note("Second", &[], Color::Blue).expect("created");
        let mut selection = SelectionSet::new();
        selection.toggle(first);

        let view = render(&store, &selection, Theme::Light, Layout::Grid);
        let ids: Vec<_> = view.cards.iter().map(|card| card.id).collect();
        assert_eq!(ids, vec![second, first]);
        assert!(view.cards[1].selected);
        assert!(!view.cards[0].selected);
        assert_eq!(view.selection, SelectionState::Partial);
        assert_eq!(view.summary, "2 notes • 0 tasks (0 completed)");
    }
}
