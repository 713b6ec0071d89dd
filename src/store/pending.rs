use crate::model::{IdGenerator, Task};

/// Tasks typed into the composer before their note exists.
#[derive(Debug, Clone, Default)]
pub struct PendingTaskBuffer {
    tasks: Vec<Task>,
}

impl PendingTaskBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task for non-blank input; returns whether one was added.
    pub fn push(&mut self, ids: &mut IdGenerator, raw: &str) -> bool {
        let Some(task) = Task::from_input(ids.next_id(), raw) else {
            return false;
        };
        self.tasks.push(task);
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<Task> {
        if index < self.tasks.len() {
            Some(self.tasks.remove(index))
        } else {
            None
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_trims_and_skips_blank_input() {
        let mut ids = IdGenerator::new();
        let mut buffer = PendingTaskBuffer::new();
        assert!(buffer.push(&mut ids, "  Milk  "));
        assert!(!buffer.push(&mut ids, "   "));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.tasks()[0].text, "Milk");
    }

    #[test]
    fn remove_by_index_keeps_order() {
        let mut ids = IdGenerator::new();
        let mut buffer = PendingTaskBuffer::new();
        for text in ["a", "b", "c"] {
            buffer.push(&mut ids, text);
        }
        let removed = buffer.remove(1).expect("middle task");
        assert_eq!(removed.text, "b");
        assert!(buffer.remove(5).is_none());
        let texts: Vec<_> = buffer.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
    }
}
