use crate::config::{StorageOptions, Theme, DEFAULT_NOTES_KEY, DEFAULT_THEME_KEY};
use crate::error::{StorageError, StorageResult};
use crate::model::Note;
use crate::storage::KeyValueStore;
use crate::store::NoteStore;

/// Result of a forgiving load: the usable store plus the error that forced
/// a fallback, if any.
#[derive(Debug)]
pub struct LoadOutcome {
    pub store: NoteStore,
    pub error: Option<StorageError>,
}

/// The only component that reads or writes the durable store.
///
/// Notes are written as one JSON array under the notes key on every save;
/// the theme lives under its own key as a bare string.
pub struct PersistenceAdapter<S> {
    backend: S,
    notes_key: String,
    theme_key: String,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            notes_key: DEFAULT_NOTES_KEY.to_owned(),
            theme_key: DEFAULT_THEME_KEY.to_owned(),
        }
    }

    pub fn with_options(backend: S, options: &StorageOptions) -> Self {
        Self {
            backend,
            notes_key: options.notes_key.clone(),
            theme_key: options.theme_key.clone(),
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn save(&mut self, store: &NoteStore) -> StorageResult<()> {
        let json =
            serde_json::to_string(store.list_notes()).map_err(|source| StorageError::Serialize {
                key: self.notes_key.clone(),
                source,
            })?;
        self.backend.set(&self.notes_key, &json)?;
        tracing::debug!(notes = store.len(), bytes = json.len(), "saved notes");
        Ok(())
    }

    /// Reads the stored notes; an absent key yields an empty store.
    pub fn load(&self) -> StorageResult<NoteStore> {
        let Some(raw) = self.backend.get(&self.notes_key)? else {
            return Ok(NoteStore::new());
        };
        let notes: Vec<Note> =
            serde_json::from_str(&raw).map_err(|source| StorageError::Deserialize {
                key: self.notes_key.clone(),
                source,
            })?;
        Ok(NoteStore::from_notes(notes))
    }

    /// Like [`load`](Self::load) but never fails: unreadable or malformed
    /// data yields an empty store and the stored record is left as is.
    pub fn load_or_empty(&self) -> LoadOutcome {
        match self.load() {
            Ok(store) => LoadOutcome { store, error: None },
            Err(err) => {
                tracing::warn!(error = %err, "stored notes unusable, starting empty");
                LoadOutcome {
                    store: NoteStore::new(),
                    error: Some(err),
                }
            }
        }
    }

    pub fn save_theme(&mut self, theme: Theme) -> StorageResult<()> {
        self.backend.set(&self.theme_key, theme.as_ref())
    }

    /// Stored theme, `None` when nothing usable has been saved.
    pub fn load_theme(&self) -> StorageResult<Option<Theme>> {
        let Some(raw) = self.backend.get(&self.theme_key)? else {
            return Ok(None);
        };
        match raw.parse::<Theme>() {
            Ok(theme) => Ok(Some(theme)),
            Err(_) => {
                tracing::warn!(value = %raw, "ignoring unknown stored theme");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::model::{Color, Task};
    use crate::storage::MemoryKvStore;

    fn sample_store() -> NoteStore {
        let mut store = NoteStore::new();
        let tasks: Vec<Task> = ["Milk", "Eggs"]
            .iter()
            .filter_map(|text| Task::from_input(store.ids_mut().next_id(), text))
            .collect();
        let groceries = store
            .create_note("Groceries", &tasks, Color::Blue)
            .expect("created");
        store.toggle_task_completion(groceries, tasks[1].id);
        store.create_note("Ideas", &[], Color::Purple);
        store
    }

    #[test]
    fn save_then_load_is_lossless() -> anyhow::Result<()> {
        let store = sample_store();
        let mut adapter = PersistenceAdapter::new(MemoryKvStore::new());
        adapter.save(&store)?;
        let restored = adapter.load()?;
        assert_eq!(restored.list_notes(), store.list_notes());
        Ok(())
    }

    #[test]
    fn missing_key_loads_empty_store() -> anyhow::Result<()> {
        let adapter = PersistenceAdapter::new(MemoryKvStore::new());
        assert!(adapter.load()?.is_empty());
        assert_eq!(adapter.load_theme()?, None);
        Ok(())
    }

    #[test]
    fn malformed_notes_fall_back_without_repair() {
        let mut backend = MemoryKvStore::new();
        backend.insert_raw(DEFAULT_NOTES_KEY, "{not json");
        let adapter = PersistenceAdapter::new(backend);

        assert_matches!(adapter.load(), Err(StorageError::Deserialize { .. }));
        let outcome = adapter.load_or_empty();
        assert!(outcome.store.is_empty());
        assert_matches!(outcome.error, Some(StorageError::Deserialize { .. }));
        assert_eq!(
            adapter.backend().get(DEFAULT_NOTES_KEY).ok().flatten().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn stored_layout_matches_wire_format() -> anyhow::Result<()> {
        let mut backend = MemoryKvStore::new();
        backend.insert_raw(
            DEFAULT_NOTES_KEY,
            r#"[{"id":2,"title":"Trip","tasks":[{"id":3,"text":"Pack","completed":false}],"color":"teal","createdAt":"5/1/2024"}]"#,
        );
        let mut adapter = PersistenceAdapter::new(backend);
        let store = adapter.load()?;
        let note = store.find_note(2).expect("note loaded");
        assert_eq!(note.color, Color::Teal);
        assert_eq!(note.created_at, "5/1/2024");

        adapter.save(&store)?;
        let raw = adapter.backend().get(DEFAULT_NOTES_KEY)?.unwrap_or_default();
        insta::assert_snapshot!(raw, @r###"[{"id":2,"title":"Trip","tasks":[{"id":3,"text":"Pack","completed":false}],"color":"teal","createdAt":"5/1/2024"}]"###);
        Ok(())
    }

    #[test]
    fn theme_round_trips_and_ignores_junk() -> anyhow::Result<()> {
        let mut adapter = PersistenceAdapter::new(MemoryKvStore::new());
        adapter.save_theme(Theme::Cream)?;
        assert_eq!(adapter.load_theme()?, Some(Theme::Cream));
        assert_eq!(
            adapter.backend().get(DEFAULT_THEME_KEY)?.as_deref(),
            Some("cream")
        );

        adapter.backend_mut().insert_raw(DEFAULT_THEME_KEY, "sepia");
        assert_eq!(adapter.load_theme()?, None);
        Ok(())
    }

    #[test]
    fn quota_failure_surfaces_from_save() {
        let mut adapter = PersistenceAdapter::new(MemoryKvStore::with_quota(8));
        assert_matches!(
            adapter.save(&sample_store()),
            Err(StorageError::QuotaExceeded { quota: 8, .. })
        );
        assert_eq!(adapter.backend().get(DEFAULT_NOTES_KEY).ok().flatten(), None);
    }
}
