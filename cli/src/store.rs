use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};

use barkeep_core::persist::StateStore;

/// File-backed slot for the serialized filter state. A missing file is a
/// clean first run, not an error.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl StateStore for FileStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| {
                format!("Failed to read filter state: {}", self.path.display())
            }),
        }
    }

    fn save(&self, raw: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write filter state: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barkeep_core::filter::{FilterAction, FilterState, Mode};
    use barkeep_core::persist::FilterStore;

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("filters.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("filters.json"));
        store.save(r#"{"mode":"or"}"#).unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some(r#"{"mode":"or"}"#));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested/state/filters.json"));
        store.save("{}").unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn test_filter_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filters.json");

        let mut store = FilterStore::open(Box::new(FileStore::new(path.clone())), None);
        store.dispatch(&FilterAction::ToggleIngredient(7));
        store.dispatch(&FilterAction::SetMode(Mode::Not));
        let expected = store.state().clone();
        drop(store);

        let reopened = FilterStore::open(Box::new(FileStore::new(path)), None);
        assert_eq!(reopened.state(), &expected);
    }

    #[test]
    fn test_filter_store_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filters.json");
        fs::write(&path, "{definitely not json").unwrap();

        let store = FilterStore::open(Box::new(FileStore::new(path)), None);
        assert_eq!(store.state(), &FilterState::default());
    }
}
