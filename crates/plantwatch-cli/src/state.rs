//! File-backed storage for the CLI session.
//!
//! Each key is stored as `<state-dir>/<encoded-key>.json`.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use plantwatch_ui::{StorageBackend, StorageError};

const EXTENSION: &str = "json";

/// Directory used when `--state-dir` is not given.
pub(crate) fn default_state_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map_or_else(|| PathBuf::from(".plantwatch"), |dir| dir.join("plantwatch"))
}

/// One JSON file per key in a directory.
#[derive(Debug, Clone)]
pub(crate) struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{EXTENSION}", urlencoding::encode(key)))
    }
}

fn io_error(operation: &'static str, err: &std::io::Error) -> StorageError {
    StorageError::backend(operation, err.to_string())
}

impl StorageBackend for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error("read", &err)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(|err| io_error("write", &err))?;
        fs::write(self.path_for(key), value).map_err(|err| io_error("write", &err))
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(io_error("delete", &err)),
            _ => Ok(()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_error("keys", &err)),
        };
        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(|err| io_error("keys", &err))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if let Ok(key) = urlencoding::decode(stem) {
                keys.push(key.into_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantwatch_ui::PersistentStore;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[test]
    fn read_of_missing_key_is_none() {
        let dir = TempDir::new().expect("tempdir");
        let storage = FileStorage::new(dir.path().join("state"));
        assert_eq!(storage.read("app_auth-data").expect("read"), None);
        assert!(storage.keys().expect("keys").is_empty());
        storage.delete("app_auth-data").expect("delete absent");
    }

    #[test]
    fn write_creates_one_file_per_key() {
        let dir = TempDir::new().expect("tempdir");
        let storage = FileStorage::new(dir.path());
        storage.write("app_auth-data", "{}").expect("write");
        storage.write("other/key", "1").expect("write");
        assert!(dir.path().join("app_auth-data.json").is_file());
        assert_eq!(
            storage.keys().expect("keys"),
            vec!["app_auth-data".to_string(), "other/key".to_string()]
        );
        assert_eq!(storage.read("other/key").expect("read").as_deref(), Some("1"));
    }

    #[test]
    fn clear_through_persistent_store_spares_foreign_files() {
        let dir = TempDir::new().expect("tempdir");
        let backend = Rc::new(FileStorage::new(dir.path()));
        backend.write("foreign", "\"keep\"").expect("write");
        let store = PersistentStore::with_defaults(backend.clone());
        assert!(store.set("hierarchy-store", &serde_json::json!({"x": 1})));
        store.clear();
        assert_eq!(backend.keys().expect("keys"), vec!["foreign".to_string()]);
    }
}
