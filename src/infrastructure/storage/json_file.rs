//! JSON file dismissal store.
//!
//! Stores `{ "has_seen_load_popup": true, "recorded_at": "..." }` at a
//! configured path. A missing file means nothing has been recorded yet.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::StorageResult;
use crate::domain::ports::DismissalStore;

/// On-disk dismissal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissalRecord {
    pub has_seen_load_popup: bool,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// File-backed `DismissalStore`.
#[derive(Debug, Clone)]
pub struct JsonFileDismissalStore {
    path: PathBuf,
}

impl JsonFileDismissalStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full record, `None` if the file does not exist.
    pub fn load_record(&self) -> StorageResult<Option<DismissalRecord>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save_record(&self, record: &DismissalRecord) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write-then-rename so a crash never leaves a truncated record.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(record)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl DismissalStore for JsonFileDismissalStore {
    fn read(&self) -> StorageResult<bool> {
        Ok(self
            .load_record()?
            .is_some_and(|record| record.has_seen_load_popup))
    }

    fn write(&self, has_seen_load_prompt: bool) -> StorageResult<()> {
        let record = DismissalRecord {
            has_seen_load_popup: has_seen_load_prompt,
            recorded_at: Some(Utc::now()),
        };
        self.save_record(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::StorageError;

    #[test]
    fn test_missing_file_reads_false() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileDismissalStore::new(dir.path().join("absent.json"));
        assert!(!store.read().unwrap());
        assert_eq!(store.load_record().unwrap(), None);
    }

    #[test]
    fn test_write_creates_parent_dirs_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state").join("dismissal.json");
        let store = JsonFileDismissalStore::new(&path);

        store.write(true).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        let reopened = JsonFileDismissalStore::new(&path);
        assert!(reopened.read().unwrap());
        let record = reopened.load_record().unwrap().unwrap();
        assert!(record.has_seen_load_popup);
        assert!(record.recorded_at.is_some());
    }

    #[test]
    fn test_record_without_timestamp_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dismissal.json");
        fs::write(&path, r#"{"has_seen_load_popup": true}"#).unwrap();
        assert!(JsonFileDismissalStore::new(&path).read().unwrap());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dismissal.json");
        fs::write(&path, "not json").unwrap();
        let result = JsonFileDismissalStore::new(&path).read();
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_directory_in_place_of_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = JsonFileDismissalStore::new(dir.path()).read();
        assert!(matches!(result, Err(StorageError::Io(_))));
    }
}
