//! Persistent run metadata kept in the destination root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use logging::Logger;
use serde::{Deserialize, Serialize};

/// Name of the metadata file inside the destination root.
pub const METADATA_FILENAME: &str = ".backup.metadata";

/// Contents of the metadata file.
///
/// Keys other than `last_historic_dir` are preserved when the file is
/// rewritten.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Metadata {
    /// Snapshot directory produced by the latest historic run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_historic_dir: Option<String>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl Metadata {
    /// Creates metadata naming `snapshot` as the latest historic directory.
    #[must_use]
    pub fn with_last_historic_dir(mut self, snapshot: impl Into<String>) -> Self {
        self.last_historic_dir = Some(snapshot.into());
        self
    }
}

/// Loads and saves [`Metadata`] for one destination root.
///
/// Neither direction is fatal: a file that cannot be read or parsed yields
/// the default record, and a failed save only costs the snapshot chain its
/// next link.
#[derive(Clone, Debug)]
pub struct MetadataStore {
    path: PathBuf,
    logger: Logger,
}

impl MetadataStore {
    /// Creates a store for the metadata file under `destination_root`.
    #[must_use]
    pub fn new(destination_root: &Path, logger: Logger) -> Self {
        Self {
            path: destination_root.join(METADATA_FILENAME),
            logger,
        }
    }

    /// Returns the metadata file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the metadata file.
    ///
    /// A file that does not parse is deleted so the next save starts clean.
    pub fn load(&self) -> Metadata {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Metadata::default(),
            Err(error) => {
                self.logger.warning(format_args!(
                    "failed to read metadata '{}': {error}",
                    self.path.display()
                ));
                return Metadata::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(metadata) => metadata,
            Err(error) => {
                self.logger.warning(format_args!(
                    "discarding corrupt metadata '{}': {error}",
                    self.path.display()
                ));
                if let Err(error) = fs::remove_file(&self.path) {
                    self.logger.warning(format_args!(
                        "failed to delete metadata '{}': {error}",
                        self.path.display()
                    ));
                }
                Metadata::default()
            }
        }
    }

    /// Writes the metadata file, returning whether it succeeded.
    pub fn save(&self, metadata: &Metadata) -> bool {
        let result = serde_json::to_vec_pretty(metadata)
            .map_err(io::Error::from)
            .and_then(|bytes| fs::write(&self.path, bytes));
        match result {
            Ok(()) => {
                self.logger
                    .debug(format_args!("saved metadata to {}", self.path.display()));
                true
            }
            Err(error) => {
                self.logger.warning(format_args!(
                    "failed to save metadata '{}': {error}",
                    self.path.display()
                ));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::{Level, MemorySink};

    #[test]
    fn missing_file_loads_default() {
        let temp = tempfile::tempdir().unwrap();
        let store = MetadataStore::new(temp.path(), Logger::discard());
        assert_eq!(store.load(), Metadata::default());
    }

    #[test]
    fn save_then_load_keeps_snapshot_name() {
        let temp = tempfile::tempdir().unwrap();
        let store = MetadataStore::new(temp.path(), Logger::discard());

        assert!(store.save(&Metadata::default().with_last_historic_dir("20240101120000")));
        let loaded = store.load();
        assert_eq!(loaded.last_historic_dir.as_deref(), Some("20240101120000"));
    }

    #[test]
    fn unknown_keys_survive_a_rewrite() {
        let temp = tempfile::tempdir().unwrap();
        let store = MetadataStore::new(temp.path(), Logger::discard());
        fs::write(store.path(), r#"{"last_historic_dir":"a","note":"kept"}"#).unwrap();

        let metadata = store.load().with_last_historic_dir("b");
        assert!(store.save(&metadata));

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(value["last_historic_dir"], "b");
        assert_eq!(value["note"], "kept");
    }

    #[test]
    fn corrupt_file_is_deleted_with_warning() {
        let temp = tempfile::tempdir().unwrap();
        let sink = MemorySink::new();
        let store = MetadataStore::new(temp.path(), Logger::with_writer(Level::Warning, sink.clone()));
        fs::write(store.path(), b"{not json").unwrap();

        assert_eq!(store.load(), Metadata::default());
        assert!(!store.path().exists());
        assert!(sink.contents().contains("corrupt metadata"));
    }

    #[test]
    fn save_into_missing_directory_reports_failure() {
        let temp = tempfile::tempdir().unwrap();
        let store = MetadataStore::new(&temp.path().join("absent"), Logger::discard());
        assert!(!store.save(&Metadata::default()));
    }
}
