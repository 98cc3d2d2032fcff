//! Removal of stored files whose source has disappeared.

use std::fs;
use std::io;
use std::path::Path;

use logging::Logger;

/// Counts reported by [`DeletionSweeper::sweep`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SweepCounts {
    deleted: u64,
    failed: u64,
}

impl SweepCounts {
    /// Number of files removed, including ones that were already gone.
    #[must_use]
    pub const fn deleted(&self) -> u64 {
        self.deleted
    }

    /// Number of files that could not be removed.
    #[must_use]
    pub const fn failed(&self) -> u64 {
        self.failed
    }
}

/// Unlinks stored files from a destination mirror.
///
/// Only files are removed; directories emptied by a sweep stay in place.
#[derive(Clone, Debug)]
pub struct DeletionSweeper {
    logger: Logger,
}

impl DeletionSweeper {
    /// Creates a sweeper that reports through `logger`.
    #[must_use]
    pub const fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Removes every stored name under `destination_root`.
    pub fn sweep<I, S>(&self, stored_names: I, destination_root: &Path) -> SweepCounts
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts = SweepCounts::default();
        for name in stored_names {
            let path = destination_root.join(name.as_ref());
            match fs::remove_file(&path) {
                Ok(()) => {
                    self.logger.debug(format_args!("deleted: {}", path.display()));
                    counts.deleted += 1;
                }
                Err(error) if error.kind() == io::ErrorKind::NotFound => counts.deleted += 1,
                Err(error) => {
                    self.logger.warning(format_args!(
                        "failed to delete '{}': {error}",
                        path.display()
                    ));
                    counts.failed += 1;
                }
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::{Level, MemorySink};

    #[test]
    fn removes_listed_files_only() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("d")).unwrap();
        fs::write(temp.path().join("d/gone.gz"), b"x").unwrap();
        fs::write(temp.path().join("kept.gz"), b"y").unwrap();

        let counts = DeletionSweeper::new(Logger::discard()).sweep(["d/gone.gz"], temp.path());

        assert_eq!(counts.deleted(), 1);
        assert_eq!(counts.failed(), 0);
        assert!(!temp.path().join("d/gone.gz").exists());
        assert!(temp.path().join("kept.gz").exists());
        assert!(temp.path().join("d").is_dir());
    }

    #[test]
    fn already_missing_file_is_not_a_failure() {
        let temp = tempfile::tempdir().unwrap();
        let counts = DeletionSweeper::new(Logger::discard()).sweep(["nothing"], temp.path());
        assert_eq!(counts.failed(), 0);
    }

    #[test]
    fn failures_become_warnings() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir(temp.path().join("dir")).unwrap();
        let sink = MemorySink::new();
        let logger = Logger::with_writer(Level::Warning, sink.clone());

        // Unlinking a directory fails regardless of privileges.
        let counts = DeletionSweeper::new(logger).sweep(["dir"], temp.path());

        assert_eq!(counts.failed(), 1);
        assert!(sink.contents().contains("warning: failed to delete"));
    }
}
