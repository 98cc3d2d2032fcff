//! Counters reported at the end of a run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{Registry, SnapshotName};

/// Statistics for one source path.
#[derive(Clone, Debug)]
pub struct PathSummary {
    pub(crate) source: PathBuf,
    pub(crate) mirror: PathBuf,
    pub(crate) new: u64,
    pub(crate) updated: u64,
    pub(crate) unchanged: u64,
    pub(crate) copied: u64,
    pub(crate) linked: u64,
    pub(crate) link_fallbacks: u64,
    pub(crate) deleted: u64,
    pub(crate) delete_failures: u64,
    pub(crate) failed: u64,
    pub(crate) warnings: u64,
    pub(crate) bytes_copied: u64,
    pub(crate) elapsed: Duration,
    pub(crate) registry: Registry,
}

impl PathSummary {
    pub(crate) fn new(source: PathBuf, mirror: PathBuf, registry: Registry) -> Self {
        Self {
            source,
            mirror,
            new: 0,
            updated: 0,
            unchanged: 0,
            copied: 0,
            linked: 0,
            link_fallbacks: 0,
            deleted: 0,
            delete_failures: 0,
            failed: 0,
            warnings: 0,
            bytes_copied: 0,
            elapsed: Duration::ZERO,
            registry,
        }
    }

    /// Absolute source path.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Directory the source is mirrored into.
    #[must_use]
    pub fn mirror(&self) -> &Path {
        &self.mirror
    }

    /// Files absent from the destination.
    #[must_use]
    pub const fn new_files(&self) -> u64 {
        self.new
    }

    /// Files whose modification time changed.
    #[must_use]
    pub const fn updated_files(&self) -> u64 {
        self.updated
    }

    /// Files left as they were.
    #[must_use]
    pub const fn unchanged_files(&self) -> u64 {
        self.unchanged
    }

    /// Files whose content was written, including link fallbacks.
    #[must_use]
    pub const fn copied_files(&self) -> u64 {
        self.copied
    }

    /// Unchanged files hardlinked from the previous snapshot.
    #[must_use]
    pub const fn linked_files(&self) -> u64 {
        self.linked
    }

    /// Unchanged files copied because linking them failed.
    #[must_use]
    pub const fn link_fallbacks(&self) -> u64 {
        self.link_fallbacks
    }

    /// Stored files removed because their source vanished.
    #[must_use]
    pub const fn deleted_files(&self) -> u64 {
        self.deleted
    }

    /// Stored files that could not be removed.
    #[must_use]
    pub const fn delete_failures(&self) -> u64 {
        self.delete_failures
    }

    /// Files whose content could not be written.
    #[must_use]
    pub const fn failed_files(&self) -> u64 {
        self.failed
    }

    /// Recoverable problems reported while copying.
    #[must_use]
    pub const fn warnings(&self) -> u64 {
        self.warnings
    }

    /// Uncompressed bytes read from sources.
    #[must_use]
    pub const fn bytes_copied(&self) -> u64 {
        self.bytes_copied
    }

    /// Wall-clock time spent on this path.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Registry describing the destination after this run: every key whose
    /// stored file is known to be current.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// Statistics for a complete run.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub(crate) paths: Vec<PathSummary>,
    pub(crate) snapshot: Option<SnapshotName>,
}

impl RunSummary {
    /// Per-path statistics in processing order.
    #[must_use]
    pub fn paths(&self) -> &[PathSummary] {
        &self.paths
    }

    /// Snapshot written by a historic run.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&SnapshotName> {
        self.snapshot.as_ref()
    }

    /// Total files whose content was written.
    #[must_use]
    pub fn files_copied(&self) -> u64 {
        self.paths.iter().map(|path| path.copied).sum()
    }

    /// Total files whose content could not be written.
    #[must_use]
    pub fn files_failed(&self) -> u64 {
        self.paths.iter().map(|path| path.failed).sum()
    }

    /// Total stored files removed.
    #[must_use]
    pub fn files_deleted(&self) -> u64 {
        self.paths.iter().map(|path| path.deleted).sum()
    }

    /// Total files hardlinked into the snapshot.
    #[must_use]
    pub fn files_linked(&self) -> u64 {
        self.paths.iter().map(|path| path.linked).sum()
    }
}
