//! Run configuration for [`crate::BackupSession`].

use compress::{CompressionLevel, Compressor};
use filters::ExclusionMatcher;
use metadata::MetadataOptions;

/// How the destination is compared and updated.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum BackupMode {
    /// Compare against the destination mirror, copy changes and delete
    /// stored files whose source vanished.
    #[default]
    Incremental,
    /// Copy everything without looking at the destination; nothing is
    /// deleted.
    Full,
    /// Write a new snapshot directory, hardlinking unchanged files from the
    /// previous snapshot recorded in the destination metadata.
    Historic {
        /// Snapshot directory name; the run start time when absent.
        label: Option<String>,
    },
}

impl BackupMode {
    /// Reports whether the mode writes a historic snapshot.
    #[must_use]
    pub const fn is_historic(&self) -> bool {
        matches!(self, Self::Historic { .. })
    }

    /// Returns a lowercase mode name for log lines.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Incremental => "incremental",
            Self::Full => "full",
            Self::Historic { .. } => "historic",
        }
    }
}

/// Options for a backup run.
///
/// # Examples
///
/// ```
/// use compress::Compressor;
/// use engine::{BackupMode, BackupOptions};
///
/// let options = BackupOptions::new()
///     .compressor(Compressor::Bzip2)
///     .mode(BackupMode::Historic { label: None })
///     .follow_symlinks(true);
/// assert_eq!(options.compressor_kind(), Compressor::Bzip2);
/// assert!(options.mode_kind().is_historic());
/// ```
#[derive(Clone, Debug, Default)]
pub struct BackupOptions {
    compressor: Compressor,
    level: CompressionLevel,
    mode: BackupMode,
    exclusions: ExclusionMatcher,
    follow_symlinks: bool,
    parallel: bool,
    metadata: MetadataOptions,
}

impl BackupOptions {
    /// Creates options for an incremental gzip backup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the storage codec.
    #[must_use]
    pub const fn compressor(mut self, compressor: Compressor) -> Self {
        self.compressor = compressor;
        self
    }

    /// Selects the compression effort.
    #[must_use]
    pub const fn level(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }

    /// Selects the backup mode.
    #[must_use]
    pub fn mode(mut self, mode: BackupMode) -> Self {
        self.mode = mode;
        self
    }

    /// Installs the exclusion patterns applied to every scan.
    #[must_use]
    pub fn exclusions(mut self, matcher: ExclusionMatcher) -> Self {
        self.exclusions = matcher;
        self
    }

    /// Follows symbolic links while scanning sources.
    #[must_use]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Copies content on a worker pool when the `parallel` feature is built.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Selects which metadata is carried onto stored files.
    #[must_use]
    pub const fn metadata(mut self, options: MetadataOptions) -> Self {
        self.metadata = options;
        self
    }

    /// Returns the storage codec.
    #[must_use]
    pub const fn compressor_kind(&self) -> Compressor {
        self.compressor
    }

    /// Returns the compression effort.
    #[must_use]
    pub const fn compression_level(&self) -> CompressionLevel {
        self.level
    }

    /// Returns the backup mode.
    #[must_use]
    pub const fn mode_kind(&self) -> &BackupMode {
        &self.mode
    }

    /// Returns the exclusion matcher.
    #[must_use]
    pub const fn exclusion_matcher(&self) -> &ExclusionMatcher {
        &self.exclusions
    }

    /// Reports whether scans follow symbolic links.
    #[must_use]
    pub const fn follows_symlinks(&self) -> bool {
        self.follow_symlinks
    }

    /// Reports whether the copy step runs in parallel.
    #[must_use]
    pub const fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Returns the metadata preservation options.
    #[must_use]
    pub const fn metadata_options(&self) -> MetadataOptions {
        self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_incremental_gzip() {
        let options = BackupOptions::new();
        assert_eq!(options.compressor_kind(), Compressor::Gzip);
        assert_eq!(options.mode_kind(), &BackupMode::Incremental);
        assert!(!options.follows_symlinks());
        assert!(!options.is_parallel());
        assert!(options.exclusion_matcher().is_empty());
    }

    #[test]
    fn mode_names() {
        assert_eq!(BackupMode::Full.name(), "full");
        assert_eq!(BackupMode::Historic { label: Some("x".into()) }.name(), "historic");
        assert!(!BackupMode::Incremental.is_historic());
    }
}
