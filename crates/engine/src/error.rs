use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use walk::ScanError;

/// Exit code reported for every fatal backup failure.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Fatal error that aborts a backup run.
///
/// Per-file problems never surface here; they are folded into
/// [`crate::FileOutcome`] values and logged as warnings.
#[derive(Debug)]
pub struct BackupError {
    kind: BackupErrorKind,
}

impl BackupError {
    fn new(kind: BackupErrorKind) -> Self {
        Self { kind }
    }

    /// Constructs an error for a destination the process cannot write into.
    #[must_use]
    pub fn destination_not_writable(path: PathBuf, source: io::Error) -> Self {
        Self::new(BackupErrorKind::DestinationNotWritable { path, source })
    }

    /// Constructs an error for a source path that does not exist.
    #[must_use]
    pub fn missing_source(path: PathBuf) -> Self {
        Self::new(BackupErrorKind::MissingSource { path })
    }

    /// Constructs an error for an unusable snapshot name.
    #[must_use]
    pub fn invalid_snapshot_name(name: impl Into<String>) -> Self {
        Self::new(BackupErrorKind::InvalidSnapshotName { name: name.into() })
    }

    /// Constructs an I/O error with action context.
    #[must_use]
    pub fn io(action: &'static str, path: PathBuf, source: io::Error) -> Self {
        Self::new(BackupErrorKind::Io {
            action,
            path,
            source,
        })
    }

    /// Returns the process exit code for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        FATAL_EXIT_CODE
    }

    /// Provides access to the underlying error kind.
    #[must_use]
    pub fn kind(&self) -> &BackupErrorKind {
        &self.kind
    }

    /// Consumes the error and returns its kind.
    #[must_use]
    pub fn into_kind(self) -> BackupErrorKind {
        self.kind
    }
}

impl From<ScanError> for BackupError {
    fn from(error: ScanError) -> Self {
        Self::new(BackupErrorKind::Scan(error))
    }
}

impl fmt::Display for BackupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            BackupErrorKind::DestinationNotWritable { path, source } => write!(
                f,
                "destination '{}' is not writable: {source}",
                path.display()
            ),
            BackupErrorKind::MissingSource { path } => {
                write!(f, "source '{}' does not exist", path.display())
            }
            BackupErrorKind::InvalidSnapshotName { name } => write!(
                f,
                "invalid historic directory name '{name}': it must be a single non-empty path component"
            ),
            BackupErrorKind::Scan(error) => fmt::Display::fmt(error, f),
            BackupErrorKind::Io {
                action,
                path,
                source,
            } => write!(f, "failed to {action} '{}': {source}", path.display()),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            BackupErrorKind::DestinationNotWritable { source, .. }
            | BackupErrorKind::Io { source, .. } => Some(source),
            BackupErrorKind::Scan(error) => Some(error),
            BackupErrorKind::MissingSource { .. } | BackupErrorKind::InvalidSnapshotName { .. } => {
                None
            }
        }
    }
}

/// Classification of fatal backup failures.
#[derive(Debug)]
pub enum BackupErrorKind {
    /// The destination root cannot be written.
    DestinationNotWritable {
        /// Destination root.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A source path does not exist.
    MissingSource {
        /// The missing path, made absolute.
        path: PathBuf,
    },
    /// The historic directory name is empty or contains a separator.
    InvalidSnapshotName {
        /// The rejected name.
        name: String,
    },
    /// Listing a tree failed.
    Scan(ScanError),
    /// Filesystem interaction failed.
    Io {
        /// Action being performed.
        action: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
}

impl BackupErrorKind {
    /// Returns the path tied to the failure, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::DestinationNotWritable { path, .. }
            | Self::MissingSource { path }
            | Self::Io { path, .. } => Some(path),
            Self::Scan(error) => Some(error.path()),
            Self::InvalidSnapshotName { .. } => None,
        }
    }
}
