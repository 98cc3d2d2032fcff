use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use metadata::MetadataError;

/// Result of materialising one file in the destination.
///
/// Only [`FileOutcome::Failed`] prevents the file's key from entering the
/// next registry; warnings describe metadata that could not be carried over
/// while the content itself is in place.
#[derive(Debug)]
pub enum FileOutcome {
    /// Content and metadata were written.
    Copied {
        /// Uncompressed bytes read from the source.
        bytes: u64,
    },
    /// Content was written but one or more auxiliary steps failed.
    CopiedWithWarnings {
        /// Uncompressed bytes read from the source.
        bytes: u64,
        /// Failed auxiliary steps, in the order they ran.
        warnings: Vec<StepWarning>,
    },
    /// Content could not be written; no partial output remains.
    Failed(CopyFailure),
}

impl FileOutcome {
    pub(crate) fn completed(bytes: u64, warnings: Vec<StepWarning>) -> Self {
        if warnings.is_empty() {
            Self::Copied { bytes }
        } else {
            Self::CopiedWithWarnings { bytes, warnings }
        }
    }

    /// Reports whether the content reached the destination.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Returns the uncompressed byte count for successful copies.
    #[must_use]
    pub const fn bytes(&self) -> Option<u64> {
        match self {
            Self::Copied { bytes } | Self::CopiedWithWarnings { bytes, .. } => Some(*bytes),
            Self::Failed(_) => None,
        }
    }

    /// Returns the auxiliary warnings, empty unless the outcome carries some.
    #[must_use]
    pub fn warnings(&self) -> &[StepWarning] {
        match self {
            Self::CopiedWithWarnings { warnings, .. } => warnings,
            Self::Copied { .. } | Self::Failed(_) => &[],
        }
    }
}

/// Auxiliary step of a copy that failed without invalidating the content.
#[derive(Debug)]
pub struct StepWarning {
    action: &'static str,
    path: PathBuf,
    source: io::Error,
}

impl StepWarning {
    pub(crate) fn new(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Describes the step, e.g. `"preserve ownership"`.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        self.action
    }

    /// Returns the path the step operated on.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the underlying error.
    #[must_use]
    pub const fn source_error(&self) -> &io::Error {
        &self.source
    }
}

impl From<MetadataError> for StepWarning {
    fn from(error: MetadataError) -> Self {
        let (action, path, source) = error.into_parts();
        Self {
            action,
            path,
            source,
        }
    }
}

impl fmt::Display for StepWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to {} '{}': {}",
            self.action,
            self.path.display(),
            self.source
        )
    }
}

impl Error for StepWarning {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Reason a file's content could not be written.
#[derive(Debug)]
pub struct CopyFailure {
    action: &'static str,
    path: PathBuf,
    source: io::Error,
}

impl CopyFailure {
    pub(crate) fn new(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Describes the failed action, e.g. `"read"`.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        self.action
    }

    /// Returns the path the action operated on.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the underlying error.
    #[must_use]
    pub const fn source_error(&self) -> &io::Error {
        &self.source
    }
}

impl fmt::Display for CopyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to {} '{}': {}",
            self.action,
            self.path.display(),
            self.source
        )
    }
}

impl Error for CopyFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_without_warnings_is_plain_copy() {
        let outcome = FileOutcome::completed(12, Vec::new());
        assert!(matches!(outcome, FileOutcome::Copied { bytes: 12 }));
        assert!(outcome.warnings().is_empty());
    }

    #[test]
    fn completed_with_warnings_keeps_them() {
        let warning = StepWarning::new(
            "preserve ownership",
            Path::new("/dest/f"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        let outcome = FileOutcome::completed(3, vec![warning]);
        assert!(outcome.is_success());
        assert_eq!(outcome.bytes(), Some(3));
        assert_eq!(outcome.warnings().len(), 1);
        assert_eq!(outcome.warnings()[0].action(), "preserve ownership");
    }

    #[test]
    fn failure_is_not_success() {
        let outcome = FileOutcome::Failed(CopyFailure::new(
            "open",
            Path::new("/src/f"),
            io::Error::from(io::ErrorKind::NotFound),
        ));
        assert!(!outcome.is_success());
        assert_eq!(outcome.bytes(), None);
    }

    #[test]
    fn display_names_action_and_path() {
        let failure = CopyFailure::new("write", Path::new("/dest/f.gz"), io::Error::other("disk full"));
        assert_eq!(failure.to_string(), "failed to write '/dest/f.gz': disk full");
    }
}
