use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Error produced when metadata preservation fails.
#[derive(Debug)]
pub struct MetadataError {
    context: &'static str,
    path: PathBuf,
    source: io::Error,
}

impl MetadataError {
    /// Creates a new [`MetadataError`] from the supplied context, path, and source error.
    pub(crate) fn new(context: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            context,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns the operation being performed when the error occurred.
    #[must_use]
    pub const fn context(&self) -> &'static str {
        self.context
    }

    /// Returns the path involved in the failing operation.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the underlying [`io::Error`] that triggered this failure.
    #[must_use]
    pub fn source_error(&self) -> &io::Error {
        &self.source
    }

    /// Consumes the error and returns its constituent parts.
    #[must_use]
    pub fn into_parts(self) -> (&'static str, PathBuf, io::Error) {
        (self.context, self.path, self.source)
    }
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to {} '{}': {}",
            self.context,
            self.path.display(),
            self.source
        )
    }
}

impl std::error::Error for MetadataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_operation_and_path() {
        let error = MetadataError::new(
            "preserve ownership",
            Path::new("/dest/file"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(
            error
                .to_string()
                .starts_with("failed to preserve ownership '/dest/file': ")
        );
        assert_eq!(error.context(), "preserve ownership");
        assert_eq!(
            error.source_error().kind(),
            io::ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn into_parts_returns_components() {
        let error = MetadataError::new("x", Path::new("p"), io::Error::other("boom"));
        let (context, path, source) = error.into_parts();
        assert_eq!(context, "x");
        assert_eq!(path, PathBuf::from("p"));
        assert_eq!(source.to_string(), "boom");
    }
}
