use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Error returned when a tree cannot be listed.
///
/// Every variant is fatal for the run: a partial listing would make present
/// files look deleted.
#[derive(Debug)]
pub struct ScanError {
    kind: ScanErrorKind,
}

impl ScanError {
    pub(crate) fn new(kind: ScanErrorKind) -> Self {
        Self { kind }
    }

    pub(crate) fn spawn(root: PathBuf, program: String, source: io::Error) -> Self {
        Self::new(ScanErrorKind::Spawn {
            root,
            program,
            source,
        })
    }

    pub(crate) fn listing_failed(root: PathBuf, code: Option<i32>, stderr: String) -> Self {
        Self::new(ScanErrorKind::ListingFailed { root, code, stderr })
    }

    pub(crate) fn encoding(root: PathBuf, offset: usize, context: String) -> Self {
        Self::new(ScanErrorKind::Encoding {
            root,
            offset,
            context,
        })
    }

    pub(crate) fn malformed(root: PathBuf, line: usize, record: String) -> Self {
        Self::new(ScanErrorKind::MalformedRecord { root, line, record })
    }

    pub(crate) fn read_dir(path: PathBuf, source: io::Error) -> Self {
        Self::new(ScanErrorKind::ReadDir { path, source })
    }

    pub(crate) fn metadata(path: PathBuf, source: io::Error) -> Self {
        Self::new(ScanErrorKind::Metadata { path, source })
    }

    pub(crate) fn canonicalize(path: PathBuf, source: io::Error) -> Self {
        Self::new(ScanErrorKind::Canonicalize { path, source })
    }

    /// Returns the specific failure that aborted the listing.
    #[must_use]
    pub fn kind(&self) -> &ScanErrorKind {
        &self.kind
    }

    /// Returns the filesystem path associated with the error.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.kind.path()
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ScanErrorKind::Spawn {
                root,
                program,
                source,
            } => write!(
                f,
                "failed to run '{program}' to list '{}': {source}",
                root.display()
            ),
            ScanErrorKind::ListingFailed { root, code, stderr } => {
                match code {
                    Some(code) => write!(
                        f,
                        "listing '{}' failed with exit status {code}",
                        root.display()
                    )?,
                    None => write!(
                        f,
                        "listing '{}' was terminated by a signal",
                        root.display()
                    )?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {stderr}")?;
                }
                Ok(())
            }
            ScanErrorKind::Encoding {
                root,
                offset,
                context,
            } => write!(
                f,
                "listing '{}' contains a file name that is not valid UTF-8 at byte {offset} (near \"{context}\")",
                root.display()
            ),
            ScanErrorKind::MalformedRecord { root, line, record } => write!(
                f,
                "listing '{}' has a malformed record on line {line}: \"{record}\"",
                root.display()
            ),
            ScanErrorKind::ReadDir { path, source } => {
                write!(f, "failed to read directory '{}': {source}", path.display())
            }
            ScanErrorKind::Metadata { path, source } => write!(
                f,
                "failed to inspect metadata for '{}': {source}",
                path.display()
            ),
            ScanErrorKind::Canonicalize { path, source } => {
                write!(f, "failed to canonicalize '{}': {source}", path.display())
            }
        }
    }
}

impl Error for ScanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            ScanErrorKind::Spawn { source, .. }
            | ScanErrorKind::ReadDir { source, .. }
            | ScanErrorKind::Metadata { source, .. }
            | ScanErrorKind::Canonicalize { source, .. } => Some(source),
            ScanErrorKind::ListingFailed { .. }
            | ScanErrorKind::Encoding { .. }
            | ScanErrorKind::MalformedRecord { .. } => None,
        }
    }
}

/// Classification of listing failures.
#[derive(Debug)]
pub enum ScanErrorKind {
    /// The external lister could not be started.
    Spawn {
        /// Root that was being listed.
        root: PathBuf,
        /// Program that failed to start.
        program: String,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// The external lister exited unsuccessfully.
    ListingFailed {
        /// Root that was being listed.
        root: PathBuf,
        /// Exit status, or `None` when the process was killed by a signal.
        code: Option<i32>,
        /// Trimmed diagnostic output of the lister.
        stderr: String,
    },
    /// A listed file name is not valid UTF-8.
    Encoding {
        /// Root that was being listed.
        root: PathBuf,
        /// Byte offset of the first invalid byte within the listing.
        offset: usize,
        /// Escaped bytes surrounding the offset.
        context: String,
    },
    /// A listing line is not in `TIMESTAMP PATH` form.
    MalformedRecord {
        /// Root that was being listed.
        root: PathBuf,
        /// One-based line number of the record.
        line: usize,
        /// The offending record.
        record: String,
    },
    /// Failed to read the contents of a directory.
    ReadDir {
        /// Directory whose contents could not be read.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// Failed to retrieve metadata for an entry.
    Metadata {
        /// Path whose metadata could not be retrieved.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// Failed to canonicalize a directory while guarding against cycles.
    Canonicalize {
        /// Directory path that failed to canonicalize.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
}

impl ScanErrorKind {
    /// Returns the filesystem path tied to the failure.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Spawn { root, .. }
            | Self::ListingFailed { root, .. }
            | Self::Encoding { root, .. }
            | Self::MalformedRecord { root, .. } => root,
            Self::ReadDir { path, .. }
            | Self::Metadata { path, .. }
            | Self::Canonicalize { path, .. } => path,
        }
    }
}

/// Escapes up to `radius` bytes on each side of `offset` for diagnostics.
pub(crate) fn escaped_context(bytes: &[u8], offset: usize, radius: usize) -> String {
    let start = offset.saturating_sub(radius);
    let end = offset.saturating_add(radius).min(bytes.len());
    bytes[start.min(end)..end].escape_ascii().to_string()
}
