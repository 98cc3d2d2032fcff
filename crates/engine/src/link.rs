//! Hardlinking unchanged files from the previous historic snapshot.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

/// What [`HardlinkLinker::link`] did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LinkOutcome {
    /// A new name was created for the previous snapshot's file.
    Linked,
    /// The snapshot already held a name for the same inode.
    AlreadyLinked,
}

/// Creates hardlinks from a previous snapshot into the current one.
///
/// A snapshot built this way shares every unchanged file's inode with its
/// predecessor, so a chain of snapshots costs one copy per distinct version.
#[derive(Clone, Copy, Debug, Default)]
pub struct HardlinkLinker;

impl HardlinkLinker {
    /// Creates a linker.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Makes `snapshot_file` another name for `previous_file`.
    ///
    /// Missing parent directories of `snapshot_file` are created on a
    /// best-effort basis; if that fails the link itself reports the error.
    pub fn link(&self, previous_file: &Path, snapshot_file: &Path) -> Result<LinkOutcome, LinkError> {
        if let Some(parent) = snapshot_file.parent() {
            let _ = fs::create_dir_all(parent);
        }

        match fs::hard_link(previous_file, snapshot_file) {
            Ok(()) => Ok(LinkOutcome::Linked),
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                if same_inode(previous_file, snapshot_file) {
                    Ok(LinkOutcome::AlreadyLinked)
                } else {
                    Err(LinkError::new(previous_file, snapshot_file, error))
                }
            }
            Err(error) => Err(LinkError::new(previous_file, snapshot_file, error)),
        }
    }
}

fn same_inode(left: &Path, right: &Path) -> bool {
    match (fs::metadata(left), fs::symlink_metadata(right)) {
        (Ok(left), Ok(right)) => left.dev() == right.dev() && left.ino() == right.ino(),
        _ => false,
    }
}

/// Hardlink creation failure.
///
/// Callers treat this as recoverable and fall back to copying the content.
#[derive(Debug)]
pub struct LinkError {
    previous: PathBuf,
    snapshot: PathBuf,
    source: io::Error,
}

impl LinkError {
    fn new(previous: &Path, snapshot: &Path, source: io::Error) -> Self {
        Self {
            previous: previous.to_path_buf(),
            snapshot: snapshot.to_path_buf(),
            source,
        }
    }

    /// Returns the file in the previous snapshot.
    #[must_use]
    pub fn previous(&self) -> &Path {
        &self.previous
    }

    /// Returns the name that could not be created.
    #[must_use]
    pub fn snapshot(&self) -> &Path {
        &self.snapshot
    }

    /// Returns the underlying error.
    #[must_use]
    pub const fn source_error(&self) -> &io::Error {
        &self.source
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to link '{}' to '{}': {}",
            self.snapshot.display(),
            self.previous.display(),
            self.source
        )
    }
}

impl Error for LinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_shares_inode_and_creates_parents() {
        let temp = tempfile::tempdir().unwrap();
        let previous = temp.path().join("old/data.gz");
        fs::create_dir_all(previous.parent().unwrap()).unwrap();
        fs::write(&previous, b"content").unwrap();
        let snapshot = temp.path().join("new/deep/data.gz");

        let outcome = HardlinkLinker::new().link(&previous, &snapshot).unwrap();

        assert_eq!(outcome, LinkOutcome::Linked);
        let left = fs::metadata(&previous).unwrap();
        let right = fs::metadata(&snapshot).unwrap();
        assert_eq!(left.ino(), right.ino());
        assert_eq!(left.nlink(), 2);
    }

    #[test]
    fn relinking_same_inode_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("f");
        fs::write(&file, b"x").unwrap();

        assert_eq!(
            HardlinkLinker::new().link(&file, &file).unwrap(),
            LinkOutcome::AlreadyLinked
        );
    }

    #[test]
    fn existing_different_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let previous = temp.path().join("a");
        let snapshot = temp.path().join("b");
        fs::write(&previous, b"a").unwrap();
        fs::write(&snapshot, b"b").unwrap();

        let error = HardlinkLinker::new().link(&previous, &snapshot).unwrap_err();
        assert_eq!(error.source_error().kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(error.snapshot(), snapshot);
    }

    #[test]
    fn missing_previous_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let error = HardlinkLinker::new()
            .link(&temp.path().join("gone"), &temp.path().join("new"))
            .unwrap_err();
        assert_eq!(error.source_error().kind(), io::ErrorKind::NotFound);
    }
}
