use std::path::Path;

use crate::{ListedFile, ScanError};

/// Produces the regular files beneath a root directory.
///
/// Implementations report paths relative to `root` using `/` separators and
/// never report symbolic links themselves. When `follow_symlinks` is set,
/// links to directories are descended into and links to regular files are
/// reported with the target's modification time.
///
/// Callers are expected to check that `root` exists first; a missing root is
/// reported as an error by every implementation.
pub trait FileLister: Send + Sync {
    /// Lists every regular file beneath `root`.
    fn list(&self, root: &Path, follow_symlinks: bool) -> Result<Vec<ListedFile>, ScanError>;
}

impl<T: FileLister + ?Sized> FileLister for &T {
    fn list(&self, root: &Path, follow_symlinks: bool) -> Result<Vec<ListedFile>, ScanError> {
        (**self).list(root, follow_symlinks)
    }
}

impl<T: FileLister + ?Sized> FileLister for Box<T> {
    fn list(&self, root: &Path, follow_symlinks: bool) -> Result<Vec<ListedFile>, ScanError> {
        (**self).list(root, follow_symlinks)
    }
}

impl<T: FileLister + ?Sized> FileLister for std::sync::Arc<T> {
    fn list(&self, root: &Path, follow_symlinks: bool) -> Result<Vec<ListedFile>, ScanError> {
        (**self).list(root, follow_symlinks)
    }
}
