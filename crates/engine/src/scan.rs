//! Turning directory listings into registries.

use std::fs;
use std::io;
use std::path::Path;

use compress::Compressor;
use filters::ExclusionMatcher;
use logging::Logger;
use walk::{FileLister, ScanError};

use crate::Registry;

/// Lists a tree through a [`FileLister`] and filters it into a [`Registry`].
///
/// A missing root is not an error: it yields an empty registry, which is the
/// normal state of a destination before its first backup.
pub struct TreeScanner<'a> {
    lister: &'a dyn FileLister,
    matcher: &'a ExclusionMatcher,
    follow_symlinks: bool,
    ignored: Vec<String>,
    logger: Logger,
}

impl<'a> TreeScanner<'a> {
    /// Creates a scanner that lists with `lister` and drops paths `matcher`
    /// excludes.
    pub fn new(
        lister: &'a dyn FileLister,
        matcher: &'a ExclusionMatcher,
        follow_symlinks: bool,
        logger: Logger,
    ) -> Self {
        Self {
            lister,
            matcher,
            follow_symlinks,
            ignored: Vec::new(),
            logger,
        }
    }

    /// Adds a relative name the scanner never reports, such as the metadata
    /// file living in the destination root.
    #[must_use]
    pub fn ignoring(mut self, relative_name: impl Into<String>) -> Self {
        self.ignored.push(relative_name.into());
        self
    }

    /// Scans a source tree. Keys are the listed relative paths.
    pub fn scan(&self, root: &Path) -> Result<Registry, ScanError> {
        let mut registry = Registry::new(Compressor::None);
        for (relative_path, modified) in self.list(root)? {
            if self.matcher.excluded(&relative_path) {
                self.logger.debug(format_args!("excluded: {relative_path}"));
                continue;
            }
            registry.insert(relative_path, modified);
        }
        Ok(registry)
    }

    /// Scans a tree of stored files written with `codec`.
    ///
    /// Each stored name has the codec's extension stripped to recover its
    /// key, and exclusions are matched against that key. Names without the
    /// extension are recorded as foreign.
    pub fn scan_stored(&self, root: &Path, codec: Compressor) -> Result<Registry, ScanError> {
        let mut registry = Registry::new(codec);
        for (stored_name, modified) in self.list(root)? {
            match codec.strip_extension(&stored_name) {
                Some(key) if self.matcher.excluded(key) => {
                    self.logger.debug(format_args!("excluded: {stored_name}"));
                }
                Some(key) => {
                    registry.insert(key, modified);
                }
                None => registry.insert_foreign(stored_name),
            }
        }
        Ok(registry)
    }

    fn list(
        &self,
        root: &Path,
    ) -> Result<impl Iterator<Item = (String, walk::Timestamp)> + '_, ScanError> {
        let files = match fs::symlink_metadata(root) {
            Err(error) if error.kind() == io::ErrorKind::NotFound => Vec::new(),
            _ => self.lister.list(root, self.follow_symlinks)?,
        };
        self.logger.debug(format_args!(
            "listed {} files under {}",
            files.len(),
            root.display()
        ));

        Ok(files
            .into_iter()
            .map(walk::ListedFile::into_parts)
            .filter(|(relative_path, _)| !self.ignored.contains(relative_path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use walk::{ListedFile, Timestamp};

    struct FakeLister {
        files: Vec<ListedFile>,
        calls: Mutex<Vec<(PathBuf, bool)>>,
    }

    impl FakeLister {
        fn new(paths: &[&str]) -> Self {
            Self {
                files: paths
                    .iter()
                    .map(|path| ListedFile::new(*path, Timestamp::from_parts(7, 0)))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl FileLister for FakeLister {
        fn list(&self, root: &Path, follow_symlinks: bool) -> Result<Vec<ListedFile>, ScanError> {
            self.calls
                .lock()
                .unwrap()
                .push((root.to_path_buf(), follow_symlinks));
            Ok(self.files.clone())
        }
    }

    fn existing_root() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn missing_root_yields_empty_registry_without_listing() {
        let lister = FakeLister::new(&["a"]);
        let matcher = ExclusionMatcher::empty();
        let scanner = TreeScanner::new(&lister, &matcher, false, Logger::discard());

        let registry = scanner.scan(Path::new("/nonexistent/scan/root")).unwrap();
        assert!(registry.is_empty());
        assert!(lister.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn excluded_paths_are_dropped() {
        let root = existing_root();
        let lister = FakeLister::new(&["keep.txt", "drop.tmp", "dir/drop.tmp"]);
        let matcher = ExclusionMatcher::compile(["*.tmp"]).unwrap();
        let scanner = TreeScanner::new(&lister, &matcher, true, Logger::discard());

        let registry = scanner.scan(root.path()).unwrap();
        assert_eq!(registry.keys().collect::<Vec<_>>(), ["keep.txt"]);
        assert!(lister.calls.lock().unwrap()[0].1);
    }

    #[test]
    fn stored_scan_strips_extension_and_collects_foreign_names() {
        let root = existing_root();
        let lister = FakeLister::new(&["a.txt.gz", "b.txt", "c.tmp.gz"]);
        let matcher = ExclusionMatcher::compile(["*.tmp"]).unwrap();
        let scanner = TreeScanner::new(&lister, &matcher, false, Logger::discard());

        let registry = scanner.scan_stored(root.path(), Compressor::Gzip).unwrap();
        assert_eq!(registry.keys().collect::<Vec<_>>(), ["a.txt"]);
        assert_eq!(registry.foreign().collect::<Vec<_>>(), ["b.txt"]);
        assert_eq!(registry.codec(), Compressor::Gzip);
    }

    #[test]
    fn ignored_names_are_never_reported() {
        let root = existing_root();
        let lister = FakeLister::new(&[".backup.metadata", "data"]);
        let matcher = ExclusionMatcher::empty();
        let scanner =
            TreeScanner::new(&lister, &matcher, false, Logger::discard()).ignoring(".backup.metadata");

        let registry = scanner.scan_stored(root.path(), Compressor::None).unwrap();
        assert_eq!(registry.keys().collect::<Vec<_>>(), ["data"]);
        assert_eq!(registry.foreign().count(), 0);
    }
}
