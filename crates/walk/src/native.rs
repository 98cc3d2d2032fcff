use std::ffi::OsString;
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::error::escaped_context;
use crate::{FileLister, ListedFile, ScanError};

const CONTEXT_RADIUS: usize = 40;

/// In-process depth-first lister.
///
/// Directory entries are sorted before they are visited so the listing order
/// is stable. With symlink following enabled, a link that leads back to one
/// of its own ancestors is skipped instead of being descended into again.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeLister;

impl NativeLister {
    /// Creates a new lister.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FileLister for NativeLister {
    fn list(&self, root: &Path, follow_symlinks: bool) -> Result<Vec<ListedFile>, ScanError> {
        TreeWalk::new(root, follow_symlinks)?.run()
    }
}

struct TreeWalk {
    follow_symlinks: bool,
    stack: Vec<DirectoryState>,
    files: Vec<ListedFile>,
}

impl TreeWalk {
    fn new(root: &Path, follow_symlinks: bool) -> Result<Self, ScanError> {
        tracing::debug!(
            target: "backup::walk",
            root = %root.display(),
            follow_symlinks,
            "walking tree in process"
        );
        let metadata = if follow_symlinks {
            fs::metadata(root)
        } else {
            fs::symlink_metadata(root)
        }
        .map_err(|error| ScanError::metadata(root.to_path_buf(), error))?;

        let mut walk = Self {
            follow_symlinks,
            stack: Vec::new(),
            files: Vec::new(),
        };
        if metadata.is_dir() {
            walk.push_directory(root.to_path_buf(), String::new())?;
        }
        Ok(walk)
    }

    fn run(mut self) -> Result<Vec<ListedFile>, ScanError> {
        loop {
            let Some(state) = self.stack.last_mut() else {
                return Ok(self.files);
            };
            let Some(name) = state.next_name() else {
                self.stack.pop();
                continue;
            };

            let full_path = state.fs_path.join(&name);
            let relative_path = relative_name(&state.fs_path, &state.relative_prefix, &name)?;
            self.visit(full_path, relative_path)?;
        }
    }

    fn visit(&mut self, full_path: PathBuf, relative_path: String) -> Result<(), ScanError> {
        let metadata = match fs::symlink_metadata(&full_path) {
            Ok(metadata) => metadata,
            // Removed between readdir and lstat.
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(error) => return Err(ScanError::metadata(full_path, error)),
        };
        let file_type = metadata.file_type();

        if file_type.is_dir() {
            return self.push_directory(full_path, relative_path);
        }
        if file_type.is_file() {
            self.record(relative_path, &metadata);
            return Ok(());
        }
        if !(file_type.is_symlink() && self.follow_symlinks) {
            return Ok(());
        }

        match fs::metadata(&full_path) {
            Ok(target) if target.is_dir() => self.push_directory(full_path, relative_path),
            Ok(target) if target.is_file() => {
                self.record(relative_path, &target);
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(target: "backup::walk", path = %full_path.display(), "dangling symlink");
                Ok(())
            }
            Err(error) => Err(ScanError::metadata(full_path, error)),
        }
    }

    fn record(&mut self, relative_path: String, metadata: &fs::Metadata) {
        let modified = FileTime::from_last_modification_time(metadata).into();
        self.files.push(ListedFile::new(relative_path, modified));
    }

    fn push_directory(&mut self, fs_path: PathBuf, relative_prefix: String) -> Result<(), ScanError> {
        let canonical = if self.follow_symlinks {
            let canonical = fs::canonicalize(&fs_path)
                .map_err(|error| ScanError::canonicalize(fs_path.clone(), error))?;
            if self
                .stack
                .iter()
                .any(|ancestor| ancestor.canonical.as_ref() == Some(&canonical))
            {
                tracing::debug!(
                    target: "backup::walk",
                    path = %fs_path.display(),
                    "skipping symlink loop"
                );
                return Ok(());
            }
            Some(canonical)
        } else {
            None
        };

        let state = DirectoryState::new(fs_path, canonical, relative_prefix)?;
        self.stack.push(state);
        Ok(())
    }
}

struct DirectoryState {
    fs_path: PathBuf,
    canonical: Option<PathBuf>,
    relative_prefix: String,
    entries: Vec<OsString>,
    index: usize,
}

impl DirectoryState {
    fn new(
        fs_path: PathBuf,
        canonical: Option<PathBuf>,
        relative_prefix: String,
    ) -> Result<Self, ScanError> {
        let read_dir =
            fs::read_dir(&fs_path).map_err(|error| ScanError::read_dir(fs_path.clone(), error))?;
        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|error| ScanError::read_dir(fs_path.clone(), error))?;
            entries.push(entry.file_name());
        }
        entries.sort();

        Ok(Self {
            fs_path,
            canonical,
            relative_prefix,
            entries,
            index: 0,
        })
    }

    fn next_name(&mut self) -> Option<OsString> {
        let name = self.entries.get(self.index).cloned();
        if name.is_some() {
            self.index += 1;
        }
        name
    }
}

fn relative_name(directory: &Path, prefix: &str, name: &OsString) -> Result<String, ScanError> {
    let mut bytes = Vec::with_capacity(prefix.len() + 1 + name.len());
    if !prefix.is_empty() {
        bytes.extend_from_slice(prefix.as_bytes());
        bytes.push(b'/');
    }
    bytes.extend_from_slice(name.as_bytes());

    String::from_utf8(bytes).map_err(|error| {
        let offset = error.utf8_error().valid_up_to();
        let bytes = error.into_bytes();
        ScanError::encoding(
            directory.to_path_buf(),
            offset,
            escaped_context(&bytes, offset, CONTEXT_RADIUS),
        )
    })
}
