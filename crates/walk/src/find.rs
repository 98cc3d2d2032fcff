use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::escaped_context;
use crate::{FileLister, ListedFile, ScanError, Timestamp};

const DEFAULT_PROGRAM: &str = "find";
const CONTEXT_RADIUS: usize = 40;

/// Lists files by running `find ROOT -type f -printf '%T@ %P\n'`.
///
/// File names containing a newline cannot be represented in this line
/// protocol; use [`crate::NativeLister`] for such trees.
#[derive(Clone, Debug)]
pub struct FindLister {
    program: OsString,
}

impl FindLister {
    /// Creates a lister that runs `find` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: OsString::from(DEFAULT_PROGRAM),
        }
    }

    /// Overrides the program invoked in place of `find`.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Returns the program that will be invoked.
    #[must_use]
    pub fn program(&self) -> &OsString {
        &self.program
    }

    fn command(&self, root: &Path, follow_symlinks: bool) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(if follow_symlinks { "-L" } else { "-P" })
            .arg(root)
            .args(["-type", "f", "-printf", "%T@ %P\n"])
            .stdin(Stdio::null());
        command
    }
}

impl Default for FindLister {
    fn default() -> Self {
        Self::new()
    }
}

impl FileLister for FindLister {
    fn list(&self, root: &Path, follow_symlinks: bool) -> Result<Vec<ListedFile>, ScanError> {
        tracing::debug!(
            target: "backup::walk",
            root = %root.display(),
            follow_symlinks,
            "running external lister"
        );
        let output = self.command(root, follow_symlinks).output().map_err(|error| {
            ScanError::spawn(
                root.to_path_buf(),
                self.program.to_string_lossy().into_owned(),
                error,
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            return Err(ScanError::listing_failed(
                root.to_path_buf(),
                output.status.code(),
                stderr,
            ));
        }

        parse_listing(root, &output.stdout)
    }
}

/// Parses `TIMESTAMP PATH` lines as printed by `find -printf '%T@ %P\n'`.
///
/// The whole listing must be valid UTF-8; otherwise the error carries the
/// byte offset of the first invalid byte and the escaped bytes around it.
/// A record with an empty path (the root itself being a regular file) is
/// skipped.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use walk::parse_listing;
///
/// let files = parse_listing(Path::new("/src"), b"10.5 a.txt\n11.0 dir/b c.txt\n").unwrap();
/// assert_eq!(files.len(), 2);
/// assert_eq!(files[1].relative_path(), "dir/b c.txt");
/// ```
pub fn parse_listing(root: &Path, output: &[u8]) -> Result<Vec<ListedFile>, ScanError> {
    let text = std::str::from_utf8(output).map_err(|error| {
        let offset = error.valid_up_to();
        ScanError::encoding(
            root.to_path_buf(),
            offset,
            escaped_context(output, offset, CONTEXT_RADIUS),
        )
    })?;

    let mut files = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if line.is_empty() {
            continue;
        }
        let malformed = || ScanError::malformed(root.to_path_buf(), index + 1, line.to_owned());
        let (stamp, path) = line.split_once(' ').ok_or_else(malformed)?;
        let modified: Timestamp = stamp.parse().map_err(|_| malformed())?;
        if path.is_empty() {
            continue;
        }
        files.push(ListedFile::new(path, modified));
    }
    Ok(files)
}
