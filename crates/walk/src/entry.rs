use crate::Timestamp;

/// A regular file reported by a [`crate::FileLister`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListedFile {
    relative_path: String,
    modified: Timestamp,
}

impl ListedFile {
    /// Creates a record for `relative_path` last modified at `modified`.
    #[must_use]
    pub fn new(relative_path: impl Into<String>, modified: Timestamp) -> Self {
        Self {
            relative_path: relative_path.into(),
            modified,
        }
    }

    /// Returns the `/`-separated path relative to the listing root.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Returns the modification time.
    #[must_use]
    pub const fn modified(&self) -> Timestamp {
        self.modified
    }

    /// Splits the record into its path and modification time.
    #[must_use]
    pub fn into_parts(self) -> (String, Timestamp) {
        (self.relative_path, self.modified)
    }
}
