//! Historic snapshot directory names.

use std::fmt;

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::BackupError;
use crate::store::METADATA_FILENAME;

const SNAPSHOT_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day][hour][minute][second]");

/// Name of a historic snapshot directory directly under the destination root.
///
/// A name is a single path component that is neither `.`, `..` nor the
/// metadata file name.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SnapshotName(String);

impl SnapshotName {
    /// Validates an operator-supplied label.
    ///
    /// ```
    /// use engine::SnapshotName;
    ///
    /// assert_eq!(SnapshotName::from_label("weekly").unwrap().as_str(), "weekly");
    /// assert!(SnapshotName::from_label("a/b").is_err());
    /// assert!(SnapshotName::from_label("..").is_err());
    /// ```
    pub fn from_label(label: impl Into<String>) -> Result<Self, BackupError> {
        let label = label.into();
        if label.is_empty()
            || label.contains('/')
            || label.contains('\0')
            || label == "."
            || label == ".."
            || label == METADATA_FILENAME
        {
            return Err(BackupError::invalid_snapshot_name(label));
        }
        Ok(Self(label))
    }

    /// Names a snapshot after `moment` as `YYYYMMDDHHMMSS`.
    #[must_use]
    pub fn from_time(moment: OffsetDateTime) -> Self {
        let name = moment
            .format(SNAPSHOT_FORMAT)
            .unwrap_or_else(|_| moment.unix_timestamp().to_string());
        Self(name)
    }

    /// Names a snapshot after the current local time, or UTC when the local
    /// offset cannot be determined.
    #[must_use]
    pub fn now() -> Self {
        Self::from_time(OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()))
    }

    /// Returns the directory name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SnapshotName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
