use crate::error::MetadataError;
use crate::options::MetadataOptions;
use crate::ownership;
use filetime::{FileTime, set_file_times};
use rustix::fs::{self as unix_fs, Access, AtFlags, CWD};
use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

const OWNER_WRITE: u32 = 0o200;
const PERMISSION_BITS: u32 = 0o7777;

/// Copies owner, permission bits and timestamps from `metadata` onto
/// `destination`, in that order.
///
/// Every enabled step is attempted even when an earlier one fails; the
/// failures are returned so the caller can report them as warnings. An empty
/// vector means everything was preserved.
pub fn apply_file_metadata(
    metadata: &fs::Metadata,
    destination: &Path,
    options: &MetadataOptions,
) -> Vec<MetadataError> {
    let mut failures = Vec::new();

    if (options.owner() || options.group())
        && let Err(error) = set_owner_like(metadata, destination, options)
    {
        failures.push(error);
    }
    if options.permissions()
        && let Err(error) = set_permissions_like(metadata, destination)
    {
        failures.push(error);
    }
    if options.times()
        && let Err(error) = set_timestamp_like(metadata, destination)
    {
        failures.push(error);
    }

    failures
}

/// Changes the owner and/or group of `destination` to those in `metadata`.
pub fn set_owner_like(
    metadata: &fs::Metadata,
    destination: &Path,
    options: &MetadataOptions,
) -> Result<(), MetadataError> {
    let (owner, group) = ownership::copied_ids(metadata, options);
    if owner.is_none() && group.is_none() {
        return Ok(());
    }

    unix_fs::chownat(CWD, destination, owner, group, AtFlags::empty()).map_err(|error| {
        MetadataError::new("preserve ownership", destination, io::Error::from(error))
    })
}

/// Sets the permission bits of `destination` to those in `metadata`.
pub fn set_permissions_like(
    metadata: &fs::Metadata,
    destination: &Path,
) -> Result<(), MetadataError> {
    let mode = metadata.permissions().mode() & PERMISSION_BITS;
    fs::set_permissions(destination, fs::Permissions::from_mode(mode))
        .map_err(|error| MetadataError::new("preserve permissions", destination, error))
}

/// Sets the access and modification times of `destination` to those in
/// `metadata`.
pub fn set_timestamp_like(
    metadata: &fs::Metadata,
    destination: &Path,
) -> Result<(), MetadataError> {
    let accessed = FileTime::from_last_access_time(metadata);
    let modified = FileTime::from_last_modification_time(metadata);

    set_file_times(destination, accessed, modified)
        .map_err(|error| MetadataError::new("preserve timestamps", destination, error))
}

/// Adds the owner-write bit to `path` if it is missing.
///
/// A previous run may have copied a read-only mode onto a stored file; the
/// bit has to be restored before the file can be overwritten. Returns
/// whether the mode was changed.
pub fn ensure_owner_writable(path: &Path) -> Result<bool, MetadataError> {
    let mode = fs::metadata(path)
        .map_err(|error| MetadataError::new("inspect permissions of", path, error))?
        .permissions()
        .mode();
    if mode & OWNER_WRITE != 0 {
        return Ok(false);
    }

    fs::set_permissions(path, fs::Permissions::from_mode((mode | OWNER_WRITE) & PERMISSION_BITS))
        .map_err(|error| MetadataError::new("make writable", path, error))?;
    Ok(true)
}

/// Checks that the calling process may write into `path`.
pub fn check_writable(path: &Path) -> Result<(), MetadataError> {
    unix_fs::access(path, Access::WRITE_OK).map_err(|error| {
        MetadataError::new("write into", path, io::Error::from(error))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::MetadataExt;

    fn current_mode(path: &Path) -> u32 {
        fs::metadata(path).expect("metadata").permissions().mode() & PERMISSION_BITS
    }

    #[test]
    fn file_permissions_and_times_are_preserved() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("source");
        let dest = temp.path().join("dest");
        fs::write(&source, b"data").expect("write source");
        fs::write(&dest, b"data").expect("write dest");
        fs::set_permissions(&source, fs::Permissions::from_mode(0o640)).expect("source perms");

        let atime = FileTime::from_unix_time(1_700_000_100, 111);
        let mtime = FileTime::from_unix_time(1_700_000_200, 222);
        set_file_times(&source, atime, mtime).expect("source times");

        let metadata = fs::metadata(&source).expect("source metadata");
        let failures = apply_file_metadata(&metadata, &dest, &MetadataOptions::new());
        assert!(failures.is_empty(), "{failures:?}");

        let dest_meta = fs::metadata(&dest).expect("dest metadata");
        assert_eq!(current_mode(&dest), 0o640);
        assert_eq!(FileTime::from_last_modification_time(&dest_meta), mtime);
        assert_eq!(FileTime::from_last_access_time(&dest_meta), atime);
    }

    #[test]
    fn disabled_steps_are_skipped() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("source");
        let dest = temp.path().join("dest");
        fs::write(&source, b"data").expect("write source");
        fs::write(&dest, b"data").expect("write dest");
        fs::set_permissions(&source, fs::Permissions::from_mode(0o600)).expect("source perms");
        fs::set_permissions(&dest, fs::Permissions::from_mode(0o644)).expect("dest perms");

        let metadata = fs::metadata(&source).expect("source metadata");
        let options = MetadataOptions::new()
            .preserve_owner(false)
            .preserve_group(false)
            .preserve_permissions(false)
            .preserve_times(false);
        assert!(apply_file_metadata(&metadata, &dest, &options).is_empty());
        assert_eq!(current_mode(&dest), 0o644);
    }

    #[test]
    fn ownership_of_own_files_can_be_reapplied() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("source");
        let dest = temp.path().join("dest");
        fs::write(&source, b"data").expect("write source");
        fs::write(&dest, b"data").expect("write dest");

        let metadata = fs::metadata(&source).expect("source metadata");
        set_owner_like(&metadata, &dest, &MetadataOptions::new()).expect("chown to self");

        let dest_meta = fs::metadata(&dest).expect("dest metadata");
        assert_eq!(dest_meta.uid(), metadata.uid());
        assert_eq!(dest_meta.gid(), metadata.gid());
    }

    #[test]
    fn missing_destination_reports_every_step() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("source");
        fs::write(&source, b"data").expect("write source");
        let metadata = fs::metadata(&source).expect("source metadata");

        let failures = apply_file_metadata(
            &metadata,
            &temp.path().join("missing"),
            &MetadataOptions::new(),
        );
        let contexts: Vec<_> = failures.iter().map(MetadataError::context).collect();
        assert_eq!(
            contexts,
            ["preserve ownership", "preserve permissions", "preserve timestamps"]
        );
    }

    #[test]
    fn read_only_file_becomes_owner_writable() {
        let temp = tempfile::tempdir().expect("tempdir");
        let file = temp.path().join("ro");
        fs::write(&file, b"data").expect("write");
        fs::set_permissions(&file, fs::Permissions::from_mode(0o444)).expect("read-only");

        assert!(ensure_owner_writable(&file).expect("chmod"));
        assert_eq!(current_mode(&file), 0o644);
        assert!(!ensure_owner_writable(&file).expect("already writable"));
    }

    #[test]
    fn writability_check_reports_missing_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        check_writable(temp.path()).expect("tempdir is writable");

        let error = check_writable(&temp.path().join("missing")).expect_err("missing");
        assert_eq!(error.context(), "write into");
        assert_eq!(error.source_error().kind(), io::ErrorKind::NotFound);
    }
}
