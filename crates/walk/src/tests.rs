use super::*;
use filetime::{FileTime, set_file_mtime};
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::symlink;
use std::path::Path;

fn paths(files: &[ListedFile]) -> Vec<&str> {
    files.iter().map(ListedFile::relative_path).collect()
}

fn find_available() -> bool {
    std::process::Command::new("find")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}

#[test]
fn native_lists_regular_files_in_sorted_order() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    fs::create_dir_all(root.join("b/c")).expect("dirs");
    fs::create_dir(root.join("a")).expect("dir a");
    fs::write(root.join("z.txt"), b"z").expect("z");
    fs::write(root.join("a/one"), b"1").expect("one");
    fs::write(root.join("b/c/two"), b"2").expect("two");

    let files = NativeLister::new().list(root, false).expect("list");
    assert_eq!(paths(&files), ["a/one", "b/c/two", "z.txt"]);
}

#[test]
fn native_reports_exact_modification_time() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("f");
    fs::write(&file, b"x").expect("write");
    set_file_mtime(&file, FileTime::from_unix_time(1_600_000_000, 123_456_789)).expect("mtime");

    let files = NativeLister::new().list(temp.path(), false).expect("list");
    assert_eq!(
        files[0].modified(),
        Timestamp::from_parts(1_600_000_000, 123_456_789)
    );
}

#[test]
fn native_skips_symlinks_without_following() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    let outside = temp.path().join("outside");
    fs::create_dir(&root).expect("root");
    fs::create_dir(&outside).expect("outside");
    fs::write(outside.join("data"), b"d").expect("data");
    fs::write(root.join("real"), b"r").expect("real");
    symlink(&outside, root.join("dirlink")).expect("dir link");
    symlink(root.join("real"), root.join("filelink")).expect("file link");

    let files = NativeLister::new().list(&root, false).expect("list");
    assert_eq!(paths(&files), ["real"]);
}

#[test]
fn native_follows_symlinks_when_requested() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    let outside = temp.path().join("outside");
    fs::create_dir(&root).expect("root");
    fs::create_dir(&outside).expect("outside");
    fs::write(outside.join("data"), b"d").expect("data");
    fs::write(root.join("real"), b"r").expect("real");
    symlink(&outside, root.join("dirlink")).expect("dir link");
    symlink(root.join("real"), root.join("filelink")).expect("file link");
    symlink(root.join("missing"), root.join("dangling")).expect("dangling link");

    let files = NativeLister::new().list(&root, true).expect("list");
    assert_eq!(paths(&files), ["dirlink/data", "filelink", "real"]);
}

#[test]
fn native_skips_symlink_loops() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    fs::create_dir_all(root.join("sub")).expect("sub");
    fs::write(root.join("sub/file"), b"f").expect("file");
    symlink(&root, root.join("sub/loop")).expect("loop");

    let files = NativeLister::new().list(&root, true).expect("list");
    assert_eq!(paths(&files), ["sub/file"]);
}

#[test]
fn native_errors_when_root_missing() {
    let error = NativeLister::new()
        .list(Path::new("/nonexistent/path/for/lister"), false)
        .expect_err("missing root");
    assert!(matches!(error.kind(), ScanErrorKind::Metadata { .. }));
    assert_eq!(error.path(), Path::new("/nonexistent/path/for/lister"));
}

#[test]
fn native_rejects_non_utf8_names() {
    let temp = tempfile::tempdir().expect("tempdir");
    let name = std::ffi::OsStr::from_bytes(b"bad\xffname");
    if fs::write(temp.path().join(name), b"x").is_err() {
        return;
    }

    let error = NativeLister::new()
        .list(temp.path(), false)
        .expect_err("non-utf8");
    match error.kind() {
        ScanErrorKind::Encoding {
            offset, context, ..
        } => {
            assert_eq!(*offset, 3);
            assert_eq!(context, "bad\\xffname");
        }
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[test]
fn find_and_native_agree() {
    if !find_available() {
        return;
    }
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    fs::create_dir_all(root.join("d/e")).expect("dirs");
    fs::write(root.join("with space.txt"), b"s").expect("space");
    fs::write(root.join("d/e/deep"), b"d").expect("deep");
    set_file_mtime(root.join("d/e/deep"), FileTime::from_unix_time(1_500_000_000, 5))
        .expect("mtime");

    let mut from_find = FindLister::new().list(root, false).expect("find");
    from_find.sort_by(|a, b| a.relative_path().cmp(b.relative_path()));
    let native = NativeLister::new().list(root, false).expect("native");

    assert_eq!(from_find, native);
}

#[test]
fn find_failure_is_listing_failed() {
    if !find_available() {
        return;
    }
    let error = FindLister::new()
        .list(Path::new("/nonexistent/path/for/find"), false)
        .expect_err("missing root");
    assert!(matches!(error.kind(), ScanErrorKind::ListingFailed { .. }));
}

#[test]
fn listers_work_through_trait_objects() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("only"), b"o").expect("write");

    let boxed: Box<dyn FileLister> = Box::new(NativeLister::new());
    let files = boxed.list(temp.path(), false).expect("list");
    assert_eq!(paths(&files), ["only"]);
}
