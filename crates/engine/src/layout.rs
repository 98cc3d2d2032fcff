//! Placement of source trees inside the destination.

use std::path::{Component, Path, PathBuf};

/// Makes `path` absolute against `cwd` and removes `.` and `..` components
/// lexically, without consulting the filesystem.
///
/// ```
/// use std::path::Path;
/// use engine::absolutize;
///
/// assert_eq!(absolutize(Path::new("docs/../src/./lib"), Path::new("/home/me")),
///            Path::new("/home/me/src/lib"));
/// assert_eq!(absolutize(Path::new("/a/b/"), Path::new("/ignored")), Path::new("/a/b"));
/// ```
#[must_use]
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut normalized = PathBuf::from("/");
    for component in joined.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::ParentDir => {
                normalized.pop();
            }
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
        }
    }
    normalized
}

/// Returns where the absolute source path `source` is mirrored inside
/// `destination`, optionally below a snapshot directory.
///
/// ```
/// use std::path::Path;
/// use engine::mirror_path;
///
/// assert_eq!(mirror_path(Path::new("/backup"), None, Path::new("/home/me")),
///            Path::new("/backup/home/me"));
/// assert_eq!(mirror_path(Path::new("/backup"), Some("daily"), Path::new("/")),
///            Path::new("/backup/daily"));
/// ```
#[must_use]
pub fn mirror_path(destination: &Path, snapshot: Option<&str>, source: &Path) -> PathBuf {
    let mut mirror = destination.to_path_buf();
    if let Some(snapshot) = snapshot {
        mirror.push(snapshot);
    }
    for component in source.components() {
        if let Component::Normal(part) = component {
            mirror.push(part);
        }
    }
    mirror
}
