#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` lists the regular files beneath a directory together with their
//! modification times. The backup engine consumes these listings through the
//! [`FileLister`] trait, so tests can substitute a fake while production runs
//! use either the external `find` program or the in-process walker.
//!
//! # Design
//!
//! - [`FindLister`] runs `find -L|-P ROOT -type f -printf '%T@ %P\n'` and
//!   parses its output with [`parse_listing`].
//! - [`NativeLister`] performs a depth-first traversal with sorted directory
//!   entries, mirroring the filters `find` applies: regular files only,
//!   directory symlinks descended into only when following is requested.
//! - [`Timestamp`] stores modification times as integer nanoseconds so
//!   equality is exact and both listers agree on the value.
//!
//! # Invariants
//!
//! - Listed paths are relative to the root, use `/` separators and never
//!   begin with `/` or contain `..` segments.
//! - Symbolic links are never listed as themselves.
//! - Listing never panics; failures are reported via [`ScanError`].
//!
//! # Errors
//!
//! Every [`ScanError`] aborts the listing. The [`ScanErrorKind::Encoding`]
//! variant reports the byte offset of the first invalid UTF-8 byte along
//! with up to forty escaped bytes on each side.
//!
//! # Examples
//!
//! ```
//! use std::fs;
//! use walk::{FileLister, NativeLister};
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! fs::create_dir(temp.path().join("nested"))?;
//! fs::write(temp.path().join("top.txt"), b"data")?;
//! fs::write(temp.path().join("nested/inner.txt"), b"data")?;
//!
//! let files = NativeLister::new().list(temp.path(), false)?;
//! let paths: Vec<_> = files.iter().map(|file| file.relative_path()).collect();
//! assert_eq!(paths, ["nested/inner.txt", "top.txt"]);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod entry;
mod error;
mod find;
mod lister;
mod native;
mod timestamp;

pub use entry::ListedFile;
pub use error::{ScanError, ScanErrorKind};
pub use find::{FindLister, parse_listing};
pub use lister::FileLister;
pub use native::NativeLister;
pub use timestamp::{Timestamp, TimestampParseError};

#[cfg(test)]
mod tests;
