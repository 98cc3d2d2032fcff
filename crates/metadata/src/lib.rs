#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `metadata` copies POSIX attributes from a source file onto its stored
//! copy: owner and group via `chownat`, permission bits via
//! [`std::fs::set_permissions`], and access/modification times via
//! [`filetime`](https://docs.rs/filetime).
//!
//! # Design
//!
//! - [`apply_file_metadata`] runs the owner, permission and timestamp steps
//!   in that order, so a `chown` that clears set-id bits is followed by the
//!   mode being restored.
//! - [`MetadataOptions`] toggles each attribute.
//! - [`ensure_owner_writable`] and [`check_writable`] prepare a destination
//!   for writing.
//!
//! # Errors
//!
//! Failures are reported as [`MetadataError`] values carrying the attempted
//! operation and the path. None of them invalidate the file contents, so
//! callers usually log them and carry on.
//!
//! # Examples
//!
//! ```
//! use metadata::{MetadataOptions, apply_file_metadata};
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let source = temp.path().join("source.txt");
//! let copy = temp.path().join("copy.txt");
//! fs::write(&source, b"data")?;
//! fs::write(&copy, b"data")?;
//!
//! let failures = apply_file_metadata(&fs::metadata(&source)?, &copy, &MetadataOptions::new());
//! assert!(failures.is_empty());
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod apply;
mod error;
mod options;
mod ownership;

pub use apply::{
    apply_file_metadata, check_writable, ensure_owner_writable, set_owner_like,
    set_permissions_like, set_timestamp_like,
};
pub use error::MetadataError;
pub use options::MetadataOptions;
