#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` implements incremental backups: it scans each source tree and
//! the matching destination mirror, classifies every file, streams new and
//! updated content through the selected compressor while carrying over
//! ownership, permission bits and timestamps, and removes stored files whose
//! source is gone. In historic mode every run writes a fresh snapshot
//! directory and hardlinks unchanged files from the previous one.
//!
//! # Design
//!
//! - [`TreeScanner`] turns a [`walk::FileLister`] listing into a
//!   [`Registry`], applying the run's [`filters::ExclusionMatcher`].
//! - [`diff`] partitions the source keys into new, updated and unchanged
//!   against the destination registry and collects the deletable keys.
//! - [`CopyPipeline`] writes one file and reports a [`FileOutcome`].
//! - [`HardlinkLinker`] links unchanged files into a snapshot.
//! - [`DeletionSweeper`] unlinks stored files of deleted sources.
//! - [`MetadataStore`] persists the name of the latest snapshot in
//!   [`METADATA_FILENAME`] under the destination root.
//! - [`BackupSession`] drives all of the above for each source path and
//!   returns a [`RunSummary`].
//!
//! # Invariants
//!
//! - Registry keys are source-relative paths; the stored name appends the
//!   codec's extension.
//! - A key enters the post-run registry only if its content is known to be
//!   in place.
//! - Historic runs never delete or modify files of earlier snapshots; a
//!   stored file shared with another snapshot is unlinked before rewriting.
//!
//! # Errors
//!
//! [`BackupError`] covers the failures that abort a run: an unwritable
//! destination, a missing source, a failed listing or an invalid snapshot
//! name. Everything per file is a logged warning.
//!
//! # Examples
//!
//! ```
//! use compress::Compressor;
//! use engine::{BackupMode, BackupOptions, BackupSession};
//! use logging::Logger;
//! use walk::NativeLister;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let source = temp.path().join("data");
//! std::fs::create_dir(&source)?;
//! std::fs::write(source.join("report.txt"), b"quarterly numbers")?;
//! let destination = temp.path().join("backup");
//! std::fs::create_dir(&destination)?;
//!
//! let options = BackupOptions::new()
//!     .compressor(Compressor::Bzip2)
//!     .mode(BackupMode::Historic { label: Some("first".into()) });
//! let session = BackupSession::new(&destination, options, NativeLister::new(), Logger::discard());
//! let summary = session.run(&[source])?;
//!
//! assert_eq!(summary.snapshot().map(|name| name.as_str()), Some("first"));
//! assert!(summary.paths()[0].mirror().join("report.txt.bz2").is_file());
//! # Ok(())
//! # }
//! ```

mod copy;
mod diff;
mod error;
mod layout;
mod link;
mod options;
mod registry;
mod scan;
mod session;
mod snapshot;
mod store;
mod summary;
mod sweep;

pub use copy::{CHUNK_SIZE, CopyFailure, CopyPipeline, FileOutcome, StepWarning};
pub use diff::{Classification, diff};
pub use error::{BackupError, BackupErrorKind, FATAL_EXIT_CODE};
pub use layout::{absolutize, mirror_path};
pub use metadata::MetadataOptions;
pub use link::{HardlinkLinker, LinkError, LinkOutcome};
pub use options::{BackupMode, BackupOptions};
pub use registry::Registry;
pub use scan::TreeScanner;
pub use session::BackupSession;
pub use snapshot::SnapshotName;
pub use store::{METADATA_FILENAME, Metadata, MetadataStore};
pub use summary::{PathSummary, RunSummary};
pub use sweep::{DeletionSweeper, SweepCounts};
