#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` provides the activity logger shared by every backup component.
//! There is no process-wide logger: callers construct a [`Logger`] once and
//! pass clones of it to the scanner, the copy pipeline, the metadata store
//! and the session driver.
//!
//! # Design
//!
//! - [`Level`] orders records by severity (`Error` < `Warning` < `Info` <
//!   `Debug`).
//! - [`Verbosity`] translates the user-facing `debug_level` (0 to 2) into the
//!   console threshold.
//! - [`Logger`] is a cheap [`Clone`] handle. Records at or below the console
//!   threshold are written to the console writer; every record is appended
//!   to the optional log file regardless of the threshold.
//! - [`MemorySink`] is a shareable in-memory writer, mainly for tests.
//! - [`init_tracing`] installs a `tracing-subscriber` layer when `RUST_LOG`
//!   is set. Every logger record is mirrored as a `tracing` event with target
//!   `backup`, so the two views never disagree.
//!
//! # Invariants
//!
//! - Logging never fails and never panics. Write errors on the console or
//!   the log file are dropped.
//! - Lines are rendered as `YYYY-MM-DD HH:MM:SS.mmm message`, with a
//!   `warning:` or `error:` label for the two most severe levels.
//!
//! # Examples
//!
//! ```
//! use logging::{Level, Logger, MemorySink};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::with_writer(Level::Info, sink.clone());
//!
//! logger.info("scanning source");
//! logger.debug("hidden at info verbosity");
//! logger.warning("could not copy permissions");
//!
//! let output = sink.contents();
//! assert!(output.contains("scanning source"));
//! assert!(!output.contains("hidden"));
//! assert!(output.contains("warning: could not copy permissions"));
//! ```

mod levels;
mod logger;
mod sink;
mod tracing_bridge;

pub use levels::{Level, Verbosity, VerbosityError};
pub use logger::Logger;
pub use sink::MemorySink;
pub use tracing_bridge::init_tracing;
