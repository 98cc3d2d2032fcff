#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` is the command-line front-end of the backup workspace. It parses the
//! short-option surface (`-b`, `-u`/`-n`, `-f`, `-h`, `-H NAME`, `-x PATTERN`,
//! `-l FILE`, `-d`, `-q`, `-F`/`-s`, `-g`, `-c FILE`) with
//! [`clap`](https://docs.rs/clap/), merges it over an optional TOML
//! configuration file and hands the result to [`engine::BackupSession`].
//!
//! # Design
//!
//! - [`parse_args`] turns raw arguments into [`ParsedArgs`] without applying
//!   any defaults.
//! - [`BackupConfig`] owns every setting. It is loaded from a file when `-c`
//!   is given, then every option present on the command line overrides the
//!   loaded value regardless of argument order.
//! - [`run`] drives the whole process and returns the exit code, so the binary
//!   only needs to forward it.
//!
//! `-h` selects historic backups, which is why help and version are only
//! reachable through `--help` and `--version`.
//!
//! # Errors
//!
//! Argument, configuration and fatal backup errors exit with status `1`.
//! Per-file failures are logged as warnings and do not change the exit code.
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = cli::run(["backup", "only-one-path"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 1);
//! assert!(String::from_utf8(stderr).unwrap().contains("destination"));
//! ```

mod arguments;
mod command;
mod config;
mod execution;

pub use arguments::{ParsedArgs, parse_args};
pub use config::{BackupConfig, ConfigError, ListerChoice};
pub use execution::{run, run_with_console};

/// Name used in usage text and diagnostics.
pub const PROGRAM_NAME: &str = "backup";

/// Returns the one-line program banner printed by `--version` and logged at
/// the start of every run.
#[must_use]
pub fn header() -> String {
    format!(
        "{PROGRAM_NAME} v{} - incremental, permission-preserving backups",
        env!("CARGO_PKG_VERSION")
    )
}
