#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` compiles the user's exclusion patterns into matchers consulted
//! while scanning a tree. Patterns use the shell wildcards `*` and `?`; the
//! remaining characters are read as regular-expression syntax, with `.`
//! always literal. Every pattern is anchored at the *end* of the path
//! only: a path is excluded when the pattern matches any suffix of it.
//!
//! # Design
//!
//! - [`ExclusionPattern`] translates one glob into a regular expression:
//!   `.` becomes `\.`, `*` becomes `.*`, `?` becomes `.`, everything else
//!   is copied unchanged, and `$` is appended.
//! - [`ExclusionMatcher`] owns the compiled expressions and answers
//!   [`ExclusionMatcher::excluded`] with search semantics. The first match
//!   wins; the order of patterns never changes the answer.
//! - [`split_pattern_list`] expands comma-separated pattern lists as accepted
//!   on the command line.
//!
//! # Invariants
//!
//! - Matching is suffix-anchored and prefix-free: `*.tmp` excludes
//!   `foo.tmp` and `dir/foo.tmp` alike, and `log` excludes `changelog`.
//! - Matching operates on `/`-separated relative path strings exactly as
//!   produced by the directory lister; no normalisation is applied.
//! - An empty matcher excludes nothing.
//!
//! # Errors
//!
//! [`ExclusionMatcher::compile`] reports [`FilterError`] when the regex
//! engine rejects a translated pattern, for example an unclosed `[` class.
//!
//! # Examples
//!
//! ```
//! use filters::ExclusionMatcher;
//!
//! let matcher = ExclusionMatcher::compile(["*.tmp", "cache/?"]).expect("patterns compile");
//!
//! assert!(matcher.excluded("notes.tmp"));
//! assert!(matcher.excluded("deep/tree/notes.tmp"));
//! assert!(matcher.excluded("var/cache/a"));
//! assert!(!matcher.excluded("notes.tmp.bak"));
//! assert!(!matcher.excluded("var/cache/ab"));
//! ```

mod error;
mod matcher;
mod pattern;

pub use error::FilterError;
pub use matcher::ExclusionMatcher;
pub use pattern::{ExclusionPattern, split_pattern_list};
