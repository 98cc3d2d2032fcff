//! crates/logging/src/levels.rs
//! Severity levels and the console verbosity mapping.

use std::fmt;

/// Severity attached to every logger record.
///
/// Levels are ordered from most to least severe, so `record <= threshold`
/// decides whether the console shows a record.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Level {
    /// Fatal conditions that end the run.
    Error,
    /// Recoverable per-file problems.
    Warning,
    /// Progress of the run.
    Info,
    /// Per-file actions.
    Debug,
}

impl Level {
    /// Returns the lowercase label used when rendering records.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    /// Reports whether rendered lines carry the level label.
    ///
    /// Only warnings and errors are labelled; progress lines read better
    /// without a prefix.
    #[must_use]
    pub const fn is_labelled(self) -> bool {
        matches!(self, Self::Error | Self::Warning)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Console verbosity selected by the `debug_level` setting.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Verbosity {
    /// `debug_level = 0`: warnings and errors only.
    Quiet,
    /// `debug_level = 1`: progress information.
    #[default]
    Normal,
    /// `debug_level = 2`: every per-file action.
    Debug,
}

impl Verbosity {
    /// Converts a numeric debug level into a [`Verbosity`].
    pub fn from_debug_level(level: u8) -> Result<Self, VerbosityError> {
        match level {
            0 => Ok(Self::Quiet),
            1 => Ok(Self::Normal),
            2 => Ok(Self::Debug),
            other => Err(VerbosityError { level: other }),
        }
    }

    /// Returns the numeric debug level matching this verbosity.
    #[must_use]
    pub const fn debug_level(self) -> u8 {
        match self {
            Self::Quiet => 0,
            Self::Normal => 1,
            Self::Debug => 2,
        }
    }

    /// Returns the least severe [`Level`] shown on the console.
    #[must_use]
    pub const fn threshold(self) -> Level {
        match self {
            Self::Quiet => Level::Warning,
            Self::Normal => Level::Info,
            Self::Debug => Level::Debug,
        }
    }
}

impl From<Verbosity> for Level {
    fn from(verbosity: Verbosity) -> Self {
        verbosity.threshold()
    }
}

/// Error returned when a debug level falls outside `0..=2`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VerbosityError {
    level: u8,
}

impl VerbosityError {
    /// Returns the rejected level.
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }
}

impl fmt::Display for VerbosityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "debug level {} is outside the supported range 0-2",
            self.level
        )
    }
}

impl std::error::Error for VerbosityError {}
