//! Compression levels shared by both codecs.

use std::fmt;
use std::num::NonZeroU8;

/// Compression effort requested from the encoder.
///
/// Both gzip and bzip2 accept levels `1..=9`; [`CompressionLevel::Best`]
/// maps to `9` for either codec and is the default.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CompressionLevel {
    /// Favour the best possible compression ratio.
    #[default]
    Best,
    /// Use an explicit level in the range `1..=9`.
    Precise(NonZeroU8),
}

impl CompressionLevel {
    /// Creates a level from its numeric form.
    ///
    /// `9` yields [`CompressionLevel::Best`]; anything else in range is
    /// [`CompressionLevel::Precise`].
    ///
    /// ```
    /// use compress::CompressionLevel;
    ///
    /// assert_eq!(CompressionLevel::from_numeric(9), Ok(CompressionLevel::Best));
    /// assert_eq!(CompressionLevel::from_numeric(3).unwrap().numeric(), 3);
    /// assert!(CompressionLevel::from_numeric(0).is_err());
    /// assert!(CompressionLevel::from_numeric(10).is_err());
    /// ```
    pub fn from_numeric(level: u32) -> Result<Self, CompressionLevelError> {
        u8::try_from(level)
            .ok()
            .filter(|value| (1..=9).contains(value))
            .and_then(NonZeroU8::new)
            .map(|value| if value.get() == 9 { Self::Best } else { Self::Precise(value) })
            .ok_or(CompressionLevelError { level })
    }

    /// Returns the numeric level passed to the codec.
    #[must_use]
    pub const fn numeric(self) -> u32 {
        match self {
            Self::Best => 9,
            Self::Precise(value) => value.get() as u32,
        }
    }
}

impl From<CompressionLevel> for flate2::Compression {
    fn from(level: CompressionLevel) -> Self {
        match level {
            CompressionLevel::Best => Self::best(),
            CompressionLevel::Precise(_) => Self::new(level.numeric()),
        }
    }
}

impl From<CompressionLevel> for bzip2::Compression {
    fn from(level: CompressionLevel) -> Self {
        match level {
            CompressionLevel::Best => Self::best(),
            CompressionLevel::Precise(_) => Self::new(level.numeric()),
        }
    }
}

/// Error returned when a requested compression level falls outside `1..=9`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CompressionLevelError {
    level: u32,
}

impl CompressionLevelError {
    /// Returns the invalid compression level that triggered the error.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }
}

impl fmt::Display for CompressionLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "compression level {} is outside the supported range 1-9",
            self.level
        )
    }
}

impl std::error::Error for CompressionLevelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_maps_to_nine() {
        assert_eq!(flate2::Compression::from(CompressionLevel::Best).level(), 9);
        assert_eq!(bzip2::Compression::from(CompressionLevel::Best).level(), 9);
        assert_eq!(CompressionLevel::from_numeric(9), Ok(CompressionLevel::default()));
    }

    #[test]
    fn precise_levels_pass_through() {
        let level = CompressionLevel::from_numeric(4).unwrap();
        assert_eq!(flate2::Compression::from(level).level(), 4);
        assert_eq!(bzip2::Compression::from(level).level(), 4);
    }

    #[test]
    fn out_of_range_levels_are_rejected() {
        let err = CompressionLevel::from_numeric(300).unwrap_err();
        assert_eq!(err.level(), 300);
        assert_eq!(
            err.to_string(),
            "compression level 300 is outside the supported range 1-9"
        );
    }
}
