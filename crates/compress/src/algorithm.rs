//! Enumeration of the codecs a backup destination can be stored with.

use core::fmt;
use core::str::FromStr;

/// Codec applied to file contents as they are written to the destination.
///
/// The codec decides the stored file name: `notes.txt` is stored as
/// `notes.txt.gz` under [`Compressor::Gzip`] and as `notes.txt` under
/// [`Compressor::None`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Compressor {
    /// Contents are copied byte for byte.
    None,
    /// gzip (RFC 1952) via `flate2`.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "gz"))]
    Gzip,
    /// bzip2 via the `bzip2` crate.
    #[cfg_attr(feature = "serde", serde(alias = "bzip", alias = "bz2"))]
    Bzip2,
}

impl Compressor {
    /// Every codec, in the order they are documented.
    pub const ALL: [Self; 3] = [Self::None, Self::Gzip, Self::Bzip2];

    /// Returns the canonical name used in configuration files and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
        }
    }

    /// Returns the suffix appended to stored file names, including the dot.
    ///
    /// ```
    /// use compress::Compressor;
    ///
    /// assert_eq!(Compressor::Gzip.extension(), ".gz");
    /// assert_eq!(Compressor::Bzip2.extension(), ".bz2");
    /// assert_eq!(Compressor::None.extension(), "");
    /// ```
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Gzip => ".gz",
            Self::Bzip2 => ".bz2",
        }
    }

    /// Reports whether contents pass through an encoder.
    #[must_use]
    pub const fn is_compressing(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Appends [`Self::extension`] to a relative path.
    #[must_use]
    pub fn stored_name(self, relative_path: &str) -> String {
        let mut stored = String::with_capacity(relative_path.len() + self.extension().len());
        stored.push_str(relative_path);
        stored.push_str(self.extension());
        stored
    }

    /// Removes [`Self::extension`] from a stored name.
    ///
    /// Returns `None` when the name does not carry this codec's suffix or
    /// when nothing would remain after stripping it.
    ///
    /// ```
    /// use compress::Compressor;
    ///
    /// assert_eq!(Compressor::Gzip.strip_extension("a/b.txt.gz"), Some("a/b.txt"));
    /// assert_eq!(Compressor::Gzip.strip_extension("a/b.txt"), None);
    /// assert_eq!(Compressor::None.strip_extension("a/b.txt"), Some("a/b.txt"));
    /// ```
    #[must_use]
    pub fn strip_extension(self, stored_name: &str) -> Option<&str> {
        stored_name
            .strip_suffix(self.extension())
            .filter(|stripped| !stripped.is_empty() && !stripped.ends_with('/'))
    }
}

impl fmt::Display for Compressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a codec name is not recognised.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unsupported compressor '{input}' (expected none, gzip or bzip2)")]
pub struct CompressorParseError {
    input: String,
}

impl CompressorParseError {
    /// Returns the rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl FromStr for Compressor {
    type Err = CompressorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "gzip" | "gz" => Ok(Self::Gzip),
            "bzip2" | "bzip" | "bz2" => Ok(Self::Bzip2),
            _ => Err(CompressorParseError {
                input: s.to_owned(),
            }),
        }
    }
}
