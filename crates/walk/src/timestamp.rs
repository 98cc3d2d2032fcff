use std::error::Error;
use std::fmt;
use std::str::FromStr;

use filetime::FileTime;

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const FRACTION_DIGITS: usize = 9;

/// Modification time of a listed file, in nanoseconds since the Unix epoch.
///
/// Timestamps compare exactly: two values differing by a single nanosecond
/// are different. The textual form is `SECONDS.FRACTION`, the same shape
/// `find -printf '%T@'` emits, so listings from the external lister and the
/// in-process walker agree.
///
/// # Examples
///
/// ```
/// use walk::Timestamp;
///
/// let parsed: Timestamp = "1700000000.1234567890".parse().unwrap();
/// assert_eq!(parsed.as_nanos(), 1_700_000_000_123_456_789);
/// assert_eq!(parsed.to_string(), "1700000000.123456789");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Timestamp(i128);

impl Timestamp {
    /// The Unix epoch.
    pub const EPOCH: Self = Self(0);

    /// Builds a timestamp from a nanosecond count.
    #[must_use]
    pub const fn from_nanos(nanos: i128) -> Self {
        Self(nanos)
    }

    /// Builds a timestamp from whole seconds and a sub-second nanosecond part.
    #[must_use]
    pub const fn from_parts(seconds: i64, nanos: u32) -> Self {
        Self(seconds as i128 * NANOS_PER_SECOND + nanos as i128)
    }

    /// Returns the nanoseconds since the Unix epoch.
    #[must_use]
    pub const fn as_nanos(self) -> i128 {
        self.0
    }

    /// Converts into a [`FileTime`] suitable for `filetime::set_file_mtime`.
    #[must_use]
    pub fn to_file_time(self) -> FileTime {
        let seconds = self.0.div_euclid(NANOS_PER_SECOND) as i64;
        let nanos = self.0.rem_euclid(NANOS_PER_SECOND) as u32;
        FileTime::from_unix_time(seconds, nanos)
    }
}

impl From<FileTime> for Timestamp {
    fn from(time: FileTime) -> Self {
        Self::from_parts(time.unix_seconds(), time.nanoseconds())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let nanos_per_second = NANOS_PER_SECOND.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:09}",
            magnitude / nanos_per_second,
            magnitude % nanos_per_second
        )
    }
}

impl FromStr for Timestamp {
    type Err = TimestampParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || TimestampParseError {
            text: text.to_owned(),
        };

        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (seconds, fraction) = body.split_once('.').unwrap_or((body, ""));
        if seconds.is_empty()
            || !seconds.bytes().all(|byte| byte.is_ascii_digit())
            || !fraction.bytes().all(|byte| byte.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: i128 = seconds.parse().map_err(|_| invalid())?;
        let mut nanos: i128 = 0;
        for position in 0..FRACTION_DIGITS {
            let digit = fraction.as_bytes().get(position).map_or(0, |byte| byte - b'0');
            nanos = nanos * 10 + i128::from(digit);
        }

        let total = whole
            .checked_mul(NANOS_PER_SECOND)
            .and_then(|value| value.checked_add(nanos))
            .ok_or_else(invalid)?;
        Ok(Self(if negative { -total } else { total }))
    }
}

/// Error returned when a listing timestamp is not in `SECONDS.FRACTION` form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimestampParseError {
    text: String,
}

impl TimestampParseError {
    /// Returns the rejected text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for TimestampParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid modification time '{}'", self.text)
    }
}

impl Error for TimestampParseError {}
