//! Streaming encoders that wrap a destination writer.

use std::io::{self, Write};

use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;

use crate::{CompressionLevel, Compressor};

/// Writer that encodes everything written to it with a [`Compressor`].
///
/// The stream must be completed with [`Encoder::finish`]; dropping an
/// encoder without finishing it leaves a truncated stream behind.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use compress::{CompressionLevel, Compressor, Encoder, decompress_to_vec};
///
/// # fn main() -> std::io::Result<()> {
/// let mut encoder = Encoder::new(Compressor::Bzip2, Vec::new(), CompressionLevel::Best);
/// encoder.write_all(b"payload")?;
/// assert_eq!(encoder.bytes_in(), 7);
/// let stored = encoder.finish()?;
///
/// assert_eq!(decompress_to_vec(Compressor::Bzip2, &stored)?, b"payload");
/// # Ok(())
/// # }
/// ```
pub struct Encoder<W: Write> {
    inner: Inner<W>,
    bytes_in: u64,
}

enum Inner<W: Write> {
    Plain(W),
    Gzip(GzEncoder<W>),
    Bzip2(BzEncoder<W>),
}

impl<W: Write> Encoder<W> {
    /// Wraps `writer` with the encoder for `compressor`.
    pub fn new(compressor: Compressor, writer: W, level: CompressionLevel) -> Self {
        let inner = match compressor {
            Compressor::None => Inner::Plain(writer),
            Compressor::Gzip => Inner::Gzip(GzEncoder::new(writer, level.into())),
            Compressor::Bzip2 => Inner::Bzip2(BzEncoder::new(writer, level.into())),
        };
        Self { inner, bytes_in: 0 }
    }

    /// Returns the codec this encoder applies.
    #[must_use]
    pub const fn compressor(&self) -> Compressor {
        match self.inner {
            Inner::Plain(_) => Compressor::None,
            Inner::Gzip(_) => Compressor::Gzip,
            Inner::Bzip2(_) => Compressor::Bzip2,
        }
    }

    /// Returns the number of uncompressed bytes accepted so far.
    #[must_use]
    pub const fn bytes_in(&self) -> u64 {
        self.bytes_in
    }

    /// Writes the stream trailer, flushes, and returns the inner writer.
    pub fn finish(self) -> io::Result<W> {
        let mut writer = match self.inner {
            Inner::Plain(writer) => writer,
            Inner::Gzip(encoder) => encoder.finish()?,
            Inner::Bzip2(encoder) => encoder.finish()?,
        };
        writer.flush()?;
        Ok(writer)
    }
}

impl<W: Write> Write for Encoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = match &mut self.inner {
            Inner::Plain(writer) => writer.write(buf)?,
            Inner::Gzip(encoder) => encoder.write(buf)?,
            Inner::Bzip2(encoder) => encoder.write(buf)?,
        };
        self.bytes_in += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            Inner::Plain(writer) => writer.flush(),
            Inner::Gzip(encoder) => encoder.flush(),
            Inner::Bzip2(encoder) => encoder.flush(),
        }
    }
}

impl<W: Write> std::fmt::Debug for Encoder<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encoder")
            .field("compressor", &self.compressor())
            .field("bytes_in", &self.bytes_in)
            .finish_non_exhaustive()
    }
}

/// Compresses `input` into a new buffer.
pub fn compress_to_vec(
    compressor: Compressor,
    input: &[u8],
    level: CompressionLevel,
) -> io::Result<Vec<u8>> {
    let mut encoder = Encoder::new(compressor, Vec::new(), level);
    encoder.write_all(input)?;
    encoder.finish()
}
