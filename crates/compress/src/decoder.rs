//! Readers that undo an [`crate::Encoder`].

use std::io::{self, Read};

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;

use crate::Compressor;

/// Reader that decodes a stored stream back to the original bytes.
///
/// Concatenated members are decoded in sequence, matching the behaviour of
/// `gunzip` and `bunzip2`.
pub struct Decoder<R: Read> {
    inner: Inner<R>,
}

enum Inner<R: Read> {
    Plain(R),
    Gzip(MultiGzDecoder<R>),
    Bzip2(MultiBzDecoder<R>),
}

impl<R: Read> Decoder<R> {
    /// Wraps `reader` with the decoder for `compressor`.
    pub fn new(compressor: Compressor, reader: R) -> Self {
        let inner = match compressor {
            Compressor::None => Inner::Plain(reader),
            Compressor::Gzip => Inner::Gzip(MultiGzDecoder::new(reader)),
            Compressor::Bzip2 => Inner::Bzip2(MultiBzDecoder::new(reader)),
        };
        Self { inner }
    }
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            Inner::Plain(reader) => reader.read(buf),
            Inner::Gzip(decoder) => decoder.read(buf),
            Inner::Bzip2(decoder) => decoder.read(buf),
        }
    }
}

/// Decodes `stored` into a new buffer.
pub fn decompress_to_vec(compressor: Compressor, stored: &[u8]) -> io::Result<Vec<u8>> {
    let mut output = Vec::new();
    Decoder::new(compressor, stored).read_to_end(&mut output)?;
    Ok(output)
}
