#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `compress` provides the codecs a backup can store file contents with:
//! gzip through [`flate2`](https://docs.rs/flate2) and bzip2 through
//! [`bzip2`](https://docs.rs/bzip2), plus the identity codec for literal
//! copies.
//!
//! # Design
//!
//! - [`Compressor`] names a codec, parses it from configuration text and owns
//!   the file-name suffix that codec adds to stored files.
//! - [`Encoder`] is a [`std::io::Write`] adapter that streams data through the
//!   selected codec; [`Decoder`] is the matching [`std::io::Read`] adapter.
//! - [`CompressionLevel`] maps a single effort setting onto both codecs.
//!
//! # Invariants
//!
//! - Decoding an encoded stream yields the original bytes exactly.
//! - Streams are finalised explicitly via [`Encoder::finish`], which writes
//!   the codec trailer and flushes the inner writer.
//! - Errors from the codec libraries are surfaced as [`std::io::Error`].
//!
//! # Examples
//!
//! ```
//! use compress::{CompressionLevel, Compressor, compress_to_vec, decompress_to_vec};
//!
//! # fn main() -> std::io::Result<()> {
//! let data = b"highly compressible payload ".repeat(64);
//! let stored = compress_to_vec(Compressor::Gzip, &data, CompressionLevel::Best)?;
//! assert!(stored.len() < data.len());
//! assert_eq!(decompress_to_vec(Compressor::Gzip, &stored)?, data);
//! # Ok(())
//! # }
//! ```

mod algorithm;
mod decoder;
mod encoder;
mod level;

pub use algorithm::{Compressor, CompressorParseError};
pub use decoder::{Decoder, decompress_to_vec};
pub use encoder::{Encoder, compress_to_vec};
pub use level::{CompressionLevel, CompressionLevelError};
