use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use compress::{CompressionLevel, Compressor, Encoder};
use metadata::{MetadataOptions, apply_file_metadata, ensure_owner_writable};

use super::{CHUNK_SIZE, CopyFailure, FileOutcome, StepWarning};

/// Writes source files into the destination through a fixed codec.
///
/// A pipeline owns its read buffer, allocated on first use and reused for
/// every later file. Parallel copies give each worker its own pipeline.
///
/// # Examples
///
/// ```
/// use compress::{Compressor, decompress_to_vec};
/// use engine::CopyPipeline;
///
/// # fn main() -> std::io::Result<()> {
/// let temp = tempfile::tempdir()?;
/// let source = temp.path().join("notes.txt");
/// std::fs::write(&source, b"hello")?;
/// let stored = temp.path().join("mirror/notes.txt.gz");
///
/// let outcome = CopyPipeline::new(Compressor::Gzip).materialize(&source, &stored);
/// assert!(outcome.is_success());
/// assert_eq!(decompress_to_vec(Compressor::Gzip, &std::fs::read(&stored)?)?, b"hello");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CopyPipeline {
    compressor: Compressor,
    level: CompressionLevel,
    metadata: MetadataOptions,
    buffer: Vec<u8>,
}

impl CopyPipeline {
    /// Creates a pipeline that stores content with `compressor`.
    #[must_use]
    pub fn new(compressor: Compressor) -> Self {
        Self {
            compressor,
            level: CompressionLevel::default(),
            metadata: MetadataOptions::default(),
            buffer: Vec::new(),
        }
    }

    /// Sets the compression effort.
    #[must_use]
    pub const fn with_level(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }

    /// Selects which metadata is carried over after the content is written.
    #[must_use]
    pub const fn with_metadata_options(mut self, options: MetadataOptions) -> Self {
        self.metadata = options;
        self
    }

    /// Returns the codec content is stored with.
    #[must_use]
    pub const fn compressor(&self) -> Compressor {
        self.compressor
    }

    /// Copies `source` to `destination`, then carries over ownership,
    /// permission bits and timestamps.
    ///
    /// The source is opened before the destination is touched. A destination
    /// that shares its inode with another file, such as a stored file linked
    /// into a historic snapshot, is unlinked first so the other names keep
    /// the old content. A destination that cannot be opened for writing is
    /// left as it was; output is removed only once it has been truncated.
    pub fn materialize(&mut self, source: &Path, destination: &Path) -> FileOutcome {
        let mut warnings = Vec::new();

        let input = match File::open(source) {
            Ok(file) => file,
            Err(error) => return FileOutcome::Failed(CopyFailure::new("open", source, error)),
        };
        let source_metadata = match input.metadata() {
            Ok(metadata) => metadata,
            Err(error) => return FileOutcome::Failed(CopyFailure::new("inspect", source, error)),
        };

        if let Some(parent) = destination.parent()
            && let Err(error) = fs::create_dir_all(parent)
            && error.kind() != io::ErrorKind::AlreadyExists
        {
            warnings.push(StepWarning::new("create directory", parent, error));
        }

        if let Err(warning) = prepare_existing(destination) {
            warnings.push(warning);
        }

        let output = match File::create(destination) {
            Ok(file) => file,
            Err(error) => return FileOutcome::Failed(CopyFailure::new("create", destination, error)),
        };
        let bytes = match self.write_content(input, output, source, destination) {
            Ok(bytes) => bytes,
            Err(failure) => {
                let _ = fs::remove_file(destination);
                return FileOutcome::Failed(failure);
            }
        };

        warnings.extend(
            apply_file_metadata(&source_metadata, destination, &self.metadata)
                .into_iter()
                .map(StepWarning::from),
        );

        FileOutcome::completed(bytes, warnings)
    }

    fn write_content(
        &mut self,
        mut input: File,
        mut output: File,
        source: &Path,
        destination: &Path,
    ) -> Result<u64, CopyFailure> {
        if !self.compressor.is_compressing() {
            // File-to-file io::copy uses copy_file_range where available.
            return io::copy(&mut input, &mut output)
                .map_err(|error| CopyFailure::new("copy", destination, error));
        }

        let mut encoder = Encoder::new(self.compressor, output, self.level);

        if self.buffer.len() != CHUNK_SIZE {
            self.buffer.resize(CHUNK_SIZE, 0);
        }
        loop {
            let read = match input.read(&mut self.buffer) {
                Ok(0) => break,
                Ok(read) => read,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(CopyFailure::new("read", source, error)),
            };
            encoder
                .write_all(&self.buffer[..read])
                .map_err(|error| CopyFailure::new("write", destination, error))?;
        }

        let bytes = encoder.bytes_in();
        encoder
            .finish()
            .map_err(|error| CopyFailure::new("write", destination, error))?;
        Ok(bytes)
    }
}

fn prepare_existing(destination: &Path) -> Result<(), StepWarning> {
    let existing = match fs::symlink_metadata(destination) {
        Ok(metadata) => metadata,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(error) => return Err(StepWarning::new("inspect", destination, error)),
    };

    if existing.nlink() > 1 || existing.file_type().is_symlink() {
        return fs::remove_file(destination)
            .map_err(|error| StepWarning::new("unlink shared file", destination, error));
    }

    ensure_owner_writable(destination)
        .map(|_| ())
        .map_err(StepWarning::from)
}
