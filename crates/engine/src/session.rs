//! Driver that runs a backup across every source path.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use compress::Compressor;
use logging::Logger;
use metadata::check_writable;
use walk::FileLister;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::copy::{CopyPipeline, FileOutcome};
use crate::layout::{absolutize, mirror_path};
use crate::link::{HardlinkLinker, LinkOutcome};
use crate::options::{BackupMode, BackupOptions};
use crate::scan::TreeScanner;
use crate::snapshot::SnapshotName;
use crate::store::{METADATA_FILENAME, Metadata, MetadataStore};
use crate::summary::{PathSummary, RunSummary};
use crate::sweep::DeletionSweeper;
use crate::{BackupError, BackupErrorKind, Registry, diff};

/// One backup run into a destination root.
///
/// Source paths are processed one after another in the order given. Only
/// conditions that make the whole run meaningless are returned as errors;
/// per-file problems are logged as warnings and counted in the summary.
///
/// # Examples
///
/// ```
/// use engine::{BackupOptions, BackupSession};
/// use logging::Logger;
/// use walk::NativeLister;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let temp = tempfile::tempdir()?;
/// let source = temp.path().join("src");
/// std::fs::create_dir(&source)?;
/// std::fs::write(source.join("a.txt"), b"alpha")?;
/// let destination = temp.path().join("dest");
/// std::fs::create_dir(&destination)?;
///
/// let session = BackupSession::new(&destination, BackupOptions::new(), NativeLister::new(), Logger::discard());
/// let summary = session.run(&[source.clone()])?;
///
/// assert_eq!(summary.files_copied(), 1);
/// assert!(summary.paths()[0].mirror().join("a.txt.gz").is_file());
/// # Ok(())
/// # }
/// ```
pub struct BackupSession {
    destination: PathBuf,
    options: BackupOptions,
    lister: Box<dyn FileLister>,
    logger: Logger,
}

struct Plan {
    snapshot: Option<SnapshotName>,
    previous: Option<SnapshotName>,
    metadata: Metadata,
}

impl BackupSession {
    /// Creates a session writing into `destination`.
    pub fn new(
        destination: &Path,
        options: BackupOptions,
        lister: impl FileLister + 'static,
        logger: Logger,
    ) -> Self {
        Self {
            destination: destination.to_path_buf(),
            options,
            lister: Box::new(lister),
            logger,
        }
    }

    /// Returns the destination root.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Returns the run options.
    #[must_use]
    pub const fn options(&self) -> &BackupOptions {
        &self.options
    }

    /// Backs up every path in `sources`, resolving relative paths against the
    /// current working directory.
    pub fn run(&self, sources: &[PathBuf]) -> Result<RunSummary, BackupError> {
        let cwd = env::current_dir()
            .map_err(|error| BackupError::io("determine working directory", PathBuf::from("."), error))?;
        self.run_from(sources, &cwd)
    }

    /// Backs up every path in `sources`, resolving relative paths against
    /// `cwd`.
    pub fn run_from(&self, sources: &[PathBuf], cwd: &Path) -> Result<RunSummary, BackupError> {
        let destination = absolutize(&self.destination, cwd);
        check_writable(&destination).map_err(|error| {
            let (_, path, source) = error.into_parts();
            BackupError::destination_not_writable(path, source)
        })?;
        let sources: Vec<PathBuf> = sources.iter().map(|source| absolutize(source, cwd)).collect();
        for source in &sources {
            inspect_source(source)?;
        }

        let store = MetadataStore::new(&destination, self.logger.clone());
        let plan = self.plan(&store)?;
        self.log_mode(&plan);

        let mut summary = RunSummary {
            paths: Vec::with_capacity(sources.len()),
            snapshot: plan.snapshot.clone(),
        };
        for source in &sources {
            let path_summary = self.backup_path(source, &destination, &plan)?;
            self.log_path_summary(&path_summary);
            summary.paths.push(path_summary);
        }

        if let Some(snapshot) = &plan.snapshot {
            store.save(&plan.metadata.clone().with_last_historic_dir(snapshot.as_str()));
        }

        Ok(summary)
    }

    fn plan(&self, store: &MetadataStore) -> Result<Plan, BackupError> {
        let BackupMode::Historic { label } = self.options.mode_kind() else {
            return Ok(Plan {
                snapshot: None,
                previous: None,
                metadata: Metadata::default(),
            });
        };

        let snapshot = match label {
            Some(label) => SnapshotName::from_label(label.as_str())?,
            None => SnapshotName::now(),
        };
        let metadata = store.load();
        let previous = match metadata.last_historic_dir.as_deref() {
            Some(name) => match SnapshotName::from_label(name) {
                Ok(previous) => Some(previous),
                Err(error) => {
                    self.logger
                        .warning(format_args!("ignoring previous snapshot: {error}"));
                    None
                }
            },
            None => None,
        };

        Ok(Plan {
            snapshot: Some(snapshot),
            previous,
            metadata,
        })
    }

    fn log_mode(&self, plan: &Plan) {
        let codec = self.options.compressor_kind();
        match (&plan.snapshot, &plan.previous) {
            (Some(snapshot), Some(previous)) => self.logger.info(format_args!(
                "historic backup into {snapshot}, linking unchanged files from {previous} (compressor: {codec})"
            )),
            (Some(snapshot), None) => self.logger.info(format_args!(
                "historic backup into {snapshot}, no previous snapshot (compressor: {codec})"
            )),
            _ => self.logger.info(format_args!(
                "{} backup (compressor: {codec})",
                self.options.mode_kind().name()
            )),
        }
    }

    fn scanner(&self) -> TreeScanner<'_> {
        TreeScanner::new(
            self.lister.as_ref(),
            self.options.exclusion_matcher(),
            self.options.follows_symlinks(),
            self.logger.clone(),
        )
    }

    fn pipeline(&self) -> CopyPipeline {
        CopyPipeline::new(self.options.compressor_kind())
            .with_level(self.options.compression_level())
            .with_metadata_options(self.options.metadata_options())
    }

    fn backup_path(
        &self,
        source: &Path,
        destination: &Path,
        plan: &Plan,
    ) -> Result<PathSummary, BackupError> {
        let started = Instant::now();
        let codec = self.options.compressor_kind();

        let snapshot = plan.snapshot.as_ref().map(SnapshotName::as_str);
        let mirror = mirror_path(destination, snapshot, source);

        // A source removed since the pre-run check is skipped, never scanned
        // as empty.
        if let Err(error) = inspect_source(source) {
            if matches!(error.kind(), BackupErrorKind::MissingSource { .. }) {
                self.logger.warning(format_args!("{error}; skipping"));
                let mut summary = PathSummary::new(source.to_path_buf(), mirror, Registry::new(codec));
                summary.elapsed = started.elapsed();
                return Ok(summary);
            }
            return Err(error);
        }
        fs::create_dir_all(&mirror)
            .map_err(|error| BackupError::io("create directory", mirror.clone(), error))?;
        self.logger.info(format_args!(
            "backing up {} into {}",
            source.display(),
            mirror.display()
        ));

        let source_registry = self.scanner().scan(source)?;
        let previous_mirror = plan
            .previous
            .as_ref()
            .map(|previous| mirror_path(destination, Some(previous.as_str()), source));
        let destination_registry = match self.options.mode_kind() {
            BackupMode::Full => Registry::new(codec),
            BackupMode::Incremental => {
                let scanner = if mirror == destination {
                    self.scanner().ignoring(METADATA_FILENAME)
                } else {
                    self.scanner()
                };
                scanner.scan_stored(&mirror, codec)?
            }
            BackupMode::Historic { .. } => match &previous_mirror {
                Some(previous_mirror) => self.scanner().scan_stored(previous_mirror, codec)?,
                None => Registry::new(codec),
            },
        };

        let classification = diff(&source_registry, &destination_registry);
        let mut summary = PathSummary::new(source.to_path_buf(), mirror.clone(), Registry::new(codec));
        summary.new = classification.new_keys().len() as u64;
        summary.updated = classification.updated().len() as u64;
        summary.unchanged = classification.unchanged().len() as u64;

        let to_copy: Vec<&str> = classification.to_copy().collect();
        for (key, outcome) in self.copy_all(&to_copy, source, &mirror, codec) {
            self.record_copy(&mut summary, &source_registry, key, outcome);
        }

        match &previous_mirror {
            Some(previous_mirror) => {
                let linker = HardlinkLinker::new();
                let mut pipeline = self.pipeline();
                for key in classification.unchanged() {
                    let stored = codec.stored_name(key);
                    let target = mirror.join(&stored);
                    match linker.link(&previous_mirror.join(&stored), &target) {
                        Ok(outcome) => {
                            if outcome == LinkOutcome::Linked {
                                self.logger.debug(format_args!("linked: {key}"));
                            }
                            summary.linked += 1;
                            if let Some(modified) = source_registry.get(key) {
                                summary.registry.insert(key.as_str(), modified);
                            }
                        }
                        Err(error) => {
                            self.logger
                                .warning(format_args!("{error}; copying instead"));
                            summary.link_fallbacks += 1;
                            let outcome = pipeline.materialize(&source.join(key), &target);
                            self.record_copy(&mut summary, &source_registry, key, outcome);
                        }
                    }
                }
            }
            None => {
                for key in classification.unchanged() {
                    if let Some(modified) = source_registry.get(key) {
                        summary.registry.insert(key.as_str(), modified);
                    }
                }
            }
        }

        if matches!(self.options.mode_kind(), BackupMode::Incremental) {
            let doomed = classification
                .deletable()
                .iter()
                .map(|key| codec.stored_name(key))
                .chain(destination_registry.foreign().map(str::to_owned));
            let counts = DeletionSweeper::new(self.logger.clone()).sweep(doomed, &mirror);
            summary.deleted = counts.deleted();
            summary.delete_failures = counts.failed();
        }

        summary.elapsed = started.elapsed();
        Ok(summary)
    }

    fn copy_all<'k>(
        &self,
        keys: &[&'k str],
        source: &Path,
        mirror: &Path,
        codec: Compressor,
    ) -> Vec<(&'k str, FileOutcome)> {
        let copy_one = |pipeline: &mut CopyPipeline, key: &'k str| {
            let outcome = pipeline.materialize(&source.join(key), &mirror.join(codec.stored_name(key)));
            (key, outcome)
        };

        #[cfg(feature = "parallel")]
        if self.options.is_parallel() && keys.len() > 1 {
            return keys
                .par_iter()
                .map_init(|| self.pipeline(), |pipeline, key| copy_one(pipeline, *key))
                .collect();
        }

        let mut pipeline = self.pipeline();
        keys.iter().map(|key| copy_one(&mut pipeline, *key)).collect()
    }

    fn record_copy(
        &self,
        summary: &mut PathSummary,
        source_registry: &Registry,
        key: &str,
        outcome: FileOutcome,
    ) {
        for warning in outcome.warnings() {
            self.logger.warning(warning);
            summary.warnings += 1;
        }
        match outcome {
            FileOutcome::Copied { bytes } | FileOutcome::CopiedWithWarnings { bytes, .. } => {
                self.logger.debug(format_args!("copied: {key} ({bytes} bytes)"));
                summary.copied += 1;
                summary.bytes_copied += bytes;
                if let Some(modified) = source_registry.get(key) {
                    summary.registry.insert(key, modified);
                }
            }
            FileOutcome::Failed(failure) => {
                self.logger.warning(format_args!("skipping {key}: {failure}"));
                summary.failed += 1;
            }
        }
    }

    fn log_path_summary(&self, summary: &PathSummary) {
        self.logger.info(format_args!(
            "{}: {} new, {} updated, {} deleted, {} linked, {} failed in {:.2?}",
            summary.source().display(),
            summary.new_files(),
            summary.updated_files(),
            summary.deleted_files(),
            summary.linked_files(),
            summary.failed_files(),
            summary.elapsed()
        ));
    }
}

fn inspect_source(source: &Path) -> Result<(), BackupError> {
    match fs::metadata(source) {
        Ok(_) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            Err(BackupError::missing_source(source.to_path_buf()))
        }
        Err(error) => Err(BackupError::io("inspect", source.to_path_buf(), error)),
    }
}
