use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::levels::{Level, Verbosity};
use crate::tracing_bridge;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]");

/// Activity logger handed explicitly to every component.
///
/// Cloning a logger is cheap; clones write to the same console writer and
/// log file. The console threshold is fixed at construction.
///
/// # Examples
///
/// ```
/// use logging::{Logger, MemorySink, Verbosity};
///
/// let sink = MemorySink::new();
/// let logger = Logger::with_writer(Verbosity::Quiet.threshold(), sink.clone());
/// logger.info("not shown");
/// logger.error("shown");
/// assert_eq!(sink.lines().len(), 1);
/// ```
#[derive(Clone)]
pub struct Logger {
    threshold: Level,
    outputs: Arc<Mutex<Outputs>>,
}

struct Outputs {
    console: Box<dyn Write + Send>,
    file: Option<File>,
}

impl Logger {
    /// Creates a logger that prints to standard output.
    #[must_use]
    pub fn new(verbosity: Verbosity) -> Self {
        Self::with_writer(verbosity.threshold(), io::stdout())
    }

    /// Creates a logger that prints records up to `threshold` into `writer`.
    #[must_use]
    pub fn with_writer<W>(threshold: Level, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            threshold,
            outputs: Arc::new(Mutex::new(Outputs {
                console: Box::new(writer),
                file: None,
            })),
        }
    }

    /// Creates a logger that drops every record.
    #[must_use]
    pub fn discard() -> Self {
        Self::with_writer(Level::Error, io::sink())
    }

    /// Appends every record, whatever its level, to the file at `path`.
    ///
    /// The file is created when missing. The change is visible through every
    /// clone of this logger.
    pub fn with_log_file(self, path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        self.lock().file = Some(file);
        Ok(self)
    }

    /// Returns the least severe level shown on the console.
    #[must_use]
    pub const fn threshold(&self) -> Level {
        self.threshold
    }

    /// Reports whether records at `level` reach the console.
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        level <= self.threshold
    }

    /// Records `message` at `level`.
    pub fn log(&self, level: Level, message: impl fmt::Display) {
        let message = message.to_string();
        tracing_bridge::emit(level, &message);

        let line = render_line(level, &message);
        let mut outputs = self.lock();
        if let Some(file) = outputs.file.as_mut() {
            let _ = file.write_all(line.as_bytes());
        }
        if self.enabled(level) {
            let _ = outputs.console.write_all(line.as_bytes());
            let _ = outputs.console.flush();
        }
    }

    /// Records an error.
    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::Error, message);
    }

    /// Records a recoverable problem.
    pub fn warning(&self, message: impl fmt::Display) {
        self.log(Level::Warning, message);
    }

    /// Records run progress.
    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::Info, message);
    }

    /// Records a per-file action.
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::Debug, message);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Outputs> {
        self.outputs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("threshold", &self.threshold)
            .field("log_file", &self.lock().file.is_some())
            .finish_non_exhaustive()
    }
}

fn render_line(level: Level, message: &str) -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let stamp = now
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| now.unix_timestamp().to_string());
    if level.is_labelled() {
        format!("{stamp} {level}: {message}\n")
    } else {
        format!("{stamp} {message}\n")
    }
}
