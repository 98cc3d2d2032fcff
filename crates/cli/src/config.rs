//! Typed backup configuration loaded from TOML files and command-line flags.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use compress::{CompressionLevel, CompressionLevelError, Compressor};
use engine::{BackupMode, BackupOptions, MetadataOptions};
use filters::{ExclusionMatcher, FilterError, split_pattern_list};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::arguments::ParsedArgs;
use crate::header;

const GENERATED_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Which directory lister scans source and destination trees.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListerChoice {
    /// The external `find` program.
    #[default]
    Find,
    /// The in-process directory walker.
    Native,
}

/// Every setting a backup run needs.
///
/// Unknown keys are rejected when loading so that typos in a configuration
/// file do not go unnoticed.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackupConfig {
    /// Source directories, backed up in this order.
    pub paths: Vec<PathBuf>,
    /// Destination root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
    /// Storage codec.
    pub compressor: Compressor,
    /// Codec effort, 1 to 9.
    pub compression_level: u8,
    /// Shell-style exclusion patterns; entries may hold several patterns
    /// separated by commas.
    pub exclude: Vec<String>,
    /// Copy everything instead of comparing with the destination.
    pub full_backup: bool,
    /// Write a dated snapshot directory per run.
    pub historic_backup: bool,
    /// Snapshot directory name for historic runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historic_backup_dir: Option<String>,
    /// Follow symbolic links while scanning sources.
    pub follow_symlinks: bool,
    /// Console verbosity, 0 to 2.
    pub debug_level: u8,
    /// File receiving every log message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_file: Option<PathBuf>,
    /// Directory lister.
    pub lister: ListerChoice,
    /// Copy content on a worker pool.
    pub parallel: bool,
    /// Give stored files the source's owning user.
    pub preserve_owner: bool,
    /// Give stored files the source's owning group.
    pub preserve_group: bool,
    /// Give stored files the source's permission bits.
    pub preserve_permissions: bool,
    /// Give stored files the source's access and modification times.
    pub preserve_times: bool,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            target: None,
            compressor: Compressor::Gzip,
            compression_level: 9,
            exclude: Vec::new(),
            full_backup: false,
            historic_backup: false,
            historic_backup_dir: None,
            follow_symlinks: false,
            debug_level: 1,
            debug_file: None,
            lister: ListerChoice::Find,
            parallel: false,
            preserve_owner: true,
            preserve_group: true,
            preserve_permissions: true,
            preserve_times: true,
        }
    }
}

const FIELD_DOCS: &[(&str, &str)] = &[
    ("paths", "Source directories to back up."),
    ("target", "Destination root for the backup."),
    ("compressor", "Storage codec: \"gzip\", \"bzip2\" or \"none\"."),
    ("compression_level", "Codec effort from 1 (fastest) to 9 (smallest output)."),
    ("exclude", "Shell patterns of files to skip."),
    ("full_backup", "Copy every file instead of only the changed ones. Not compatible with historic_backup."),
    ("historic_backup", "Write one snapshot directory per run. Not compatible with full_backup."),
    ("historic_backup_dir", "Snapshot directory name; the current date and time when unset."),
    ("follow_symlinks", "Follow symbolic links while scanning."),
    ("debug_level", "Console verbosity, from 0 (warnings only) to 2 (every file)."),
    ("debug_file", "File that receives the complete activity log."),
    ("lister", "Directory lister: \"find\" or \"native\"."),
    ("parallel", "Copy files on several threads."),
    ("preserve_owner", "Copy the owning user onto stored files; needs root to change."),
    ("preserve_group", "Copy the owning group onto stored files."),
    ("preserve_permissions", "Copy permission bits onto stored files."),
    ("preserve_times", "Copy access and modification times onto stored files."),
];

impl BackupConfig {
    /// Reads a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses configuration text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Overrides settings with the ones given on the command line.
    ///
    /// Operands replace the configured paths and target; at least two are
    /// required when any are given.
    pub fn apply_arguments(&mut self, arguments: &ParsedArgs) -> Result<(), ConfigError> {
        if let Some(compressor) = arguments.compressor {
            self.compressor = compressor;
        }
        if arguments.full_backup {
            self.full_backup = true;
        }
        if arguments.historic_backup || arguments.historic_backup_dir.is_some() {
            self.historic_backup = true;
        }
        if let Some(label) = &arguments.historic_backup_dir {
            self.historic_backup_dir = Some(label.clone());
        }
        self.exclude.extend(arguments.exclude.iter().cloned());
        if let Some(path) = &arguments.debug_file {
            self.debug_file = Some(path.clone());
        }
        if let Some(level) = arguments.debug_level {
            self.debug_level = level;
        }
        if arguments.follow_symlinks {
            self.follow_symlinks = true;
        }
        if arguments.parallel {
            self.parallel = true;
        }
        if arguments.native_walk {
            self.lister = ListerChoice::Native;
        }

        if let Some((target, sources)) = arguments.operands.split_last() {
            if sources.is_empty() {
                return Err(ConfigError::MissingOperands);
            }
            self.target = Some(target.clone());
            self.paths = sources.to_vec();
        }
        Ok(())
    }

    /// Checks that the settings describe a runnable backup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.full_backup && self.historic_backup {
            return Err(ConfigError::FullAndHistoric);
        }
        if self.paths.is_empty() || self.target.is_none() {
            return Err(ConfigError::MissingOperands);
        }
        if self.debug_level > 2 {
            return Err(ConfigError::InvalidDebugLevel(self.debug_level));
        }
        self.level()?;
        Ok(())
    }

    /// Compiles the exclusion patterns, splitting comma-separated entries.
    pub fn exclusion_matcher(&self) -> Result<ExclusionMatcher, ConfigError> {
        let patterns = self
            .exclude
            .iter()
            .flat_map(|entry| split_pattern_list(entry));
        Ok(ExclusionMatcher::compile(patterns)?)
    }

    /// Returns the configured codec effort.
    pub fn level(&self) -> Result<CompressionLevel, ConfigError> {
        Ok(CompressionLevel::from_numeric(u32::from(self.compression_level))?)
    }

    /// Returns which attributes are carried onto stored files.
    #[must_use]
    pub const fn metadata_options(&self) -> MetadataOptions {
        MetadataOptions::new()
            .preserve_owner(self.preserve_owner)
            .preserve_group(self.preserve_group)
            .preserve_permissions(self.preserve_permissions)
            .preserve_times(self.preserve_times)
    }

    /// Translates the settings into engine options.
    pub fn backup_options(&self) -> Result<BackupOptions, ConfigError> {
        let mode = if self.full_backup {
            BackupMode::Full
        } else if self.historic_backup {
            BackupMode::Historic {
                label: self.historic_backup_dir.clone(),
            }
        } else {
            BackupMode::Incremental
        };

        Ok(BackupOptions::new()
            .compressor(self.compressor)
            .level(self.level()?)
            .metadata(self.metadata_options())
            .mode(mode)
            .exclusions(self.exclusion_matcher()?)
            .follow_symlinks(self.follow_symlinks)
            .parallel(self.parallel))
    }

    /// Renders a commented configuration file that [`BackupConfig::load`]
    /// accepts back.
    ///
    /// Unset optional keys are written commented out.
    pub fn render(&self, command_line: &str, generated: OffsetDateTime) -> Result<String, ConfigError> {
        let value = toml::Value::try_from(self).map_err(ConfigError::Render)?;
        let table = value.as_table().cloned().unwrap_or_default();
        let date = generated
            .format(GENERATED_FORMAT)
            .unwrap_or_else(|_| generated.to_string());

        let mut output = String::new();
        for line in header().lines() {
            let _ = writeln!(output, "# {line}");
        }
        let _ = writeln!(output, "#");
        let _ = writeln!(output, "# Configuration generated from this command line:");
        let _ = writeln!(output, "#");
        let _ = writeln!(output, "#   {command_line}");
        let _ = writeln!(output, "#");
        let _ = writeln!(output, "# Generated on {date}");

        for (key, doc) in FIELD_DOCS {
            let _ = writeln!(output);
            let _ = writeln!(output, "# {doc}");
            match table.get(*key) {
                Some(value) => {
                    let _ = writeln!(output, "{key} = {value}");
                }
                None => {
                    let _ = writeln!(output, "# {key} = \"\"");
                }
            }
        }
        Ok(output)
    }
}

/// Problems with the configuration or the command line.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration '{}': {source}", path.display())]
    Read {
        /// Configuration file.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The configuration file is not valid.
    #[error("failed to parse configuration '{}': {source}", path.display())]
    Parse {
        /// Configuration file.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },
    /// The configuration could not be rendered as TOML.
    #[error("failed to render configuration: {0}")]
    Render(toml::ser::Error),
    /// Full and historic backups were both requested.
    #[error("full (-f) and historic (-h) backups cannot be combined")]
    FullAndHistoric,
    /// Sources or destination are missing.
    #[error("at least one source path and a destination path are required; try --help")]
    MissingOperands,
    /// The debug level is out of range.
    #[error("debug level {0} is out of range (0 to 2)")]
    InvalidDebugLevel(u8),
    /// The compression level is out of range.
    #[error(transparent)]
    Level(#[from] CompressionLevelError),
    /// An exclusion pattern did not compile.
    #[error(transparent)]
    Pattern(#[from] FilterError),
}

impl ConfigError {
    /// Returns the process exit code for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        engine::FATAL_EXIT_CODE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn arguments(operands: &[&str]) -> ParsedArgs {
        ParsedArgs {
            operands: operands.iter().map(PathBuf::from).collect(),
            ..ParsedArgs::default()
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = BackupConfig::default();
        assert_eq!(config.compressor, Compressor::Gzip);
        assert_eq!(config.debug_level, 1);
        assert_eq!(config.lister, ListerChoice::Find);
        assert!(!config.full_backup && !config.historic_backup);
        assert_eq!(config.level().unwrap(), CompressionLevel::Best);
        assert_eq!(config.metadata_options(), MetadataOptions::new());
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(BackupConfig::from_toml("").unwrap(), BackupConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(BackupConfig::from_toml("compresor = \"gzip\"").is_err());
    }

    #[test]
    fn parses_every_key() {
        let config = BackupConfig::from_toml(
            r#"
            paths = ["/srv", "/etc"]
            target = "/backup"
            compressor = "bzip2"
            exclude = ["*.tmp", "cache*,*.log"]
            historic_backup = true
            historic_backup_dir = "weekly"
            follow_symlinks = true
            debug_level = 2
            debug_file = "/var/log/backup.log"
            lister = "native"
            parallel = true
            compression_level = 4
            preserve_owner = false
            preserve_times = false
            "#,
        )
        .unwrap();

        assert_eq!(config.paths, [PathBuf::from("/srv"), PathBuf::from("/etc")]);
        assert_eq!(config.compressor, Compressor::Bzip2);
        assert_eq!(config.lister, ListerChoice::Native);
        assert_eq!(config.historic_backup_dir.as_deref(), Some("weekly"));
        assert_eq!(config.exclusion_matcher().unwrap().len(), 3);

        let options = config.backup_options().unwrap();
        assert_eq!(options.compression_level().numeric(), 4);
        let metadata = options.metadata_options();
        assert!(!metadata.owner() && !metadata.times());
        assert!(metadata.group() && metadata.permissions());
    }

    #[test]
    fn operands_split_into_sources_and_target() {
        let mut config = BackupConfig::default();
        config.apply_arguments(&arguments(&["a", "b", "dest"])).unwrap();

        assert_eq!(config.paths, [PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(config.target, Some(PathBuf::from("dest")));
    }

    #[test]
    fn single_operand_is_rejected() {
        let mut config = BackupConfig::default();
        assert!(matches!(
            config.apply_arguments(&arguments(&["only"])),
            Err(ConfigError::MissingOperands)
        ));
    }

    #[test]
    fn configured_operands_survive_when_none_given() {
        let mut config = BackupConfig {
            paths: vec![PathBuf::from("/srv")],
            target: Some(PathBuf::from("/backup")),
            ..BackupConfig::default()
        };
        config.apply_arguments(&arguments(&[])).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn snapshot_name_implies_historic() {
        let mut config = BackupConfig::default();
        let arguments = ParsedArgs {
            historic_backup_dir: Some("daily".into()),
            ..arguments(&["src", "dst"])
        };
        config.apply_arguments(&arguments).unwrap();

        let options = config.backup_options().unwrap();
        assert_eq!(
            options.mode_kind(),
            &BackupMode::Historic {
                label: Some("daily".into())
            }
        );
    }

    #[test]
    fn validation_failures() {
        let runnable = BackupConfig {
            paths: vec![PathBuf::from("/a")],
            target: Some(PathBuf::from("/b")),
            ..BackupConfig::default()
        };
        assert!(runnable.validate().is_ok());

        let both = BackupConfig {
            full_backup: true,
            historic_backup: true,
            ..runnable.clone()
        };
        assert!(matches!(both.validate(), Err(ConfigError::FullAndHistoric)));

        let noisy = BackupConfig {
            debug_level: 3,
            ..runnable.clone()
        };
        assert!(matches!(noisy.validate(), Err(ConfigError::InvalidDebugLevel(3))));

        let effortless = BackupConfig {
            compression_level: 0,
            ..runnable.clone()
        };
        let error = effortless.validate().unwrap_err();
        assert!(matches!(error, ConfigError::Level(_)));
        assert!(error.to_string().contains("compression level 0"));

        assert!(matches!(
            BackupConfig::default().validate(),
            Err(ConfigError::MissingOperands)
        ));
    }

    #[test]
    fn rendered_configuration_loads_back() {
        let config = BackupConfig {
            paths: vec![PathBuf::from("/srv/data")],
            target: Some(PathBuf::from("/backup")),
            compressor: Compressor::None,
            exclude: vec!["*.tmp".into()],
            historic_backup: true,
            ..BackupConfig::default()
        };

        let text = config
            .render("backup -uh -x *.tmp /srv/data /backup", datetime!(2024-06-01 10:20:30 UTC))
            .unwrap();

        assert!(text.contains("#   backup -uh -x *.tmp /srv/data /backup"));
        assert!(text.contains("# Generated on 2024-06-01 10:20:30"));
        assert!(text.contains("# historic_backup_dir = \"\""));
        assert_eq!(BackupConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn load_reports_missing_file() {
        let error = BackupConfig::load(Path::new("/nonexistent/backup.toml")).unwrap_err();
        assert!(error.to_string().starts_with("failed to read configuration"));
        assert_eq!(error.exit_code(), 1);
    }
}
