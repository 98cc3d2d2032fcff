// Tests for merging configuration files with command-line options.
//
// Verifies:
// - command-line options override file values regardless of position
// - exclusion lists from both sources are combined
// - operands replace configured paths
// - invalid files surface readable errors

use std::fs;
use std::path::{Path, PathBuf};

use cli::{BackupConfig, ConfigError, ListerChoice, parse_args};
use compress::Compressor;
use engine::BackupMode;

fn write_config(text: &str) -> (tempfile::TempDir, PathBuf) {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("backup.toml");
    fs::write(&path, text).unwrap();
    (temp, path)
}

fn resolve(config: &Path, arguments: &[&str]) -> Result<BackupConfig, ConfigError> {
    let parsed = parse_args(std::iter::once("backup").chain(arguments.iter().copied())).unwrap();
    let mut loaded = BackupConfig::load(config)?;
    loaded.apply_arguments(&parsed)?;
    loaded.validate()?;
    Ok(loaded)
}

// ==== Precedence ====

/// A compressor flag wins over the file.
#[test]
fn command_line_compressor_overrides_file() {
    let (_temp, path) =
        write_config("paths = [\"/srv\"]\ntarget = \"/mnt/backup\"\ncompressor = \"bzip2\"\n");

    let config = resolve(&path, &["-u"]).unwrap();
    assert_eq!(config.compressor, Compressor::None);
    assert_eq!(config.paths, [PathBuf::from("/srv")]);
}

/// Values absent from the command line keep the file's setting.
#[test]
fn file_values_survive_without_flags() {
    let (_temp, path) = write_config(
        "paths = [\"/srv\", \"/etc\"]\ntarget = \"/mnt/backup\"\ndebug_level = 0\nlister = \"native\"\nfollow_symlinks = true\n",
    );

    let config = resolve(&path, &[]).unwrap();
    assert_eq!(config.debug_level, 0);
    assert_eq!(config.lister, ListerChoice::Native);
    assert!(config.follow_symlinks);
    assert_eq!(config.paths.len(), 2);
}

/// `-d` raises the level set to quiet in the file.
#[test]
fn debug_flag_overrides_quiet_file() {
    let (_temp, path) =
        write_config("paths = [\"/srv\"]\ntarget = \"/mnt/backup\"\ndebug_level = 0\n");
    assert_eq!(resolve(&path, &["-d"]).unwrap().debug_level, 2);
}

/// Exclusions from both sources apply.
#[test]
fn exclusions_are_combined() {
    let (_temp, path) =
        write_config("paths = [\"/srv\"]\ntarget = \"/mnt/backup\"\nexclude = [\"*.log\"]\n");

    let config = resolve(&path, &["-x", "*.tmp,cache"]).unwrap();
    let matcher = config.exclusion_matcher().unwrap();
    assert_eq!(matcher.len(), 3);
    assert!(matcher.excluded("/srv/app.log"));
    assert!(matcher.excluded("/srv/a.tmp"));
    assert!(matcher.excluded("/srv/cache"));
    assert!(!matcher.excluded("/srv/app.txt"));
}

/// Operands on the command line replace the configured paths.
#[test]
fn operands_replace_configured_paths() {
    let (_temp, path) = write_config("paths = [\"/srv\"]\ntarget = \"/mnt/backup\"\n");

    let config = resolve(&path, &["/home", "/var", "/media/usb"]).unwrap();
    assert_eq!(config.paths, [PathBuf::from("/home"), PathBuf::from("/var")]);
    assert_eq!(config.target, Some(PathBuf::from("/media/usb")));
}

/// A snapshot name on the command line turns a file's incremental setup into
/// a historic run.
#[test]
fn snapshot_name_selects_historic_mode() {
    let (_temp, path) = write_config("paths = [\"/srv\"]\ntarget = \"/mnt/backup\"\n");

    let options = resolve(&path, &["-H", "monday"])
        .unwrap()
        .backup_options()
        .unwrap();
    assert_eq!(
        options.mode_kind(),
        &BackupMode::Historic {
            label: Some("monday".to_owned())
        }
    );
}

// ==== Errors ====

/// A file asking for a full backup conflicts with `-h`.
#[test]
fn full_file_and_historic_flag_conflict() {
    let (_temp, path) =
        write_config("paths = [\"/srv\"]\ntarget = \"/mnt/backup\"\nfull_backup = true\n");
    assert!(matches!(
        resolve(&path, &["-h"]),
        Err(ConfigError::FullAndHistoric)
    ));
}

/// Misspelled keys name the file in the error.
#[test]
fn unknown_key_names_the_file() {
    let (_temp, path) = write_config("compresor = \"gzip\"\n");
    let error = BackupConfig::load(&path).unwrap_err();
    assert!(matches!(error, ConfigError::Parse { .. }));
    assert!(error.to_string().contains("backup.toml"));
}

/// Out-of-range verbosity is rejected.
#[test]
fn debug_level_out_of_range() {
    let (_temp, path) =
        write_config("paths = [\"/srv\"]\ntarget = \"/mnt/backup\"\ndebug_level = 7\n");
    assert!(matches!(
        resolve(&path, &[]),
        Err(ConfigError::InvalidDebugLevel(7))
    ));
}

/// Codec effort outside 1 to 9 is rejected.
#[test]
fn compression_level_out_of_range() {
    let (_temp, path) =
        write_config("paths = [\"/srv\"]\ntarget = \"/mnt/backup\"\ncompression_level = 12\n");
    let error = resolve(&path, &[]).unwrap_err();
    assert!(matches!(error, ConfigError::Level(_)));
    assert_eq!(error.exit_code(), 1);
}

/// Attribute preservation set in the file reaches the engine options.
#[test]
fn preservation_keys_reach_engine_options() {
    let (_temp, path) = write_config(
        "paths = [\"/srv\"]\ntarget = \"/mnt/backup\"\npreserve_owner = false\npreserve_group = false\n",
    );

    let options = resolve(&path, &["-b"]).unwrap().backup_options().unwrap();
    let metadata = options.metadata_options();
    assert!(!metadata.owner() && !metadata.group());
    assert!(metadata.permissions() && metadata.times());
}
