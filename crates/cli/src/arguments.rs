use std::ffi::OsString;
use std::path::PathBuf;

use compress::Compressor;

use crate::command::clap_command;

/// Parsed command-line arguments.
///
/// Flags that can only switch a setting on are plain `bool`s; settings that
/// may be left to the configuration file are `Option`s.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParsedArgs {
    /// `--help` was given.
    pub show_help: bool,
    /// `--version` was given.
    pub show_version: bool,
    /// `-b` or `-u`/`-n`, whichever came last.
    pub compressor: Option<Compressor>,
    /// `-f`.
    pub full_backup: bool,
    /// `-h`.
    pub historic_backup: bool,
    /// `-H NAME`.
    pub historic_backup_dir: Option<String>,
    /// Every `-x PATTERN`, unsplit.
    pub exclude: Vec<String>,
    /// `-l FILE`.
    pub debug_file: Option<PathBuf>,
    /// `-d` (2) or `-q` (0), whichever came last.
    pub debug_level: Option<u8>,
    /// `-F`/`-s`.
    pub follow_symlinks: bool,
    /// `-g`.
    pub print_config: bool,
    /// `-c FILE`.
    pub config_file: Option<PathBuf>,
    /// `-j`/`--parallel`.
    pub parallel: bool,
    /// `--native-walk`.
    pub native_walk: bool,
    /// Positional paths: sources followed by the destination.
    pub operands: Vec<PathBuf>,
}

/// Parses `arguments`, whose first element is the program name.
pub fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let matches = clap_command().try_get_matches_from(arguments)?;

    let compressor = if matches.get_flag("bzip2") {
        Some(Compressor::Bzip2)
    } else if matches.get_flag("uncompressed") {
        Some(Compressor::None)
    } else {
        None
    };
    let debug_level = if matches.get_flag("debug") {
        Some(2)
    } else if matches.get_flag("quiet") {
        Some(0)
    } else {
        None
    };

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        compressor,
        full_backup: matches.get_flag("full"),
        historic_backup: matches.get_flag("historic"),
        historic_backup_dir: matches.get_one::<String>("historic-dir").cloned(),
        exclude: matches
            .get_many::<String>("exclude")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        debug_file: matches.get_one::<PathBuf>("log-file").cloned(),
        debug_level,
        follow_symlinks: matches.get_flag("follow-symlinks"),
        print_config: matches.get_flag("print-config"),
        config_file: matches.get_one::<PathBuf>("config").cloned(),
        parallel: matches.get_flag("parallel"),
        native_walk: matches.get_flag("native-walk"),
        operands: matches
            .get_many::<PathBuf>("operands")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
    })
}
