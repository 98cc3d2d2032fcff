use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;

use crate::PROGRAM_NAME;

/// Builds the `clap` command used for parsing.
///
/// `-h` selects historic backups, so the automatic help and version flags
/// are replaced by long-only `--help` and `--version`.
pub(crate) fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .about("Copies and compresses the files of every SOURCE into DEST, preserving owners and permissions.")
        .override_usage(format!("{PROGRAM_NAME} [OPTIONS] SOURCE... DEST"))
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("bzip2")
                .short('b')
                .long("bzip2")
                .help("Compress stored files with bzip2 instead of gzip.")
                .action(ArgAction::SetTrue)
                .overrides_with("uncompressed"),
        )
        .arg(
            Arg::new("uncompressed")
                .short('u')
                .visible_short_alias('n')
                .long("no-compress")
                .help("Store files without compression.")
                .action(ArgAction::SetTrue)
                .overrides_with("bzip2"),
        )
        .arg(
            Arg::new("full")
                .short('f')
                .long("full")
                .help("Copy every file instead of only the changed ones. Not compatible with -h.")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["historic", "historic-dir"]),
        )
        .arg(
            Arg::new("historic")
                .short('h')
                .long("historic")
                .help("Write a new snapshot directory, hardlinking unchanged files from the previous one. Not compatible with -f.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("historic-dir")
                .short('H')
                .long("historic-dir")
                .value_name("NAME")
                .help("Snapshot directory name; implies -h. Defaults to the current date and time.")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("exclude")
                .short('x')
                .long("exclude")
                .value_name("PATTERN")
                .help("Skip files matching the shell pattern. May be repeated or hold several comma-separated patterns.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("log-file")
                .short('l')
                .long("log-file")
                .value_name("FILE")
                .help("Append the complete activity log to FILE.")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Report every file on standard output.")
                .action(ArgAction::SetTrue)
                .overrides_with("quiet"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only report warnings and errors on standard output.")
                .action(ArgAction::SetTrue)
                .overrides_with("debug"),
        )
        .arg(
            Arg::new("follow-symlinks")
                .short('F')
                .visible_short_alias('s')
                .long("follow-symlinks")
                .help("Follow symbolic links while scanning sources.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("print-config")
                .short('g')
                .long("print-config")
                .help("Print a configuration file built from the command line and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Load settings from FILE; command-line options override them.")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("parallel")
                .short('j')
                .long("parallel")
                .help("Copy files on several threads.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("native-walk")
                .long("native-walk")
                .help("Scan directories in-process instead of running find.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("help")
                .long("help")
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("operands")
                .value_name("PATH")
                .help("Source directories followed by the destination.")
                .value_parser(value_parser!(PathBuf))
                .num_args(0..)
                .action(ArgAction::Append),
        )
}
