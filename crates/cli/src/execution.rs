use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use engine::BackupSession;
use logging::{Logger, Verbosity};
use time::OffsetDateTime;
use walk::{FileLister, FindLister, NativeLister};

use crate::arguments::{ParsedArgs, parse_args};
use crate::command::clap_command;
use crate::config::{BackupConfig, ConfigError, ListerChoice};
use crate::{PROGRAM_NAME, header};

/// Runs the command line in `arguments` and returns the process exit code.
///
/// Help, version and `-g` output go to `stdout`; argument and configuration
/// errors go to `stderr`. Once a run starts, progress is logged to the
/// process's standard output.
///
/// # Examples
///
/// ```
/// let mut stdout = Vec::new();
/// let mut stderr = Vec::new();
/// let exit_code = cli::run(["backup", "--version"], &mut stdout, &mut stderr);
///
/// assert_eq!(exit_code, 0);
/// assert!(String::from_utf8(stdout).unwrap().starts_with("backup v"));
/// assert!(stderr.is_empty());
/// ```
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    run_with_console(arguments, stdout, stderr, io::stdout())
}

/// Like [`run`], but logs the run to `console` instead of standard output.
pub fn run_with_console<I, S, Out, Err, Console>(
    arguments: I,
    stdout: &mut Out,
    stderr: &mut Err,
    console: Console,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
    Console: Write + Send + 'static,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }
    let command_line = render_command_line(&args);

    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(error) => {
            let _ = write!(stderr, "{error}");
            return 1;
        }
    };

    if parsed.show_help {
        let help = clap_command().render_help();
        let _ = writeln!(stdout, "{}\n\n{help}", header());
        return 0;
    }
    if parsed.show_version {
        let _ = writeln!(stdout, "{}", header());
        return 0;
    }

    let config = match resolve_config(&parsed) {
        Ok(config) => config,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            return error.exit_code();
        }
    };

    if parsed.print_config {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        return match config.render(&command_line, now) {
            Ok(text) => {
                let _ = write!(stdout, "{text}");
                0
            }
            Err(error) => {
                let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
                error.exit_code()
            }
        };
    }

    execute(&config, &command_line, stderr, console)
}

fn resolve_config(parsed: &ParsedArgs) -> Result<BackupConfig, ConfigError> {
    let mut config = match &parsed.config_file {
        Some(path) => BackupConfig::load(path)?,
        None => BackupConfig::default(),
    };
    config.apply_arguments(parsed)?;
    config.validate()?;
    Ok(config)
}

fn execute<Err, Console>(
    config: &BackupConfig,
    command_line: &str,
    stderr: &mut Err,
    console: Console,
) -> i32
where
    Err: Write,
    Console: Write + Send + 'static,
{
    logging::init_tracing();

    let verbosity = Verbosity::from_debug_level(config.debug_level).unwrap_or_default();
    let mut logger = Logger::with_writer(verbosity.threshold(), console);
    if let Some(path) = &config.debug_file {
        logger = match logger.with_log_file(path) {
            Ok(logger) => logger,
            Err(error) => {
                let _ = writeln!(
                    stderr,
                    "{PROGRAM_NAME}: failed to open log file '{}': {error}",
                    path.display()
                );
                return 1;
            }
        };
    }

    logger.info(header());
    logger.info(format_args!("command line: {command_line}"));

    let options = match config.backup_options() {
        Ok(options) => options,
        Err(error) => {
            logger.error(&error);
            return error.exit_code();
        }
    };
    let lister: Box<dyn FileLister> = match config.lister {
        ListerChoice::Find => Box::new(FindLister::new()),
        ListerChoice::Native => Box::new(NativeLister::new()),
    };
    let Some(target) = config.target.as_deref() else {
        logger.error(ConfigError::MissingOperands);
        return 1;
    };

    let session = BackupSession::new(target, options, lister, logger.clone());
    let sources: Vec<PathBuf> = config.paths.clone();
    match session.run(&sources) {
        Ok(summary) => {
            logger.info(format_args!(
                "finished: {} copied, {} linked, {} deleted, {} failed",
                summary.files_copied(),
                summary.files_linked(),
                summary.files_deleted(),
                summary.files_failed()
            ));
            0
        }
        Err(error) => {
            logger.error(&error);
            error.exit_code()
        }
    }
}

fn render_command_line(args: &[OsString]) -> String {
    args.iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::MemorySink;

    fn run_captured(arguments: &[&str]) -> (i32, String, String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let console = MemorySink::new();
        let code = run_with_console(
            std::iter::once("backup").chain(arguments.iter().copied()),
            &mut stdout,
            &mut stderr,
            console.clone(),
        );
        (
            code,
            String::from_utf8(stdout).unwrap(),
            String::from_utf8(stderr).unwrap(),
            console.contents(),
        )
    }

    #[test]
    fn help_lists_historic_flag() {
        let (code, stdout, _, _) = run_captured(&["--help"]);
        assert_eq!(code, 0);
        assert!(stdout.contains("--historic"));
        assert!(stdout.contains("-H"));
    }

    #[test]
    fn missing_operands_exit_with_one() {
        let (code, _, stderr, _) = run_captured(&["/only-one"]);
        assert_eq!(code, 1);
        assert!(stderr.contains("source path and a destination"));
    }

    #[test]
    fn print_config_writes_toml() {
        let (code, stdout, _, console) = run_captured(&["-g", "-b", "/src", "/dest"]);
        assert_eq!(code, 0);
        assert!(stdout.contains("compressor = \"bzip2\""));
        assert!(stdout.contains("#   backup -g -b /src /dest"));
        assert!(console.is_empty());
    }

    #[test]
    fn backup_run_logs_header_and_summary() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("src");
        let destination = temp.path().join("dest");
        std::fs::create_dir(&source).unwrap();
        std::fs::create_dir(&destination).unwrap();
        std::fs::write(source.join("file"), b"data").unwrap();

        let (code, _, stderr, console) = run_captured(&[
            "--native-walk",
            source.to_str().unwrap(),
            destination.to_str().unwrap(),
        ]);

        assert_eq!(code, 0, "{stderr}{console}");
        assert!(console.contains("backup v"));
        assert!(console.contains("command line: backup --native-walk"));
        assert!(console.contains("finished: 1 copied"));
    }

    #[test]
    fn missing_source_is_logged_as_error() {
        let temp = tempfile::tempdir().unwrap();
        let (code, _, _, console) = run_captured(&[
            "-q",
            "--native-walk",
            temp.path().join("absent").to_str().unwrap(),
            temp.path().to_str().unwrap(),
        ]);

        assert_eq!(code, 1);
        assert!(console.contains("error: source"));
    }
}
