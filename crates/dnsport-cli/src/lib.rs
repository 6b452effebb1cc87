// # dnsport-cli
//
// Shared plumbing for the `dns-export` and `dns-import` binaries.
//
// The binaries are a THIN integration layer: argument parsing, I/O, logging
// setup and exit codes. Record handling lives in `dnsport-core`.
//
// ## Streams
//
// - stdout: JSON documents only
// - stderr: logs, confirmations and errors

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

/// Exit codes shared by both binaries
///
/// - 0: Run completed (individual records may still have failed)
/// - 1: Input, credential or validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliExitCode {
    /// Run completed
    Success = 0,
    /// Run could not start or its input was rejected
    Failure = 1,
}

impl From<CliExitCode> for ExitCode {
    fn from(code: CliExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Exit code for a finished run; a failure is logged once, on stderr
pub fn finish(result: Result<()>) -> CliExitCode {
    match result {
        Ok(()) => CliExitCode::Success,
        Err(e) => {
            error!("{:#}", e);
            CliExitCode::Failure
        }
    }
}

/// Log level for `dns-export`: warnings by default, `-v` info, `-vv` debug
pub fn export_log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Log level for `dns-import`: info by default, `-v` debug
pub fn import_log_level(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::INFO }
}

/// Install the global tracing subscriber, writing to stderr
pub fn init_logging(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Build the single-threaded runtime the binaries run on
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")
}

/// Domains from the command line, or whitespace-separated from `input`
///
/// `input_is_terminal` guards against waiting on an interactive stdin.
pub fn collect_domains(
    from_args: &[String],
    input: impl Read,
    input_is_terminal: bool,
) -> Result<Vec<String>> {
    if !from_args.is_empty() {
        return Ok(from_args.iter().map(|d| d.trim().to_string()).collect());
    }

    if input_is_terminal {
        anyhow::bail!("No domains given. Pass them with -d or pipe them on stdin.");
    }

    let text = read_all(input).context("Failed to read domains from stdin")?;
    let domains: Vec<String> = text.split_whitespace().map(str::to_string).collect();
    if domains.is_empty() {
        anyhow::bail!("No domains found on stdin");
    }
    Ok(domains)
}

/// Read domains from `-d` values or stdin
pub fn read_domains(from_args: &[String]) -> Result<Vec<String>> {
    let stdin = io::stdin();
    let is_terminal = stdin.is_terminal();
    collect_domains(from_args, stdin.lock(), is_terminal)
}

/// Read the whole input document from `path` or stdin
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display())),
        None => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                anyhow::bail!("No input given. Pass a file with -f or pipe JSON on stdin.");
            }
            read_all(stdin.lock()).context("Failed to read input from stdin")
        }
    }
}

fn read_all(mut input: impl Read) -> io::Result<String> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    Ok(text)
}

/// Write `text` to `path`, or to stdout when there is no path
///
/// Writing a file confirms on stderr.
pub fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, format!("{}\n", text))
                .with_context(|| format!("Failed to write output file {}", path.display()))?;
            eprintln!("Output written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", text).context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
