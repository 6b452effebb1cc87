// # dns-import
//
// Applies a JSON export document to Porkbun: records that already exist are
// skipped (or rewritten with --force), missing records are created.
// Nothing is ever deleted.
//
// ## Configuration
//
// - `PORKBUN_API_KEY`: API key (required)
// - `PORKBUN_SECRET_KEY`: secret API key (required)
// - `PORKBUN_API_BASE`: API base URL (optional)
//
// ## Example
//
// ```bash
// export PORKBUN_API_KEY=pk1_...
// export PORKBUN_SECRET_KEY=sk1_...
//
// dns-export -d example.com | dns-import --dry-run
// dns-import -f records.json --force
// dns-import --export-provider example.com
// ```

use anyhow::{Context, Result};
use clap::Parser;
use dnsport_cli::{CliExitCode, finish, import_log_level, init_logging, read_input, runtime, write_output};
use dnsport_core::{
    Error, ImportConfig, ImportDocument, ImportEngine, PorkbunConfig, export_provider,
};
use dnsport_provider_porkbun::PorkbunProvider;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Import DNS records from a JSON export into Porkbun.
///
/// Input is read from -f, or from stdin.
#[derive(Parser, Debug)]
#[command(name = "dns-import", version)]
struct Args {
    /// JSON document to import
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Rewrite records that already exist instead of skipping them
    #[arg(long)]
    force: bool,

    /// Log requests and decisions at debug level
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Look up existing records but only log the writes
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Print what Porkbun holds for DOMAIN instead of importing
    #[arg(long = "export-provider", value_name = "DOMAIN")]
    export_provider: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(import_log_level(args.verbose)) {
        eprintln!("{:#}", e);
        return CliExitCode::Failure.into();
    }

    finish(run(args)).into()
}

fn run(args: Args) -> Result<()> {
    let config = PorkbunConfig::from_env()?.with_dry_run(args.dry_run);
    let provider = PorkbunProvider::new(&config)?;
    let rt = runtime()?;

    if let Some(domain) = &args.export_provider {
        let export = rt
            .block_on(export_provider(&provider, domain))?
            .with_context(|| format!("No records found for {}", domain))?;
        return write_output(None, &export.to_json_pretty()?);
    }

    let input = read_input(args.file.as_deref())?;
    let document = match ImportDocument::parse(&input) {
        Ok(document) => document,
        Err(Error::Schema(violations)) => {
            for violation in &violations {
                error!("Invalid input at {}", violation);
            }
            anyhow::bail!(
                "Input does not conform to the import schema ({} violation(s))",
                violations.len()
            );
        }
        Err(e) => return Err(e).context("Failed to parse input JSON"),
    };

    let engine = ImportEngine::new(&provider, ImportConfig::new(args.force));
    let report = rt.block_on(engine.run(&document));

    info!(
        "{} record(s): {} created, {} updated, {} skipped, {} errored",
        report.total(),
        report.created(),
        report.updated(),
        report.skipped(),
        report.errored()
    );
    if report.errored() > 0 {
        warn!("{} record(s) could not be imported", report.errored());
    }
    Ok(())
}
