// # dns-export
//
// Queries live DNS for a list of domains and prints the canonical JSON
// export document.
//
// ## Example
//
// ```bash
// dns-export -d example.com www.example.com -f records.json
// echo "example.com" | dns-export --all --exclude DNSKEY NSEC
// ```

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use dnsport_cli::{CliExitCode, finish, export_log_level, init_logging, read_domains, runtime, write_output};
use dnsport_core::{ExportConfig, Exporter, RecordType};
use dnsport_resolver_hickory::HickoryResolver;
use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Export DNS records for one or more domains as JSON.
///
/// Domains are taken from -d, or read whitespace-separated from stdin.
#[derive(Parser, Debug)]
#[command(name = "dns-export", version)]
struct Args {
    /// Domains to export
    #[arg(short = 'd', long = "domains", num_args = 1..)]
    domains: Vec<String>,

    /// Write the JSON document to this file instead of stdout
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Keep each record in its verbatim presentation form
    #[arg(long)]
    raw: bool,

    /// Query every supported record type instead of the common set
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// Record types to leave out
    #[arg(long, num_args = 1..)]
    exclude: Vec<RecordType>,

    /// Keep A/AAAA records for names that also have a CNAME
    #[arg(long = "keep-a-aaaa")]
    keep_a_aaaa: bool,

    /// Nameservers to query (default 8.8.8.8 8.8.4.4)
    #[arg(long = "nameserver", num_args = 1..)]
    nameservers: Vec<IpAddr>,
}

impl Args {
    fn export_config(&self) -> ExportConfig {
        ExportConfig::new(self.all, &self.exclude)
            .with_raw(self.raw)
            .with_keep_both(self.keep_a_aaaa)
            .with_nameservers(self.nameservers.clone())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(export_log_level(args.verbose)) {
        eprintln!("{:#}", e);
        return CliExitCode::Failure.into();
    }

    finish(run(args)).into()
}

fn run(args: Args) -> Result<()> {
    let config = args.export_config();
    config.validate()?;

    let domains = read_domains(&args.domains)?;
    info!(
        "Exporting {} domain(s), {} record type(s) each",
        domains.len(),
        config.record_types.len()
    );

    let document = runtime()?.block_on(async {
        let resolver = HickoryResolver::new(&config)?;
        let document = Exporter::new(&resolver, &config).export(&domains).await;
        Ok::<_, dnsport_core::Error>(document)
    })?;

    let json = document
        .to_json_pretty()
        .context("Failed to serialize export document")?;
    write_output(args.file.as_deref(), &json)
}
