//! Export pipelines
//!
//! - [`Exporter`]: live DNS → canonical document
//! - [`export_provider`]: what the vendor holds → provider document
//!
//! ## Flow
//!
//! ```text
//! for each domain:
//!     for each record type:
//!         RecordResolver::resolve ──► codec::decode ──► RecordSet
//!     apply_cname_policy
//!     assemble ──► DomainRecords
//! ```
//!
//! Queries run one at a time. A failed query only loses its own
//! (domain, type) pair.

pub mod assembler;

pub use assembler::{
    DomainRecords, ExportDocument, OneOrMany, ProviderExport, ProviderTypeGroup, assemble,
    assemble_provider,
};

use crate::config::ExportConfig;
use crate::error::Result;
use crate::record::RecordSet;
use crate::record::codec::{self, apply_cname_policy};
use crate::traits::{DnsProvider, RecordResolver};
use tracing::{debug, error, info};

/// Exports live DNS records through a [`RecordResolver`]
pub struct Exporter<'a> {
    resolver: &'a dyn RecordResolver,
    config: &'a ExportConfig,
}

impl<'a> Exporter<'a> {
    /// Create a new exporter
    pub fn new(resolver: &'a dyn RecordResolver, config: &'a ExportConfig) -> Self {
        Self { resolver, config }
    }

    /// Export every configured record type for one domain
    pub async fn export_domain(&self, domain: &str) -> DomainRecords {
        let query_name = domain.trim().trim_end_matches('.');
        let mut sets = Vec::new();

        for &record_type in &self.config.record_types {
            debug!("Querying {} records for {}", record_type, query_name);

            match self.resolver.resolve(query_name, record_type).await {
                Ok(answers) => {
                    let records = codec::decode(query_name, record_type, &answers, self.config.raw);
                    if !records.is_empty() {
                        sets.push(RecordSet::new(record_type, records));
                    }
                }
                Err(e) if e.is_not_found() => {
                    debug!("{}", e);
                }
                Err(e) => {
                    error!("Error querying {} records for {}: {}", record_type, query_name, e);
                }
            }
        }

        apply_cname_policy(query_name, &mut sets, self.config.keep_both);
        let records = assemble(domain.trim(), sets);
        info!(
            "Exported {} record(s) for {}",
            records.record_count(),
            records.domain
        );
        records
    }

    /// Export every domain in order
    pub async fn export<S: AsRef<str>>(&self, domains: &[S]) -> ExportDocument {
        let mut document = ExportDocument::default();
        for domain in domains {
            document.domains.push(self.export_domain(domain.as_ref()).await);
        }
        document
    }
}

/// Export what the provider currently holds for `domain`
///
/// The provider is queried by zone; when `domain` is a subdomain only the
/// records at or below it are kept. Returns `Ok(None)` when nothing is left.
pub async fn export_provider(
    provider: &dyn DnsProvider,
    domain: &str,
) -> Result<Option<ProviderExport>> {
    let domain = domain.trim().trim_end_matches('.');
    let zone = codec::zone_apex(domain);

    debug!("Retrieving all records for {} from {}", zone, provider.provider_name());
    let records = provider.retrieve(&zone).await?;
    let records: Vec<_> = records
        .into_iter()
        .filter(|r| assembler::is_at_or_below(domain, r))
        .collect();

    info!("Provider holds {} record(s) for {}", records.len(), domain);
    Ok(assemble_provider(domain, &records))
}
