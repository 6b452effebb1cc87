//! Reconciliation engine
//!
//! The ImportEngine is responsible for:
//! - Encoding each input record as a vendor payload
//! - Looking up what the provider already holds for (zone, type, name)
//! - Deciding create / update / skip
//! - Issuing at most one write per record
//!
//! ## Per-record states
//!
//! ```text
//! START ──► encode ──► LOOKUP ──┬── match, no force ──► SKIPPED
//!   │                           ├── match, force ─────► edit ───► UPDATED
//!   │                           └── no match ─────────► create ─► CREATED
//!   │
//!   └── any failure on the way ───────────────────────────────► ERRORED
//! ```
//!
//! A failed lookup is ERRORED, never treated as "no match": creating on a
//! failed lookup would duplicate records.

use crate::config::ImportConfig;
use crate::record::codec;
use crate::record::{RecordEntry, RecordType, VendorRecord};
use crate::schema::ImportDocument;
use crate::traits::{DnsProvider, ExistingRecord};
use tracing::{debug, error, info};

/// Terminal state of one input record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// An identical record exists and force was not set
    Skipped { id: String },
    /// An identical record existed and was rewritten
    Updated { id: String },
    /// The record was created
    Created { id: Option<String> },
    /// Validation, lookup or write failed
    Errored {
        error: String,
        vendor_message: Option<String>,
    },
}

impl Outcome {
    fn label(&self) -> &'static str {
        match self {
            Outcome::Skipped { .. } => "SKIPPED",
            Outcome::Updated { .. } => "UPDATED",
            Outcome::Created { .. } => "CREATED",
            Outcome::Errored { .. } => "ERRORED",
        }
    }

    fn errored(err: crate::Error) -> Self {
        Outcome::Errored {
            vendor_message: err.vendor_message().map(str::to_string),
            error: err.to_string(),
        }
    }
}

/// Outcome of one input record, with enough context to report it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Domain the record was listed under
    pub domain: String,
    /// Fully qualified owner name
    pub name: String,
    pub record_type: RecordType,
    pub content: String,
    pub outcome: Outcome,
}

/// Everything an import run did, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub outcomes: Vec<RecordOutcome>,
}

impl ImportReport {
    fn count(&self, f: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| f(&o.outcome)).count()
    }

    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Created { .. }))
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Updated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped { .. }))
    }

    pub fn errored(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Errored { .. }))
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// What to do with one payload given the provider's current records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision<'r> {
    Skip(&'r ExistingRecord),
    Update(&'r ExistingRecord),
    Create,
}

/// First existing record, in provider order, that matches `payload`
///
/// Content must be equal; for priority-bearing types `prio` must be equal
/// too, compared as strings.
pub fn find_match<'r>(
    payload: &VendorRecord,
    existing: &'r [ExistingRecord],
) -> Option<&'r ExistingRecord> {
    existing.iter().find(|record| {
        record
            .record_type
            .eq_ignore_ascii_case(payload.record_type.as_str())
            && record.content == payload.content
            && (!payload.record_type.is_priority_bearing()
                || record.prio.as_deref().map(str::trim) == payload.prio.as_deref().map(str::trim))
    })
}

/// Decide between skip, update and create
pub fn decide<'r>(
    payload: &VendorRecord,
    existing: &'r [ExistingRecord],
    force: bool,
) -> Decision<'r> {
    match find_match(payload, existing) {
        Some(found) if force => Decision::Update(found),
        Some(found) => Decision::Skip(found),
        None => Decision::Create,
    }
}

/// Applies an import document to a [`DnsProvider`]
pub struct ImportEngine<'a> {
    provider: &'a dyn DnsProvider,
    config: ImportConfig,
}

impl<'a> ImportEngine<'a> {
    /// Create a new engine
    pub fn new(provider: &'a dyn DnsProvider, config: ImportConfig) -> Self {
        Self { provider, config }
    }

    /// Process every record of the document, sequentially and in input order
    pub async fn run(&self, document: &ImportDocument) -> ImportReport {
        info!(
            "Importing {} record(s) into {} (force: {})",
            document.record_count(),
            self.provider.provider_name(),
            self.config.force
        );

        let mut report = ImportReport::default();
        for domain in &document.domains {
            for (record_type, entries) in &domain.record_sets {
                for entry in entries {
                    let outcome = self
                        .process_record(&domain.domain, *record_type, entry)
                        .await;
                    report.outcomes.push(outcome);
                }
            }
        }

        info!(
            "Import finished: {} created, {} updated, {} skipped, {} errored",
            report.created(),
            report.updated(),
            report.skipped(),
            report.errored()
        );
        report
    }

    /// Reconcile a single record
    pub async fn process_record(
        &self,
        domain: &str,
        record_type: RecordType,
        entry: &RecordEntry,
    ) -> RecordOutcome {
        let outcome = self.reconcile(domain, record_type, entry).await;
        let record = RecordOutcome {
            domain: domain.to_string(),
            name: codec::owner_name(domain, entry.name.as_deref()),
            record_type,
            content: entry.content.clone(),
            outcome,
        };
        log_outcome(&record);
        record
    }

    async fn reconcile(&self, domain: &str, record_type: RecordType, entry: &RecordEntry) -> Outcome {
        let payload = match codec::encode(domain, record_type, entry) {
            Ok(payload) => payload,
            Err(e) => return Outcome::errored(e),
        };
        let zone = codec::zone_apex(domain);

        debug!(
            "Looking up {} records named '{}' in {}",
            record_type, payload.name, zone
        );
        let existing = match self
            .provider
            .retrieve_by_name_type(&zone, record_type, payload.lookup_subdomain())
            .await
        {
            Ok(existing) => existing,
            Err(e) => return Outcome::errored(e),
        };

        match decide(&payload, &existing, self.config.force) {
            Decision::Skip(found) => Outcome::Skipped {
                id: found.id.clone(),
            },
            Decision::Update(found) => match self.provider.edit(&zone, &found.id, &payload).await {
                Ok(()) => Outcome::Updated {
                    id: found.id.clone(),
                },
                Err(e) => Outcome::errored(e),
            },
            Decision::Create => match self.provider.create(&zone, &payload).await {
                Ok(id) => Outcome::Created { id },
                Err(e) => Outcome::errored(e),
            },
        }
    }
}

fn log_outcome(record: &RecordOutcome) {
    let label = record.outcome.label();
    match &record.outcome {
        Outcome::Skipped { id } | Outcome::Updated { id } => info!(
            "{} {} {} {} ({}) id={}",
            label, record.record_type, record.name, record.content, record.domain, id
        ),
        Outcome::Created { id } => info!(
            "{} {} {} {} ({}) id={}",
            label,
            record.record_type,
            record.name,
            record.content,
            record.domain,
            id.as_deref().unwrap_or("-")
        ),
        Outcome::Errored {
            error,
            vendor_message,
        } => error!(
            "{} {} {} {} ({}): {}{}",
            label,
            record.record_type,
            record.name,
            record.content,
            record.domain,
            error,
            vendor_message
                .as_deref()
                .map(|m| format!(" [provider: {}]", m))
                .unwrap_or_default()
        ),
    }
}
