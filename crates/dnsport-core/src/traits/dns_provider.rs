// # DNS Provider Trait
//
// Defines the interface to the hosting vendor's record API.
//
// ## Implementations
//
// - Porkbun: `dnsport-provider-porkbun` crate
//
// ## Usage
//
// ```rust,ignore
// use dnsport_core::{DnsProvider, RecordType};
//
// let existing = provider
//     .retrieve_by_name_type("example.com", RecordType::A, "www")
//     .await?;
// ```

use crate::record::{RecordType, VendorRecord, flex};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A record as the vendor currently stores it
///
/// Read-only snapshot. The `id` is only used to target edit calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingRecord {
    /// Vendor record id
    #[serde(deserialize_with = "flex::string_or_number")]
    pub id: String,

    /// Fully qualified record name
    pub name: String,

    /// Record type as the vendor names it (may be outside the catalog, e.g. ALIAS)
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record content
    pub content: String,

    /// Time-to-live
    #[serde(default, deserialize_with = "flex::opt_string_or_number")]
    pub ttl: Option<String>,

    /// Priority
    #[serde(default, deserialize_with = "flex::opt_string_or_number")]
    pub prio: Option<String>,

    /// Free-form vendor notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExistingRecord {
    /// The record type, if it is in the catalog
    pub fn parsed_type(&self) -> Option<RecordType> {
        self.record_type.parse().ok()
    }
}

/// Trait for DNS provider implementations
///
/// # Contract
///
/// - Every method is a single request/response round trip
/// - No retries, no caching, no background tasks
/// - A vendor `ERROR` status maps to [`crate::Error::VendorRejection`]
///   carrying the vendor's message
/// - Transport and decoding failures map to [`crate::Error::Http`]
/// - `domain` is the zone the vendor keys its API by (see
///   [`crate::record::codec::zone_apex`])
///
/// Deciding whether a write is needed is NOT the provider's job; that belongs
/// to [`crate::engine::ImportEngine`].
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Retrieve every record of a zone
    async fn retrieve(&self, domain: &str) -> Result<Vec<ExistingRecord>, crate::Error>;

    /// Retrieve records of one type at one subdomain (`""` for the apex)
    async fn retrieve_by_name_type(
        &self,
        domain: &str,
        record_type: RecordType,
        subdomain: &str,
    ) -> Result<Vec<ExistingRecord>, crate::Error>;

    /// Create a record, returning the new record id when the vendor reports one
    async fn create(
        &self,
        domain: &str,
        record: &VendorRecord,
    ) -> Result<Option<String>, crate::Error>;

    /// Replace the record `record_id` with `record`
    async fn edit(
        &self,
        domain: &str,
        record_id: &str,
        record: &VendorRecord,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
