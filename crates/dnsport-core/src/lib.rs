// # dnsport-core
//
// Core library for exporting DNS records into a canonical JSON document and
// importing that document into a hosted DNS provider.
//
// ## Architecture Overview
//
// - **RecordResolver**: Trait for querying live DNS (one domain, one type)
// - **DnsProvider**: Trait for the vendor API (retrieve, create, edit)
// - **Record Codec**: Resolver answers / vendor records <-> canonical records
// - **Export Assembler**: Canonical records -> export document
// - **Schema Validator**: Structural check of an import document
// - **ImportEngine**: Create / update / skip reconciliation per record
//
// ## Control Flow
//
// Export: resolver -> codec (decode) -> CNAME policy -> assembler -> JSON
// Import: JSON -> schema -> codec (encode) -> engine -> provider calls
//
// Everything runs sequentially. Each call is awaited before the next one is
// issued, and no state crosses record boundaries.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod record;
pub mod schema;
pub mod traits;

// Re-export core types for convenience
pub use config::{Credentials, ExportConfig, ImportConfig, PorkbunConfig};
pub use engine::{ImportEngine, ImportReport, Outcome, RecordOutcome};
pub use error::{Error, Result};
pub use export::{ExportDocument, Exporter, ProviderExport, export_provider};
pub use record::{CanonicalRecord, RecordData, RecordEntry, RecordType, VendorRecord};
pub use schema::{ImportDocument, SchemaViolation};
pub use traits::{DnsProvider, ExistingRecord, RawAnswer, RecordResolver};
