//! Error types for dnsport
//!
//! This module defines all error types used throughout the crate.
//!
//! The variants fall into the categories the pipelines react to:
//! - not found (`NxDomain`, `NoAnswer`): silently skipped
//! - transport (`Resolver`, `Http`): reported, the pair or record is skipped
//! - validation (`Schema` is fatal, `MissingField`/`InvalidInput` per record)
//! - vendor rejection (`VendorRejection`): reported with the vendor message
//! - configuration (`Config`): fatal at startup

use crate::schema::SchemaViolation;
use thiserror::Error;

/// Result type alias for dnsport operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dnsport
#[derive(Error, Debug)]
pub enum Error {
    /// The queried domain does not exist
    #[error("Domain does not exist: {0}")]
    NxDomain(String),

    /// The domain exists but has no records of the queried type
    #[error("No {record_type} records for {domain}")]
    NoAnswer {
        /// Queried domain
        domain: String,
        /// Queried record type
        record_type: String,
    },

    /// Resolver transport errors (timeouts, SERVFAIL, unreachable servers)
    #[error("Resolver error: {0}")]
    Resolver(String),

    /// HTTP client errors (from the vendor API)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The vendor answered with an ERROR status
    #[error("Provider rejected request: {}", message.as_deref().unwrap_or("No detailed message provided"))]
    VendorRejection {
        /// Human-readable message from the vendor, if any
        message: Option<String>,
    },

    /// The import document does not have the required structure
    #[error("Input does not conform to the import schema ({} violation(s))", .0.len())]
    Schema(Vec<SchemaViolation>),

    /// A record lacks a field its type requires
    #[error("Missing '{field}' for {record_type} record")]
    MissingField {
        /// Record type of the offending record
        record_type: String,
        /// Name of the missing field
        field: &'static str,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors (reading input, writing output)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an NXDOMAIN error
    pub fn nx_domain(domain: impl Into<String>) -> Self {
        Self::NxDomain(domain.into())
    }

    /// Create a "no records of this type" error
    pub fn no_answer(domain: impl Into<String>, record_type: impl ToString) -> Self {
        Self::NoAnswer {
            domain: domain.into(),
            record_type: record_type.to_string(),
        }
    }

    /// Create a resolver transport error
    pub fn resolver(msg: impl Into<String>) -> Self {
        Self::Resolver(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a vendor rejection error
    pub fn vendor_rejection(message: Option<String>) -> Self {
        Self::VendorRejection { message }
    }

    /// Create a missing field error
    pub fn missing_field(record_type: impl ToString, field: &'static str) -> Self {
        Self::MissingField {
            record_type: record_type.to_string(),
            field,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// True for NXDOMAIN and NoAnswer, which are expected during export
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NxDomain(_) | Self::NoAnswer { .. })
    }

    /// The vendor-supplied message, when the vendor rejected a request
    pub fn vendor_message(&self) -> Option<&str> {
        match self {
            Self::VendorRejection { message } => message.as_deref(),
            _ => None,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
