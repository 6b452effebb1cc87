// # Record Resolver Trait
//
// Defines the interface for querying live DNS.
//
// ## Implementations
//
// - Hickory: `dnsport-resolver-hickory` crate
//
// ## Usage
//
// ```rust,ignore
// use dnsport_core::{RecordResolver, RecordType};
//
// let answers = resolver.resolve("example.com", RecordType::MX).await?;
// for answer in answers {
//     println!("{} (ttl {})", answer.presentation, answer.ttl);
// }
// ```

use crate::record::RecordType;
use async_trait::async_trait;

/// Structured fields for the types the codec destructures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerData {
    /// MX rdata
    Mx { preference: u16, exchange: String },
    /// SRV rdata
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    /// NAPTR rdata
    Naptr {
        order: u16,
        preference: u16,
        replacement: String,
    },
    /// Anything else: only the presentation form is meaningful
    Other,
}

/// One answer record, resolver-library neutral
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnswer {
    /// TTL of the answer
    pub ttl: u32,
    /// Zone-file presentation form of the rdata (TXT strings quoted)
    pub presentation: String,
    /// Structured fields, when the type has any
    pub data: AnswerData,
}

impl RawAnswer {
    /// Create an answer with no structured fields
    pub fn other(presentation: impl Into<String>, ttl: u32) -> Self {
        Self {
            ttl,
            presentation: presentation.into(),
            data: AnswerData::Other,
        }
    }

    /// Create an MX answer
    pub fn mx(preference: u16, exchange: impl Into<String>, ttl: u32) -> Self {
        let exchange = exchange.into();
        Self {
            ttl,
            presentation: format!("{} {}", preference, exchange),
            data: AnswerData::Mx {
                preference,
                exchange,
            },
        }
    }

    /// Create an SRV answer
    pub fn srv(priority: u16, weight: u16, port: u16, target: impl Into<String>, ttl: u32) -> Self {
        let target = target.into();
        Self {
            ttl,
            presentation: format!("{} {} {} {}", priority, weight, port, target),
            data: AnswerData::Srv {
                priority,
                weight,
                port,
                target,
            },
        }
    }
}

/// Trait for DNS resolver implementations
///
/// # Errors
///
/// Implementations must map resolver failures onto the core taxonomy:
/// - the domain does not exist → [`crate::Error::NxDomain`]
/// - no records of that type → [`crate::Error::NoAnswer`]
/// - anything else → [`crate::Error::Resolver`]
///
/// The export pipeline skips the first two silently and reports the third.
///
/// # Behavior
///
/// - One query per call; no retries, no caching between calls
/// - Only answers of the queried type are returned (CNAME chain records
///   that the resolver followed are not)
#[async_trait]
pub trait RecordResolver: Send + Sync {
    /// Resolve all records of `record_type` for `domain`
    ///
    /// `domain` is given without a trailing dot; implementations query it as
    /// an absolute name.
    async fn resolve(
        &self,
        domain: &str,
        record_type: RecordType,
    ) -> Result<Vec<RawAnswer>, crate::Error>;
}
