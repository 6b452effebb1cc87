//! Collaborator traits
//!
//! dnsport talks to exactly two external services. Both sit behind a trait
//! so the pipelines can be exercised against test doubles.
//!
//! - [`RecordResolver`]: Query live DNS for one (domain, type) pair
//! - [`DnsProvider`]: Read and write records through the vendor API

pub mod dns_provider;
pub mod resolver;

pub use dns_provider::{DnsProvider, ExistingRecord};
pub use resolver::{AnswerData, RawAnswer, RecordResolver};
