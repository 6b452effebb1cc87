//! Import document schema
//!
//! An import document is the export format read back in:
//!
//! ```json
//! [
//!   { "example.com": { "A": [ { "content": "192.0.2.1", "ttl": "300" } ] } }
//! ]
//! ```
//!
//! [`validate`] checks the shape of an untyped JSON value and collects every
//! violation with its JSON pointer. [`ImportDocument::parse`] only produces a
//! typed document from input that passed validation, so a malformed document
//! is rejected before any provider call is made.

use crate::error::{Error, Result};
use crate::record::{RecordEntry, RecordType};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// One structural problem in an import document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON pointer to the offending value (`""` for the document root)
    pub path: String,
    /// What is wrong there
    pub message: String,
}

impl SchemaViolation {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Validate the structure of an import document
///
/// Returns [`Error::Schema`] with all violations found, or `Ok(())`.
pub fn validate(document: &Value) -> Result<()> {
    let mut violations = Vec::new();

    match document {
        Value::Array(domains) => {
            for (i, item) in domains.iter().enumerate() {
                validate_domain(&format!("/{}", i), item, &mut violations);
            }
        }
        other => violations.push(SchemaViolation::new(
            "",
            format!("expected an array of domain objects, got {}", kind(other)),
        )),
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::Schema(violations))
    }
}

fn validate_domain(path: &str, item: &Value, violations: &mut Vec<SchemaViolation>) {
    let Value::Object(map) = item else {
        violations.push(SchemaViolation::new(
            path,
            format!("expected a single-key domain object, got {}", kind(item)),
        ));
        return;
    };

    if map.len() != 1 {
        violations.push(SchemaViolation::new(
            path,
            format!("expected exactly one domain key, got {}", map.len()),
        ));
    }

    for (domain, types) in map {
        let path = format!("{}/{}", path, escape(domain));
        if domain.trim().is_empty() {
            violations.push(SchemaViolation::new(&path, "domain name is empty"));
        }

        let Value::Object(types) = types else {
            violations.push(SchemaViolation::new(
                &path,
                format!("expected an object of record types, got {}", kind(types)),
            ));
            continue;
        };

        for (type_name, records) in types {
            let path = format!("{}/{}", path, escape(type_name));
            if type_name.parse::<RecordType>().is_err() {
                violations.push(SchemaViolation::new(
                    &path,
                    format!("unknown record type '{}'", type_name),
                ));
            }

            let Value::Array(records) = records else {
                violations.push(SchemaViolation::new(
                    &path,
                    format!("expected an array of records, got {}", kind(records)),
                ));
                continue;
            };

            for (i, record) in records.iter().enumerate() {
                validate_record(&format!("{}/{}", path, i), record, violations);
            }
        }
    }
}

fn validate_record(path: &str, record: &Value, violations: &mut Vec<SchemaViolation>) {
    let Value::Object(fields) = record else {
        violations.push(SchemaViolation::new(
            path,
            format!("expected a record object, got {}", kind(record)),
        ));
        return;
    };

    match fields.get("content") {
        Some(Value::String(_)) => {}
        Some(other) => violations.push(SchemaViolation::new(
            format!("{}/content", path),
            format!("expected a string, got {}", kind(other)),
        )),
        None => violations.push(SchemaViolation::new(path, "missing required field 'content'")),
    }

    match fields.get("ttl") {
        Some(value) => check_numeric(&format!("{}/ttl", path), value, violations),
        None => violations.push(SchemaViolation::new(path, "missing required field 'ttl'")),
    }

    for field in ["prio", "order", "preference"] {
        if let Some(value) = fields.get(field) {
            check_numeric(&format!("{}/{}", path, field), value, violations);
        }
    }

    if let Some(value) = fields.get("name")
        && !value.is_string()
    {
        violations.push(SchemaViolation::new(
            format!("{}/name", path),
            format!("expected a string, got {}", kind(value)),
        ));
    }
}

fn check_numeric(path: &str, value: &Value, violations: &mut Vec<SchemaViolation>) {
    match value {
        Value::String(_) => {}
        Value::Number(n) if n.is_u64() => {}
        Value::Number(_) => violations.push(SchemaViolation::new(
            path,
            "expected a non-negative integer",
        )),
        other => violations.push(SchemaViolation::new(
            path,
            format!("expected a string or a non-negative integer, got {}", kind(other)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Escape a key for use as a JSON pointer segment (RFC 6901)
fn escape(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

/// A validated import document
///
/// Domains, record types and records keep the order they have in the input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ImportDocument {
    pub domains: Vec<DomainImport>,
}

/// All record sets listed under one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainImport {
    pub domain: String,
    pub record_sets: Vec<(RecordType, Vec<RecordEntry>)>,
}

impl ImportDocument {
    /// Validate and parse an import document from JSON text
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        validate(&value)?;
        // Re-read from the text: the typed pass keeps the key order that
        // `Value` maps do not.
        Ok(serde_json::from_str(text)?)
    }

    /// Number of records across all domains and types
    pub fn record_count(&self) -> usize {
        self.domains
            .iter()
            .flat_map(|d| d.record_sets.iter())
            .map(|(_, entries)| entries.len())
            .sum()
    }
}

impl<'de> Deserialize<'de> for DomainImport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(DomainImportVisitor)
    }
}

struct DomainImportVisitor;

impl<'de> Visitor<'de> for DomainImportVisitor {
    type Value = DomainImport;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a single-key domain object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<DomainImport, A::Error> {
        let (domain, sets) = map
            .next_entry::<String, RecordSets>()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;

        if map.next_key::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::custom("expected exactly one domain key"));
        }

        Ok(DomainImport {
            domain,
            record_sets: sets.0,
        })
    }
}

struct RecordSets(Vec<(RecordType, Vec<RecordEntry>)>);

impl<'de> Deserialize<'de> for RecordSets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct SetsVisitor;

        impl<'de> Visitor<'de> for SetsVisitor {
            type Value = RecordSets;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping record types to record arrays")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<RecordSets, A::Error> {
                let mut sets = Vec::new();
                while let Some((record_type, entries)) =
                    map.next_entry::<RecordType, Vec<RecordEntry>>()?
                {
                    sets.push((record_type, entries));
                }
                Ok(RecordSets(sets))
            }
        }

        deserializer.deserialize_map(SetsVisitor)
    }
}
