//! Export Assembler
//!
//! Shapes codec output into the documents the exporters print. Everything is
//! held in `Vec`s internally so the output follows query order and answer
//! order rather than key order.

use crate::record::codec::{self, decode_existing};
use crate::record::{ProviderEntry, RecordEntry, RecordSet, RecordType};
use crate::traits::ExistingRecord;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Records exported for one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRecords {
    /// Domain as it was requested
    pub domain: String,
    /// Non-empty record sets in query order
    pub sets: Vec<RecordSet>,
}

impl DomainRecords {
    /// Number of records across all sets
    pub fn record_count(&self) -> usize {
        self.sets.iter().map(|s| s.records.len()).sum()
    }
}

/// Group decoded record sets for `domain`, dropping empty sets
pub fn assemble(domain: impl Into<String>, sets: Vec<RecordSet>) -> DomainRecords {
    DomainRecords {
        domain: domain.into(),
        sets: sets.into_iter().filter(|s| !s.records.is_empty()).collect(),
    }
}

/// `{ "<domain>": { "<TYPE>": [entry, ...] } }`
impl Serialize for DomainRecords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.domain, &TypeMap(&self.sets))?;
        map.end()
    }
}

struct TypeMap<'a>(&'a [RecordSet]);

impl Serialize for TypeMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for set in self.0 {
            let entries: Vec<RecordEntry> = set.records.iter().map(|r| r.to_entry()).collect();
            map.serialize_entry(set.record_type.as_str(), &entries)?;
        }
        map.end()
    }
}

/// The canonical export document: one single-key object per domain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportDocument {
    pub domains: Vec<DomainRecords>,
}

impl ExportDocument {
    /// Pretty-printed JSON, two-space indent
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of records across all domains
    pub fn record_count(&self) -> usize {
        self.domains.iter().map(DomainRecords::record_count).sum()
    }
}

impl Serialize for ExportDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.domains.len()))?;
        for domain in &self.domains {
            seq.serialize_element(domain)?;
        }
        seq.end()
    }
}

/// One value that is always a list internally
///
/// Serializes as a bare value when it holds exactly one element and as a
/// list otherwise. Accepts either shape on input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneOrMany<T>(pub Vec<T>);

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T: Serialize> Serialize for OneOrMany<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.as_slice() {
            [single] => single.serialize(serializer),
            many => many.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OneOrMany<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr<T> {
            One(T),
            Many(Vec<T>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::One(one) => OneOrMany(vec![one]),
            Repr::Many(many) => OneOrMany(many),
        })
    }
}

/// Records of one type, grouped by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTypeGroup {
    /// Vendor type name (may be outside the catalog, e.g. ALIAS)
    pub record_type: String,
    /// `(name, entries)` in first-seen order
    pub names: Vec<(String, OneOrMany<ProviderEntry>)>,
}

/// What the provider currently holds for a domain
///
/// Serializes as `{ "<domain>": { "<TYPE>": { "<name>": entry | [entry, ...] } } }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderExport {
    pub domain: String,
    pub types: Vec<ProviderTypeGroup>,
}

impl ProviderExport {
    /// Pretty-printed JSON as a one-element document list
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(&[self])?)
    }
}

impl Serialize for ProviderExport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.domain, &ProviderTypes(&self.types))?;
        map.end()
    }
}

struct ProviderTypes<'a>(&'a [ProviderTypeGroup]);

impl Serialize for ProviderTypes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for group in self.0 {
            map.serialize_entry(&group.record_type, &ProviderNames(&group.names))?;
        }
        map.end()
    }
}

struct ProviderNames<'a>(&'a [(String, OneOrMany<ProviderEntry>)]);

impl Serialize for ProviderNames<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, entries) in self.0 {
            map.serialize_entry(name, entries)?;
        }
        map.end()
    }
}

/// Group provider records by type, then by name
///
/// Returns `None` when there is nothing to export.
pub fn assemble_provider(domain: &str, records: &[ExistingRecord]) -> Option<ProviderExport> {
    if records.is_empty() {
        return None;
    }

    let mut types: Vec<ProviderTypeGroup> = Vec::new();
    for record in records {
        let (name, entry) = decode_existing(domain, record);
        let record_type = record
            .parsed_type()
            .map(|t: RecordType| t.to_string())
            .unwrap_or_else(|| record.record_type.to_ascii_uppercase());

        let group = match types.iter().position(|g| g.record_type == record_type) {
            Some(i) => &mut types[i],
            None => {
                types.push(ProviderTypeGroup {
                    record_type,
                    names: Vec::new(),
                });
                let last = types.len() - 1;
                &mut types[last]
            }
        };

        match group.names.iter_mut().find(|(n, _)| *n == name) {
            Some((_, entries)) => entries.0.push(entry),
            None => group.names.push((name, OneOrMany(vec![entry]))),
        }
    }

    Some(ProviderExport {
        domain: domain.to_string(),
        types,
    })
}

/// Whether a provider record belongs to `domain` or one of its subdomains
pub(crate) fn is_at_or_below(domain: &str, record: &ExistingRecord) -> bool {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    if domain == codec::zone_apex(&domain) {
        return true;
    }
    let name = record.name.trim_end_matches('.').to_ascii_lowercase();
    name == domain || name.ends_with(&format!(".{}", domain))
}
