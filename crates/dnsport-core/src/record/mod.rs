//! Record model
//!
//! - [`RecordType`]: the closed catalog of record types dnsport knows about
//! - [`CanonicalRecord`] / [`RecordData`]: typed records, one variant per field template
//! - [`RecordEntry`]: the JSON object form used in export and import documents
//! - [`VendorRecord`]: the flat payload sent to the provider
//!
//! Every record of a given type carries exactly that type's field set. The
//! JSON form is derived from the typed form, never the other way around.

pub mod codec;
pub mod flex;

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// DNS record type
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordType {
    A,
    AAAA,
    AFSDB,
    APL,
    CAA,
    CDNSKEY,
    CDS,
    CERT,
    CNAME,
    DHCID,
    DLV,
    DNAME,
    DNSKEY,
    DS,
    EUI48,
    EUI64,
    HINFO,
    HIP,
    IPSECKEY,
    KEY,
    KX,
    LOC,
    MX,
    NAPTR,
    NS,
    NSEC,
    NSEC3,
    NSEC3PARAM,
    PTR,
    RP,
    SIG,
    SMIMEA,
    SOA,
    SPF,
    SRV,
    SSHFP,
    SVCB,
    TLSA,
    TXT,
    URI,
    ZONEMD,
}

impl RecordType {
    /// Types queried by default
    pub const COMMON: &'static [RecordType] = &[
        RecordType::A,
        RecordType::AAAA,
        RecordType::CNAME,
        RecordType::MX,
        RecordType::TXT,
        RecordType::SPF,
    ];

    /// Types queried in "all types" mode, in output order
    pub const ALL: &'static [RecordType] = &[
        RecordType::A,
        RecordType::AAAA,
        RecordType::AFSDB,
        RecordType::APL,
        RecordType::CAA,
        RecordType::CDNSKEY,
        RecordType::CDS,
        RecordType::CERT,
        RecordType::CNAME,
        RecordType::DHCID,
        RecordType::DLV,
        RecordType::DNAME,
        RecordType::DNSKEY,
        RecordType::DS,
        RecordType::EUI48,
        RecordType::EUI64,
        RecordType::HINFO,
        RecordType::HIP,
        RecordType::IPSECKEY,
        RecordType::KEY,
        RecordType::KX,
        RecordType::LOC,
        RecordType::MX,
        RecordType::NAPTR,
        RecordType::NS,
        RecordType::NSEC,
        RecordType::NSEC3,
        RecordType::NSEC3PARAM,
        RecordType::PTR,
        RecordType::RP,
        RecordType::SIG,
        RecordType::SMIMEA,
        RecordType::SOA,
        RecordType::SPF,
        RecordType::SRV,
        RecordType::SSHFP,
        RecordType::SVCB,
        RecordType::TLSA,
        RecordType::TXT,
        RecordType::URI,
        RecordType::ZONEMD,
    ];

    /// Presentation name
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::AFSDB => "AFSDB",
            RecordType::APL => "APL",
            RecordType::CAA => "CAA",
            RecordType::CDNSKEY => "CDNSKEY",
            RecordType::CDS => "CDS",
            RecordType::CERT => "CERT",
            RecordType::CNAME => "CNAME",
            RecordType::DHCID => "DHCID",
            RecordType::DLV => "DLV",
            RecordType::DNAME => "DNAME",
            RecordType::DNSKEY => "DNSKEY",
            RecordType::DS => "DS",
            RecordType::EUI48 => "EUI48",
            RecordType::EUI64 => "EUI64",
            RecordType::HINFO => "HINFO",
            RecordType::HIP => "HIP",
            RecordType::IPSECKEY => "IPSECKEY",
            RecordType::KEY => "KEY",
            RecordType::KX => "KX",
            RecordType::LOC => "LOC",
            RecordType::MX => "MX",
            RecordType::NAPTR => "NAPTR",
            RecordType::NS => "NS",
            RecordType::NSEC => "NSEC",
            RecordType::NSEC3 => "NSEC3",
            RecordType::NSEC3PARAM => "NSEC3PARAM",
            RecordType::PTR => "PTR",
            RecordType::RP => "RP",
            RecordType::SIG => "SIG",
            RecordType::SMIMEA => "SMIMEA",
            RecordType::SOA => "SOA",
            RecordType::SPF => "SPF",
            RecordType::SRV => "SRV",
            RecordType::SSHFP => "SSHFP",
            RecordType::SVCB => "SVCB",
            RecordType::TLSA => "TLSA",
            RecordType::TXT => "TXT",
            RecordType::URI => "URI",
            RecordType::ZONEMD => "ZONEMD",
        }
    }

    /// IANA type code, used by resolvers that cannot name every type
    pub fn code(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::PTR => 12,
            RecordType::HINFO => 13,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::RP => 17,
            RecordType::AFSDB => 18,
            RecordType::SIG => 24,
            RecordType::KEY => 25,
            RecordType::AAAA => 28,
            RecordType::LOC => 29,
            RecordType::SRV => 33,
            RecordType::NAPTR => 35,
            RecordType::KX => 36,
            RecordType::CERT => 37,
            RecordType::DNAME => 39,
            RecordType::APL => 42,
            RecordType::DS => 43,
            RecordType::SSHFP => 44,
            RecordType::IPSECKEY => 45,
            RecordType::NSEC => 47,
            RecordType::DNSKEY => 48,
            RecordType::DHCID => 49,
            RecordType::NSEC3 => 50,
            RecordType::NSEC3PARAM => 51,
            RecordType::TLSA => 52,
            RecordType::SMIMEA => 53,
            RecordType::HIP => 55,
            RecordType::CDS => 59,
            RecordType::CDNSKEY => 60,
            RecordType::ZONEMD => 63,
            RecordType::SVCB => 64,
            RecordType::SPF => 99,
            RecordType::EUI48 => 108,
            RecordType::EUI64 => 109,
            RecordType::URI => 256,
            RecordType::CAA => 257,
            RecordType::DLV => 32769,
        }
    }

    /// MX, SRV and NAPTR carry an ordering field the vendor calls `prio`
    pub fn is_priority_bearing(&self) -> bool {
        matches!(self, RecordType::MX | RecordType::SRV | RecordType::NAPTR)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        RecordType::ALL
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| Error::invalid_input(format!("Unknown record type: {}", s)))
    }
}

impl Serialize for RecordType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecordType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Type-specific record fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    /// Mail exchanger
    Mx { exchange: String, preference: u16 },
    /// Service locator
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    /// Naming authority pointer
    Naptr {
        order: u16,
        preference: u16,
        replacement: String,
    },
    /// Text, surrounding quotes stripped
    Txt { text: String },
    /// Any other type, presentation content as-is
    Generic { content: String },
    /// Raw mode: the verbatim presentation string, no restructuring
    Raw { content: String },
}

/// A normalized, type-tagged DNS record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRecord {
    /// Owner name, no trailing dot
    pub name: String,
    /// Record type
    pub record_type: RecordType,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Type-specific fields
    pub data: RecordData,
}

impl CanonicalRecord {
    /// Create a new record; a trailing dot on `name` is dropped
    pub fn new(name: &str, record_type: RecordType, ttl: u32, data: RecordData) -> Self {
        Self {
            name: name.trim_end_matches('.').to_string(),
            record_type,
            ttl,
            data,
        }
    }

    /// The `content` field of the JSON form
    pub fn content(&self) -> String {
        match &self.data {
            RecordData::Mx { exchange, .. } => exchange.clone(),
            RecordData::Srv {
                weight,
                port,
                target,
                ..
            } => format!("{} {} {}", weight, port, target),
            RecordData::Naptr { replacement, .. } => replacement.clone(),
            RecordData::Txt { text } => text.clone(),
            RecordData::Generic { content } | RecordData::Raw { content } => content.clone(),
        }
    }

    /// The vendor `prio` value, for MX and SRV
    pub fn prio(&self) -> Option<u16> {
        match &self.data {
            RecordData::Mx { preference, .. } => Some(*preference),
            RecordData::Srv { priority, .. } => Some(*priority),
            _ => None,
        }
    }

    /// Render the JSON object form
    pub fn to_entry(&self) -> RecordEntry {
        let mut entry = RecordEntry::new(self.content(), self.ttl);
        entry.prio = self.prio().map(|p| p.to_string());
        if let RecordData::Naptr {
            order, preference, ..
        } = &self.data
        {
            entry.order = Some(order.to_string());
            entry.preference = Some(preference.to_string());
        }
        entry
    }

    /// Parse the JSON object form back into the typed template for `record_type`
    ///
    /// Raw-mode entries come back typed: the JSON form does not record
    /// whether it was produced in raw mode.
    pub fn from_entry(name: &str, record_type: RecordType, entry: &RecordEntry) -> Result<Self> {
        let ttl = parse_number::<u32>(record_type, "ttl", &entry.ttl)?;

        let data = match record_type {
            RecordType::MX => RecordData::Mx {
                exchange: entry.content.clone(),
                preference: required_number(record_type, "prio", entry.prio.as_deref())?,
            },
            RecordType::SRV => {
                let parts: Vec<&str> = entry.content.split_whitespace().collect();
                let [weight, port, target] = parts.as_slice() else {
                    return Err(Error::invalid_input(format!(
                        "SRV content must be '<weight> <port> <target>', got '{}'",
                        entry.content
                    )));
                };
                RecordData::Srv {
                    priority: required_number(record_type, "prio", entry.prio.as_deref())?,
                    weight: parse_number(record_type, "weight", weight)?,
                    port: parse_number(record_type, "port", port)?,
                    target: target.to_string(),
                }
            }
            RecordType::NAPTR => RecordData::Naptr {
                order: required_number(record_type, "order", entry.order.as_deref())?,
                preference: required_number(
                    record_type,
                    "preference",
                    entry.preference.as_deref(),
                )?,
                replacement: entry.content.clone(),
            },
            RecordType::TXT => RecordData::Txt {
                text: entry.content.clone(),
            },
            _ => RecordData::Generic {
                content: entry.content.clone(),
            },
        };

        Ok(Self::new(name, record_type, ttl, data))
    }
}

fn required_number<T: FromStr>(
    record_type: RecordType,
    field: &'static str,
    value: Option<&str>,
) -> Result<T> {
    let value = value.ok_or_else(|| Error::missing_field(record_type, field))?;
    parse_number(record_type, field, value)
}

fn parse_number<T: FromStr>(record_type: RecordType, field: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        Error::invalid_input(format!(
            "{} record has non-numeric {}: '{}'",
            record_type, field, value
        ))
    })
}

/// JSON object form of one record
///
/// Numeric fields are strings on output; input accepts strings or integers.
/// Absent fields are omitted, never `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    /// Record content
    pub content: String,

    /// Time-to-live
    #[serde(deserialize_with = "flex::string_or_number")]
    pub ttl: String,

    /// Priority (MX, SRV, NAPTR)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "flex::opt_string_or_number"
    )]
    pub prio: Option<String>,

    /// NAPTR order
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "flex::opt_string_or_number"
    )]
    pub order: Option<String>,

    /// NAPTR preference
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "flex::opt_string_or_number"
    )]
    pub preference: Option<String>,

    /// Owner name; absent means the domain the entry is listed under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RecordEntry {
    /// Create an entry with only content and ttl
    pub fn new(content: impl Into<String>, ttl: impl ToString) -> Self {
        Self {
            content: content.into(),
            ttl: ttl.to_string(),
            prio: None,
            order: None,
            preference: None,
            name: None,
        }
    }

    /// Set the priority
    pub fn with_prio(mut self, prio: impl ToString) -> Self {
        self.prio = Some(prio.to_string());
        self
    }

    /// Set the owner name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// All records of one type for one domain, in answer order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    /// Record type shared by every record in the set
    pub record_type: RecordType,
    /// Records, never empty once assembled
    pub records: Vec<CanonicalRecord>,
}

impl RecordSet {
    /// Create a record set
    pub fn new(record_type: RecordType, records: Vec<CanonicalRecord>) -> Self {
        Self {
            record_type,
            records,
        }
    }
}

/// A provider record in export form: name resolved, only non-null fields kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// Record content (MX flattened to `"<prio> <target>"`)
    pub content: String,
    /// Time-to-live, omitted when the vendor has none
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "flex::opt_string_or_number"
    )]
    pub ttl: Option<String>,
}

/// Flat record payload for the vendor API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorRecord {
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Record content
    pub content: String,
    /// Time-to-live
    pub ttl: String,
    /// `"@"` for the zone apex, else the subdomain relative to the zone
    pub name: String,
    /// Priority, only for MX/SRV/NAPTR
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prio: Option<String>,
}

impl VendorRecord {
    /// Subdomain as the vendor's lookup endpoint expects it (empty for the apex)
    pub fn lookup_subdomain(&self) -> &str {
        if self.name == "@" { "" } else { &self.name }
    }
}
