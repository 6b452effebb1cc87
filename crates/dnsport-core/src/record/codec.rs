//! Record Codec
//!
//! Type-aware conversions in both directions:
//!
//! - [`decode`]: resolver answers → [`CanonicalRecord`]s
//! - [`apply_cname_policy`]: drop A/AAAA next to a CNAME
//! - [`encode`]: import [`RecordEntry`] → [`VendorRecord`] payload
//! - [`decode_existing`]: vendor [`ExistingRecord`] → export [`ProviderEntry`]
//!
//! ## Field templates
//!
//! | Type  | content                      | extra fields          |
//! |-------|------------------------------|-----------------------|
//! | MX    | exchange                     | prio = preference     |
//! | SRV   | `<weight> <port> <target>`   | prio = priority       |
//! | NAPTR | replacement                  | order, preference     |
//! | TXT   | text, outer quotes stripped  |                       |
//! | other | presentation form            |                       |
//!
//! In raw mode every type uses the last row, verbatim.

use super::{
    CanonicalRecord, ProviderEntry, RecordData, RecordEntry, RecordSet, RecordType, VendorRecord,
};
use crate::error::{Error, Result};
use crate::traits::{AnswerData, ExistingRecord, RawAnswer};
use tracing::{debug, warn};

/// Decode one resolver answer set of `record_type` for `domain`
///
/// Answers whose structured fields do not fit the type's template are
/// dropped with a warning rather than emitted with the wrong field set.
pub fn decode(
    domain: &str,
    record_type: RecordType,
    answers: &[RawAnswer],
    raw: bool,
) -> Vec<CanonicalRecord> {
    answers
        .iter()
        .filter_map(|answer| {
            let data = if raw {
                Some(RecordData::Raw {
                    content: answer.presentation.clone(),
                })
            } else {
                typed_data(record_type, answer)
            };

            match data {
                Some(data) => Some(CanonicalRecord::new(domain, record_type, answer.ttl, data)),
                None => {
                    warn!(
                        "Dropping {} answer for {} with unexpected rdata: {}",
                        record_type, domain, answer.presentation
                    );
                    None
                }
            }
        })
        .collect()
}

fn typed_data(record_type: RecordType, answer: &RawAnswer) -> Option<RecordData> {
    match (record_type, &answer.data) {
        (
            RecordType::MX,
            AnswerData::Mx {
                preference,
                exchange,
            },
        ) => Some(RecordData::Mx {
            exchange: exchange.clone(),
            preference: *preference,
        }),
        (
            RecordType::SRV,
            AnswerData::Srv {
                priority,
                weight,
                port,
                target,
            },
        ) => Some(RecordData::Srv {
            priority: *priority,
            weight: *weight,
            port: *port,
            target: target.clone(),
        }),
        (
            RecordType::NAPTR,
            AnswerData::Naptr {
                order,
                preference,
                replacement,
            },
        ) => Some(RecordData::Naptr {
            order: *order,
            preference: *preference,
            replacement: replacement.clone(),
        }),
        (RecordType::MX | RecordType::SRV | RecordType::NAPTR, _) => None,
        (RecordType::TXT, _) => Some(RecordData::Txt {
            text: answer.presentation.trim_matches('"').to_string(),
        }),
        (_, _) => Some(RecordData::Generic {
            content: answer.presentation.clone(),
        }),
    }
}

/// Drop A and AAAA sets when the domain also has a CNAME set
///
/// A name with a CNAME cannot own other data; resolvers that follow the
/// chain report the target's addresses, which would be misattributed to the
/// queried name. Returns the number of records dropped.
pub fn apply_cname_policy(domain: &str, sets: &mut Vec<RecordSet>, keep_both: bool) -> usize {
    let has_cname = sets
        .iter()
        .any(|set| set.record_type == RecordType::CNAME && !set.records.is_empty());

    if !has_cname || keep_both {
        return 0;
    }

    let before: usize = sets.iter().map(|set| set.records.len()).sum();
    sets.retain(|set| !matches!(set.record_type, RecordType::A | RecordType::AAAA));
    let dropped = before - sets.iter().map(|set| set.records.len()).sum::<usize>();

    if dropped > 0 {
        debug!(
            "Dropped {} A/AAAA record(s) for {} because a CNAME exists",
            dropped, domain
        );
    }
    dropped
}

/// The zone the vendor keys its API by: the last two labels of `domain`
pub fn zone_apex(domain: &str) -> String {
    let domain = domain.trim_end_matches('.');
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() <= 2 {
        return domain.to_string();
    }
    labels[labels.len() - 2..].join(".")
}

/// Fully qualified owner name of an entry listed under `domain`
///
/// - absent, empty or `"@"`: the domain itself
/// - trailing dot, or already ending in the domain: absolute
/// - anything else: a label relative to the domain
pub fn owner_name(domain: &str, name: Option<&str>) -> String {
    let domain = domain.trim_end_matches('.');
    let name = match name.map(str::trim) {
        None | Some("") | Some("@") => return domain.to_string(),
        Some(name) => name,
    };

    if let Some(absolute) = name.strip_suffix('.') {
        return absolute.to_string();
    }

    let lower = name.to_ascii_lowercase();
    let domain_lower = domain.to_ascii_lowercase();
    if lower == domain_lower || lower.ends_with(&format!(".{}", domain_lower)) {
        name.to_string()
    } else {
        format!("{}.{}", name, domain)
    }
}

/// Owner name relative to `apex`: `"@"` for the apex itself
pub fn relative_name(owner: &str, apex: &str) -> Result<String> {
    let owner = owner.trim_end_matches('.');
    let owner_lower = owner.to_ascii_lowercase();
    let apex_lower = apex.trim_end_matches('.').to_ascii_lowercase();

    if owner_lower == apex_lower {
        return Ok("@".to_string());
    }

    match owner_lower.strip_suffix(&format!(".{}", apex_lower)) {
        Some(prefix) if !prefix.is_empty() => Ok(owner[..prefix.len()].to_string()),
        _ => Err(Error::invalid_input(format!(
            "Record name {} is outside zone {}",
            owner, apex
        ))),
    }
}

/// Encode an import entry as the vendor payload
///
/// The entry is parsed into its typed template first, so a malformed entry
/// fails here, before any provider call. `prio` is carried only for
/// priority-bearing types and is required for them (NAPTR included, whose
/// template has no `prio` of its own).
pub fn encode(domain: &str, record_type: RecordType, entry: &RecordEntry) -> Result<VendorRecord> {
    if record_type.is_priority_bearing() && entry.prio.is_none() {
        return Err(Error::missing_field(record_type, "prio"));
    }

    let owner = owner_name(domain, entry.name.as_deref());
    let record = CanonicalRecord::from_entry(&owner, record_type, entry)?;
    let name = relative_name(&record.name, &zone_apex(domain))?;

    let prio = match &record.data {
        RecordData::Mx { .. } | RecordData::Srv { .. } => record.prio().map(|p| p.to_string()),
        RecordData::Naptr { .. } => entry.prio.as_deref().map(|p| p.trim().to_string()),
        _ => None,
    };

    Ok(VendorRecord {
        record_type,
        content: record.content(),
        ttl: record.ttl.to_string(),
        name,
        prio,
    })
}

/// Convert a vendor record into its export form, returning `(name, entry)`
///
/// The name is `"@"` when it equals `domain`. MX content is flattened to
/// `"<prio> <target>"`.
pub fn decode_existing(domain: &str, record: &ExistingRecord) -> (String, ProviderEntry) {
    let name = if record.name.eq_ignore_ascii_case(domain.trim_end_matches('.')) {
        "@".to_string()
    } else {
        record.name.clone()
    };

    let content = match (record.record_type.eq_ignore_ascii_case("MX"), &record.prio) {
        (true, Some(prio)) => format!("{} {}", prio, record.content),
        _ => record.content.clone(),
    };

    (
        name,
        ProviderEntry {
            content,
            ttl: record.ttl.clone(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naptr(order: u16, preference: u16, replacement: &str, ttl: u32) -> RawAnswer {
        RawAnswer {
            ttl,
            presentation: format!("{} {} \"u\" \"E2U+sip\" \"\" {}", order, preference, replacement),
            data: AnswerData::Naptr {
                order,
                preference,
                replacement: replacement.to_string(),
            },
        }
    }

    fn existing(name: &str, record_type: &str, content: &str, prio: Option<&str>) -> ExistingRecord {
        ExistingRecord {
            id: "1".to_string(),
            name: name.to_string(),
            record_type: record_type.to_string(),
            content: content.to_string(),
            ttl: Some("600".to_string()),
            prio: prio.map(str::to_string),
            notes: None,
        }
    }

    #[test]
    fn test_decode_mx() {
        let records = decode(
            "example.com",
            RecordType::MX,
            &[RawAnswer::mx(10, "mail.example.com.", 3600)],
            false,
        );
        assert_eq!(records.len(), 1);
        let entry = records[0].to_entry();
        assert_eq!(entry.content, "mail.example.com.");
        assert_eq!(entry.prio.as_deref(), Some("10"));
        assert_eq!(entry.ttl, "3600");
    }

    #[test]
    fn test_decode_srv_content_layout() {
        let records = decode(
            "_sip._tcp.example.com",
            RecordType::SRV,
            &[RawAnswer::srv(10, 60, 5060, "sip.example.com.", 300)],
            false,
        );
        let entry = records[0].to_entry();
        assert_eq!(entry.content, "60 5060 sip.example.com.");
        assert_eq!(entry.prio.as_deref(), Some("10"));
    }

    #[test]
    fn test_decode_naptr_keeps_order_and_preference_apart() {
        let records = decode(
            "example.com",
            RecordType::NAPTR,
            &[naptr(100, 10, "_sip._udp.example.com.", 600)],
            false,
        );
        let entry = records[0].to_entry();
        assert_eq!(entry.content, "_sip._udp.example.com.");
        assert_eq!(entry.order.as_deref(), Some("100"));
        assert_eq!(entry.preference.as_deref(), Some("10"));
        assert_eq!(entry.prio, None);
    }

    #[test]
    fn test_decode_txt_strips_quotes() {
        let records = decode(
            "example.com",
            RecordType::TXT,
            &[RawAnswer::other("\"v=spf1 include:_spf.example.net -all\"", 300)],
            false,
        );
        assert_eq!(records[0].content(), "v=spf1 include:_spf.example.net -all");
    }

    #[test]
    fn test_decode_generic_unchanged() {
        let records = decode(
            "example.com",
            RecordType::AAAA,
            &[RawAnswer::other("2001:db8::1", 120)],
            false,
        );
        assert_eq!(
            records[0].data,
            RecordData::Generic {
                content: "2001:db8::1".to_string()
            }
        );
    }

    #[test]
    fn test_decode_raw_mode_is_verbatim() {
        let records = decode(
            "example.com",
            RecordType::MX,
            &[RawAnswer::mx(10, "mail.example.com.", 3600)],
            true,
        );
        let entry = records[0].to_entry();
        assert_eq!(entry.content, "10 mail.example.com.");
        assert_eq!(entry.ttl, "3600");
        assert_eq!(entry.prio, None);

        let records = decode(
            "example.com",
            RecordType::TXT,
            &[RawAnswer::other("\"hello\"", 60)],
            true,
        );
        assert_eq!(records[0].content(), "\"hello\"");
    }

    #[test]
    fn test_decode_drops_template_mismatch() {
        let records = decode(
            "example.com",
            RecordType::MX,
            &[RawAnswer::other("not an mx", 60)],
            false,
        );
        assert!(records.is_empty());
    }

    fn sets_with_cname() -> Vec<RecordSet> {
        let a = CanonicalRecord::new(
            "www.example.com",
            RecordType::A,
            300,
            RecordData::Generic {
                content: "192.0.2.1".to_string(),
            },
        );
        let cname = CanonicalRecord::new(
            "www.example.com",
            RecordType::CNAME,
            300,
            RecordData::Generic {
                content: "example.net.".to_string(),
            },
        );
        let txt = CanonicalRecord::new(
            "www.example.com",
            RecordType::TXT,
            300,
            RecordData::Txt {
                text: "hi".to_string(),
            },
        );
        vec![
            RecordSet::new(RecordType::A, vec![a.clone()]),
            RecordSet::new(RecordType::AAAA, vec![a]),
            RecordSet::new(RecordType::CNAME, vec![cname]),
            RecordSet::new(RecordType::TXT, vec![txt]),
        ]
    }

    #[test]
    fn test_cname_policy_drops_addresses() {
        let mut sets = sets_with_cname();
        let dropped = apply_cname_policy("www.example.com", &mut sets, false);
        assert_eq!(dropped, 2);
        let types: Vec<RecordType> = sets.iter().map(|s| s.record_type).collect();
        assert_eq!(types, vec![RecordType::CNAME, RecordType::TXT]);
    }

    #[test]
    fn test_cname_policy_keep_both() {
        let mut sets = sets_with_cname();
        assert_eq!(apply_cname_policy("www.example.com", &mut sets, true), 0);
        assert_eq!(sets.len(), 4);
    }

    #[test]
    fn test_cname_policy_without_cname() {
        let mut sets = sets_with_cname();
        sets.retain(|s| s.record_type != RecordType::CNAME);
        assert_eq!(apply_cname_policy("www.example.com", &mut sets, false), 0);
        assert_eq!(sets.len(), 3);
    }

    #[test]
    fn test_zone_apex() {
        assert_eq!(zone_apex("example.com"), "example.com");
        assert_eq!(zone_apex("www.example.com."), "example.com");
        assert_eq!(zone_apex("a.b.example.com"), "example.com");
        assert_eq!(zone_apex("localhost"), "localhost");
    }

    #[test]
    fn test_owner_name_forms() {
        assert_eq!(owner_name("example.com", None), "example.com");
        assert_eq!(owner_name("example.com", Some("@")), "example.com");
        assert_eq!(owner_name("example.com", Some("www")), "www.example.com");
        assert_eq!(owner_name("example.com", Some("www.example.com")), "www.example.com");
        assert_eq!(owner_name("example.com", Some("example.com.")), "example.com");
        assert_eq!(owner_name("example.com", Some("mail.example.org.")), "mail.example.org");
    }

    #[test]
    fn test_relative_name() {
        assert_eq!(relative_name("example.com", "example.com").unwrap(), "@");
        assert_eq!(relative_name("WWW.Example.com", "example.com").unwrap(), "WWW");
        assert_eq!(relative_name("a.b.example.com", "example.com").unwrap(), "a.b");
        assert!(relative_name("example.org", "example.com").is_err());
        assert!(relative_name("notexample.com", "example.com").is_err());
    }

    #[test]
    fn test_encode_apex_a_record() {
        let entry = RecordEntry::new("192.0.2.1", "300");
        let payload = encode("example.com", RecordType::A, &entry).unwrap();
        assert_eq!(
            payload,
            VendorRecord {
                record_type: RecordType::A,
                content: "192.0.2.1".to_string(),
                ttl: "300".to_string(),
                name: "@".to_string(),
                prio: None,
            }
        );
    }

    #[test]
    fn test_encode_subdomain_from_domain_key() {
        let entry = RecordEntry::new("192.0.2.7", "600");
        let payload = encode("shop.example.com", RecordType::A, &entry).unwrap();
        assert_eq!(payload.name, "shop");
    }

    #[test]
    fn test_encode_requires_prio_for_priority_types() {
        for record_type in [RecordType::MX, RecordType::SRV, RecordType::NAPTR] {
            let entry = RecordEntry::new("target.example.com", "300");
            let err = encode("example.com", record_type, &entry).unwrap_err();
            assert!(matches!(err, Error::MissingField { field: "prio", .. }));
        }
    }

    #[test]
    fn test_encode_prio_only_for_priority_types() {
        let entry = RecordEntry::new("192.0.2.1", "300").with_prio(5);
        let payload = encode("example.com", RecordType::A, &entry).unwrap();
        assert_eq!(payload.prio, None);

        let entry = RecordEntry::new("mail.example.com", "300").with_prio(5);
        let payload = encode("example.com", RecordType::MX, &entry).unwrap();
        assert_eq!(payload.prio.as_deref(), Some("5"));
    }

    #[test]
    fn test_encode_rejects_entries_that_do_not_fit_the_template() {
        let entry = RecordEntry::new("sip.example.com", "300").with_prio(10);
        let err = encode("example.com", RecordType::SRV, &entry).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let entry = RecordEntry::new("192.0.2.1", "five minutes");
        let err = encode("example.com", RecordType::A, &entry).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let mut entry = RecordEntry::new("_sip._udp.example.com.", "600").with_prio(10);
        entry.order = Some("100".to_string());
        let err = encode("example.com", RecordType::NAPTR, &entry).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "preference", .. }));
    }

    #[test]
    fn test_encode_normalizes_numbers() {
        let entry = RecordEntry::new("mail.example.com", " 300 ").with_prio(" 10");
        let payload = encode("example.com", RecordType::MX, &entry).unwrap();
        assert_eq!(payload.ttl, "300");
        assert_eq!(payload.prio.as_deref(), Some("10"));
    }

    #[test]
    fn test_decode_then_encode_preserves_fields() {
        let records = decode(
            "example.com",
            RecordType::MX,
            &[RawAnswer::mx(20, "mx2.example.com", 1800)],
            false,
        );
        let payload = encode("example.com", RecordType::MX, &records[0].to_entry()).unwrap();
        assert_eq!(payload.content, "mx2.example.com");
        assert_eq!(payload.ttl, "1800");
        assert_eq!(payload.prio.as_deref(), Some("20"));
    }

    #[test]
    fn test_decode_existing_apex_and_mx_flattening() {
        let (name, entry) = decode_existing(
            "example.com",
            &existing("example.com", "MX", "mail.example.com", Some("10")),
        );
        assert_eq!(name, "@");
        assert_eq!(entry.content, "10 mail.example.com");

        let (name, entry) = decode_existing(
            "example.com",
            &existing("www.example.com", "A", "192.0.2.1", Some("0")),
        );
        assert_eq!(name, "www.example.com");
        assert_eq!(entry.content, "192.0.2.1");
        assert_eq!(entry.ttl.as_deref(), Some("600"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_host() -> impl Strategy<Value = String> {
            "[a-z][a-z0-9-]{0,10}(\\.[a-z][a-z0-9-]{0,10}){0,2}\\.?"
        }

        prop_compose! {
            fn arb_mx()(
                preference in any::<u16>(),
                exchange in arb_host(),
                ttl in any::<u32>(),
            ) -> (RecordType, RawAnswer) {
                (RecordType::MX, RawAnswer::mx(preference, exchange, ttl))
            }
        }

        prop_compose! {
            fn arb_srv()(
                priority in any::<u16>(),
                weight in any::<u16>(),
                port in any::<u16>(),
                target in arb_host(),
                ttl in any::<u32>(),
            ) -> (RecordType, RawAnswer) {
                (RecordType::SRV, RawAnswer::srv(priority, weight, port, target, ttl))
            }
        }

        prop_compose! {
            fn arb_naptr()(
                order in any::<u16>(),
                preference in any::<u16>(),
                replacement in arb_host(),
                ttl in any::<u32>(),
            ) -> (RecordType, RawAnswer) {
                (RecordType::NAPTR, naptr(order, preference, &replacement, ttl))
            }
        }

        prop_compose! {
            fn arb_txt()(
                text in "[a-zA-Z0-9=:;._ -]{0,40}",
                ttl in any::<u32>(),
            ) -> (RecordType, RawAnswer) {
                (RecordType::TXT, RawAnswer::other(format!("\"{}\"", text), ttl))
            }
        }

        prop_compose! {
            fn arb_generic()(
                record_type in prop::sample::select(vec![
                    RecordType::A,
                    RecordType::AAAA,
                    RecordType::CNAME,
                    RecordType::NS,
                    RecordType::CAA,
                    RecordType::SPF,
                ]),
                content in "[a-z0-9.:]{1,30}",
                ttl in any::<u32>(),
            ) -> (RecordType, RawAnswer) {
                (record_type, RawAnswer::other(content, ttl))
            }
        }

        fn arb_answer() -> impl Strategy<Value = (RecordType, RawAnswer)> {
            prop_oneof![arb_mx(), arb_srv(), arb_naptr(), arb_txt(), arb_generic()]
        }

        proptest! {
            #[test]
            fn test_entry_form_round_trips(
                (record_type, answer) in arb_answer(),
            ) {
                let records = decode("example.com", record_type, &[answer], false);
                prop_assert_eq!(records.len(), 1);

                let record = &records[0];
                let entry = record.to_entry();
                let back = CanonicalRecord::from_entry(&record.name, record_type, &entry).unwrap();
                prop_assert_eq!(&back, record);
            }

            #[test]
            fn test_exported_entries_encode_to_the_same_fields(
                (record_type, answer) in arb_answer(),
                raw in any::<bool>(),
            ) {
                let ttl = answer.ttl.to_string();
                let records = decode("example.com", record_type, &[answer], raw);
                prop_assert_eq!(records.len(), 1);
                let entry = records[0].to_entry();

                match encode("example.com", record_type, &entry) {
                    Ok(payload) => {
                        prop_assert_eq!(payload.record_type, record_type);
                        prop_assert_eq!(&payload.content, &entry.content);
                        prop_assert_eq!(&payload.ttl, &ttl);
                        prop_assert_eq!(payload.name.as_str(), "@");
                        prop_assert_eq!(&payload.prio, &entry.prio);
                    }
                    // Raw entries and NAPTR carry no `prio`
                    Err(Error::MissingField { field, .. }) => {
                        prop_assert!(record_type.is_priority_bearing());
                        prop_assert!(raw || record_type == RecordType::NAPTR);
                        prop_assert_eq!(field, "prio");
                    }
                    Err(other) => prop_assert!(false, "unexpected error: {}", other),
                }
            }
        }
    }
}
