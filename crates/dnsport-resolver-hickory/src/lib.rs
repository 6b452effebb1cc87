// # Hickory Record Resolver
//
// Provides the `RecordResolver` implementation for dnsport on top of
// `hickory-resolver`.
//
// ## Behavior
//
// - Queries the configured nameservers (default 8.8.8.8 and 8.8.4.4) over UDP
// - Names are queried as absolute (trailing dot), so no search domains apply
// - One lookup per call, no caching across calls
// - Only answers of the queried type are returned; CNAME records from a
//   followed chain are dropped
//
// ## Error Mapping
//
// | hickory                               | dnsport            |
// |---------------------------------------|--------------------|
// | `NoRecordsFound`, rcode NXDOMAIN      | `Error::NxDomain`  |
// | `NoRecordsFound`, any other rcode     | `Error::NoAnswer`  |
// | anything else (timeout, I/O, proto)   | `Error::Resolver`  |

use async_trait::async_trait;
use dnsport_core::traits::{AnswerData, RawAnswer, RecordResolver};
use dnsport_core::{Error, ExportConfig, RecordType, Result};
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::{RData, RecordType as HickoryRecordType};
use std::net::SocketAddr;

/// Standard DNS port
const DNS_PORT: u16 = 53;

/// Resolver over a fixed set of upstream nameservers
pub struct HickoryResolver {
    resolver: TokioAsyncResolver,
}

impl std::fmt::Debug for HickoryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HickoryResolver").finish_non_exhaustive()
    }
}

impl HickoryResolver {
    /// Create a resolver for the nameservers in `config`
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: &ExportConfig) -> Result<Self> {
        if config.nameservers.is_empty() {
            return Err(Error::config("At least one nameserver is required"));
        }

        let mut resolver_config = ResolverConfig::new();
        for ip in &config.nameservers {
            resolver_config.add_name_server(NameServerConfig::new(
                SocketAddr::new(*ip, DNS_PORT),
                Protocol::Udp,
            ));
        }

        tracing::debug!("Using nameservers: {:?}", config.nameservers);
        Ok(Self {
            resolver: TokioAsyncResolver::tokio(resolver_config, ResolverOpts::default()),
        })
    }
}

#[async_trait]
impl RecordResolver for HickoryResolver {
    async fn resolve(&self, domain: &str, record_type: RecordType) -> Result<Vec<RawAnswer>> {
        let fqdn = format!("{}.", domain.trim_end_matches('.'));
        let wanted = HickoryRecordType::from(record_type.code());

        let lookup = self
            .resolver
            .lookup(fqdn.as_str(), wanted)
            .await
            .map_err(|e| map_error(domain, record_type, &e))?;

        let answers: Vec<RawAnswer> = lookup
            .records()
            .iter()
            .filter(|record| record.record_type() == wanted)
            .filter_map(|record| record.data().map(|rdata| to_answer(rdata, record.ttl())))
            .collect();

        if answers.is_empty() {
            return Err(Error::no_answer(domain, record_type));
        }
        Ok(answers)
    }
}

/// Map a hickory error onto the dnsport taxonomy
fn map_error(domain: &str, record_type: RecordType, err: &ResolveError) -> Error {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            not_found(domain, record_type, *response_code)
        }
        _ => Error::resolver(format!(
            "{} lookup for {} failed: {}",
            record_type, domain, err
        )),
    }
}

fn not_found(domain: &str, record_type: RecordType, response_code: ResponseCode) -> Error {
    if response_code == ResponseCode::NXDomain {
        Error::nx_domain(domain)
    } else {
        Error::no_answer(domain, record_type)
    }
}

/// Convert one rdata into the resolver-neutral answer
fn to_answer(rdata: &RData, ttl: u32) -> RawAnswer {
    match rdata {
        RData::MX(mx) => RawAnswer {
            ttl,
            presentation: rdata.to_string(),
            data: AnswerData::Mx {
                preference: mx.preference(),
                exchange: mx.exchange().to_string(),
            },
        },
        RData::SRV(srv) => RawAnswer {
            ttl,
            presentation: rdata.to_string(),
            data: AnswerData::Srv {
                priority: srv.priority(),
                weight: srv.weight(),
                port: srv.port(),
                target: srv.target().to_string(),
            },
        },
        RData::NAPTR(naptr) => RawAnswer {
            ttl,
            presentation: rdata.to_string(),
            data: AnswerData::Naptr {
                order: naptr.order(),
                preference: naptr.preference(),
                replacement: naptr.replacement().to_string(),
            },
        },
        // Zone-file form: each character-string quoted, space separated
        RData::TXT(txt) => {
            let presentation = txt
                .txt_data()
                .iter()
                .map(|s| format!("\"{}\"", String::from_utf8_lossy(s)))
                .collect::<Vec<_>>()
                .join(" ");
            RawAnswer::other(presentation, ttl)
        }
        other => RawAnswer::other(other.to_string(), ttl),
    }
}
