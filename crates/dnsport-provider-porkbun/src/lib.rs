// # Porkbun DNS Provider
//
// This crate provides the Porkbun implementation of `DnsProvider` for
// dnsport, over the Porkbun JSON API v3.
//
// ## Behavior
//
// - One HTTP request per trait call
// - Errors are propagated, never retried (the caller decides what to do)
// - HTTP timeout configured (30 seconds)
// - Dry-run mode: lookups are real, writes are logged instead of sent
// - No caching, no background tasks
//
// ## Security Requirements
//
// - API keys NEVER appear in logs or Debug output
// - Keys are read once into `Credentials` and passed by reference
// - Construction fails fast on empty keys
//
// ## API Reference
//
// Every endpoint is a POST with a JSON body carrying `apikey` and
// `secretapikey`. Responses carry `status` (`SUCCESS` or `ERROR`) and an
// optional `message`.
//
// - Retrieve all records: `/dns/retrieve/{zone}`
// - Retrieve by name and type: `/dns/retrieveByNameType/{zone}/{type}/{subdomain}`
// - Create record: `/dns/create/{zone}`
// - Edit record: `/dns/edit/{zone}/{id}`

use async_trait::async_trait;
use dnsport_core::config::{Credentials, PorkbunConfig};
use dnsport_core::record::flex;
use dnsport_core::traits::{DnsProvider, ExistingRecord};
use dnsport_core::{Error, RecordType, Result, VendorRecord};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Placeholder written in place of credentials in debug logs
const REDACTED: &str = "<REDACTED>";

/// Ways a single API call can fail
#[derive(Debug, thiserror::Error)]
enum ApiFailure {
    #[error("HTTP request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("Porkbun rejected the request")]
    Rejected { message: Option<String> },
}

impl From<ApiFailure> for Error {
    fn from(failure: ApiFailure) -> Self {
        match failure {
            ApiFailure::Rejected { message } => Error::vendor_rejection(message),
            other => Error::http(other.to_string()),
        }
    }
}

/// Response envelope shared by every endpoint
#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    records: Vec<ExistingRecord>,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    #[serde(default, deserialize_with = "flex::opt_string_or_number")]
    id: Option<String>,
}

/// Porkbun DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all retrieve requests
/// - Log the intended create/edit payload
/// - **NOT** actually modify DNS records
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API keys.
pub struct PorkbunProvider {
    /// API keys
    /// ⚠️ NEVER log these values
    credentials: Credentials,

    /// API base URL, no trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform lookups but skip writes
    dry_run: bool,
}

// Custom Debug implementation that hides the API keys
impl std::fmt::Debug for PorkbunProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PorkbunProvider")
            .field("credentials", &REDACTED)
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl PorkbunProvider {
    /// Create a new Porkbun provider
    ///
    /// Fails with [`Error::Config`] when the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: &PorkbunConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        if config.dry_run {
            tracing::warn!("Porkbun provider running in DRY-RUN mode - no changes will be made");
        }

        Ok(Self {
            credentials: config.credentials.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            dry_run: config.dry_run,
        })
    }

    /// Whether writes are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Request body: `extra` fields plus the credentials
    fn body(&self, extra: Map<String, Value>) -> Value {
        let mut body = extra;
        body.insert(
            "apikey".to_string(),
            Value::String(self.credentials.api_key.clone()),
        );
        body.insert(
            "secretapikey".to_string(),
            Value::String(self.credentials.secret_api_key.clone()),
        );
        Value::Object(body)
    }

    /// `text` with any credential replaced, safe to log
    fn scrub(&self, text: &str) -> String {
        [&self.credentials.api_key, &self.credentials.secret_api_key]
            .into_iter()
            .filter(|key| !key.is_empty())
            .fold(text.to_string(), |text, key| text.replace(key.as_str(), REDACTED))
    }

    /// POST to `endpoint`, check the envelope and decode the payload as `T`
    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        extra: Map<String, Value>,
    ) -> std::result::Result<T, ApiFailure> {
        tracing::debug!(
            "POST {} {}",
            endpoint,
            serde_json::Value::Object(redacted(extra.clone()))
        );

        let response = self
            .client
            .post(self.url(endpoint))
            .json(&self.body(extra))
            .send()
            .await
            .map_err(|source| ApiFailure::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| ApiFailure::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        tracing::debug!(
            "Response from {}: HTTP {} {}",
            endpoint,
            status,
            self.scrub(&text)
        );

        // Porkbun reports rejections as an ERROR envelope, often with a 4xx
        // status; prefer the envelope when there is one.
        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) if status.is_success() => {
                return Err(ApiFailure::Decode {
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                return Err(ApiFailure::Status {
                    endpoint: endpoint.to_string(),
                    status,
                    body: text,
                });
            }
        };

        let envelope: Envelope =
            serde_json::from_value(value.clone()).map_err(|e| ApiFailure::Decode {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        if !envelope.status.eq_ignore_ascii_case("SUCCESS") {
            return Err(ApiFailure::Rejected {
                message: envelope.message,
            });
        }
        if !status.is_success() {
            return Err(ApiFailure::Status {
                endpoint: endpoint.to_string(),
                status,
                body: text,
            });
        }

        serde_json::from_value(value).map_err(|e| ApiFailure::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Payload fields for a create or edit call
fn record_fields(record: &VendorRecord) -> Result<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields),
        other => Err(Error::invalid_input(format!(
            "Record payload is not an object: {}",
            other
        ))),
    }
}

/// Copy of `fields` safe to log
fn redacted(mut fields: Map<String, Value>) -> Map<String, Value> {
    for key in ["apikey", "secretapikey"] {
        if fields.contains_key(key) {
            fields.insert(key.to_string(), Value::String(REDACTED.to_string()));
        }
    }
    fields
}

#[async_trait]
impl DnsProvider for PorkbunProvider {
    async fn retrieve(&self, domain: &str) -> Result<Vec<ExistingRecord>> {
        let endpoint = format!("/dns/retrieve/{}", domain);
        let response: RecordsResponse = self.post(&endpoint, Map::new()).await?;
        tracing::debug!("Retrieved {} record(s) for {}", response.records.len(), domain);
        Ok(response.records)
    }

    async fn retrieve_by_name_type(
        &self,
        domain: &str,
        record_type: RecordType,
        subdomain: &str,
    ) -> Result<Vec<ExistingRecord>> {
        let endpoint = if subdomain.is_empty() {
            format!("/dns/retrieveByNameType/{}/{}", domain, record_type)
        } else {
            format!(
                "/dns/retrieveByNameType/{}/{}/{}",
                domain, record_type, subdomain
            )
        };
        let response: RecordsResponse = self.post(&endpoint, Map::new()).await?;
        Ok(response.records)
    }

    async fn create(&self, domain: &str, record: &VendorRecord) -> Result<Option<String>> {
        let endpoint = format!("/dns/create/{}", domain);
        let fields = record_fields(record)?;

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST request to {} with payload: {}",
                endpoint,
                serde_json::Value::Object(fields)
            );
            return Ok(None);
        }

        let response: CreateResponse = self.post(&endpoint, fields).await?;
        Ok(response.id)
    }

    async fn edit(&self, domain: &str, record_id: &str, record: &VendorRecord) -> Result<()> {
        let endpoint = format!("/dns/edit/{}/{}", domain, record_id);
        let fields = record_fields(record)?;

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST request to {} with payload: {}",
                endpoint,
                serde_json::Value::Object(fields)
            );
            return Ok(());
        }

        let _: Envelope = self.post(&endpoint, fields).await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "porkbun"
    }
}
