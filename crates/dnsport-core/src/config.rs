//! Configuration types for dnsport
//!
//! All configuration is explicit: objects are built once at process start,
//! validated, and then passed by reference to whatever needs them. Nothing
//! here reads global state after construction.

use crate::record::RecordType;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// Environment variable holding the Porkbun API key
pub const ENV_API_KEY: &str = "PORKBUN_API_KEY";

/// Environment variable holding the Porkbun secret API key
pub const ENV_SECRET_KEY: &str = "PORKBUN_SECRET_KEY";

/// Environment variable overriding the Porkbun API base URL
pub const ENV_API_BASE: &str = "PORKBUN_API_BASE";

/// Default Porkbun JSON API base URL
pub const DEFAULT_API_BASE: &str = "https://api.porkbun.com/api/json/v3";

/// Vendor API credentials
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose either key.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Public API key
    /// ⚠️ NEVER log this value
    pub api_key: String,

    /// Secret API key
    /// ⚠️ NEVER log this value
    pub secret_api_key: String,
}

// Custom Debug implementation that hides both keys
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<REDACTED>")
            .field("secret_api_key", &"<REDACTED>")
            .finish()
    }
}

impl Credentials {
    /// Create credentials from explicit values
    pub fn new(api_key: impl Into<String>, secret_api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_api_key: secret_api_key.into(),
        }
    }

    /// Load credentials from `PORKBUN_API_KEY` / `PORKBUN_SECRET_KEY`
    pub fn from_env() -> Result<Self, crate::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load credentials through an arbitrary variable lookup
    ///
    /// `from_env` delegates here; tests pass a closure over a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, crate::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY).unwrap_or_default();
        let secret_api_key = lookup(ENV_SECRET_KEY).unwrap_or_default();

        let credentials = Self::new(api_key, secret_api_key);
        credentials.validate()?;
        Ok(credentials)
    }

    /// Validate that both keys are present
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_key.trim().is_empty() || self.secret_api_key.trim().is_empty() {
            return Err(crate::Error::config(format!(
                "Porkbun API credentials not found. Please set {} and {} environment variables.",
                ENV_API_KEY, ENV_SECRET_KEY
            )));
        }
        Ok(())
    }
}

/// Porkbun provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PorkbunConfig {
    /// API credentials
    pub credentials: Credentials,

    /// API base URL (no trailing slash)
    #[serde(default = "default_api_base")]
    pub base_url: String,

    /// Dry-run mode: perform lookups but skip create/edit calls
    #[serde(default)]
    pub dry_run: bool,
}

impl PorkbunConfig {
    /// Create a new configuration against the default API endpoint
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: default_api_base(),
            dry_run: false,
        }
    }

    /// Load credentials and optional base URL override from the environment
    pub fn from_env() -> Result<Self, crate::Error> {
        let mut config = Self::new(Credentials::from_env()?);
        if let Ok(base) = std::env::var(ENV_API_BASE)
            && !base.trim().is_empty()
        {
            config.base_url = base;
        }
        config.validate()?;
        Ok(config)
    }

    /// Set the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.credentials.validate()?;

        if self.base_url.is_empty() {
            return Err(crate::Error::config("Porkbun API base URL cannot be empty"));
        }
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "Porkbun API base URL must use HTTP or HTTPS scheme. Got: {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

/// Export (resolver side) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Record types to query, in output order
    pub record_types: Vec<RecordType>,

    /// Emit verbatim presentation strings instead of type-specific fields
    #[serde(default)]
    pub raw: bool,

    /// Keep A/AAAA records for a domain that also has a CNAME
    #[serde(default)]
    pub keep_both: bool,

    /// Nameservers to query
    #[serde(default = "default_nameservers")]
    pub nameservers: Vec<IpAddr>,
}

impl ExportConfig {
    /// Create a configuration for the common or full type catalog, minus exclusions
    pub fn new(all_types: bool, exclude: &[RecordType]) -> Self {
        let catalog: &[RecordType] = if all_types {
            RecordType::ALL
        } else {
            RecordType::COMMON
        };

        Self {
            record_types: catalog
                .iter()
                .filter(|t| !exclude.contains(t))
                .copied()
                .collect(),
            raw: false,
            keep_both: false,
            nameservers: default_nameservers(),
        }
    }

    /// Enable or disable raw output
    pub fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Enable or disable keeping A/AAAA next to CNAME
    pub fn with_keep_both(mut self, keep_both: bool) -> Self {
        self.keep_both = keep_both;
        self
    }

    /// Replace the nameserver list
    pub fn with_nameservers(mut self, nameservers: Vec<IpAddr>) -> Self {
        if !nameservers.is_empty() {
            self.nameservers = nameservers;
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.record_types.is_empty() {
            return Err(crate::Error::config(
                "No record types left to query after exclusions",
            ));
        }
        if self.nameservers.is_empty() {
            return Err(crate::Error::config("At least one nameserver is required"));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::new(false, &[])
    }
}

fn default_nameservers() -> Vec<IpAddr> {
    vec![
        IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
        IpAddr::V4(Ipv4Addr::new(8, 8, 4, 4)),
    ]
}

/// Import (reconciliation) configuration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Update matching records instead of skipping them
    #[serde(default)]
    pub force: bool,
}

impl ImportConfig {
    /// Create a new import configuration
    pub fn new(force: bool) -> Self {
        Self { force }
    }
}
