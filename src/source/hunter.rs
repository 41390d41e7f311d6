//! External enrichment: domain search against a Hunter-style API.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::EnrichmentConfig;
use crate::error::SourceError;

/// One contact returned by an enrichment provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EnrichedContact {
    #[serde(default)]
    pub organization: Option<String>,
    /// The contact's email address.
    #[serde(default, rename = "value")]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl EnrichedContact {
    /// "First Last", trimmed; empty when both are missing.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }
}

/// Provider of externally sourced contacts for an industry.
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Contacts for the industry's proxy domain.
    async fn lookup(&self, domain: &str) -> Result<Vec<EnrichedContact>, SourceError>;
}

#[derive(Debug, Deserialize)]
struct DomainSearchResponse {
    #[serde(default)]
    data: DomainSearchData,
}

#[derive(Debug, Default, Deserialize)]
struct DomainSearchData {
    #[serde(default)]
    emails: Vec<EnrichedContact>,
}

/// Client for the `/v2/domain-search` endpoint.
#[derive(Clone)]
pub struct HunterClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl HunterClient {
    pub fn new(config: &EnrichmentConfig) -> Result<Self, SourceError> {
        Self::with_parts(
            config.base_url.clone(),
            config.api_key.clone(),
            config.timeout,
        )
    }

    pub fn with_parts(
        base_url: impl Into<String>,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Request {
                provider: "hunter".into(),
                reason: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl EnrichmentProvider for HunterClient {
    fn name(&self) -> &str {
        "hunter"
    }

    async fn lookup(&self, domain: &str) -> Result<Vec<EnrichedContact>, SourceError> {
        let url = format!("{}/v2/domain-search", self.base_url);
        tracing::debug!(domain, "Querying enrichment provider");

        let response = self
            .client
            .get(&url)
            .query(&[("domain", domain), ("api_key", self.api_key.expose_secret())])
            .send()
            .await
            .map_err(|e| SourceError::Request {
                provider: self.name().into(),
                reason: e.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                provider: self.name().into(),
                status: status.as_u16(),
            });
        }

        let body: DomainSearchResponse =
            response.json().await.map_err(|e| SourceError::Parse {
                provider: self.name().into(),
                reason: e.to_string(),
            })?;

        Ok(body.data.emails)
    }
}
