//! Configuration types, built from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default enrichment endpoint root.
pub const DEFAULT_HUNTER_BASE_URL: &str = "https://api.hunter.io";

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// External enrichment; `None` when no API key is configured.
    pub enrichment: Option<EnrichmentConfig>,
    /// SMTP relay; `None` means dry-run sending.
    pub smtp: Option<SmtpConfig>,
    pub campaign: CampaignConfig,
}

/// Enrichment provider settings.
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub timeout: Duration,
}

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub from_address: String,
}

/// Campaign pacing and batch sizing.
#[derive(Debug, Clone)]
pub struct CampaignConfig {
    /// Minimum delay between successive sends.
    pub send_interval: Duration,
    /// How many of the newest leads a campaign looks at.
    pub window: usize,
    /// Maximum unsent leads contacted per campaign.
    pub batch_size: usize,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            send_interval: Duration::from_secs(1),
            window: 50,
            batch_size: 10,
        }
    }
}

impl AppConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("LEADGEN_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/leads.db"));

        let enrichment = match lookup("HUNTER_API_KEY").filter(|k| !k.trim().is_empty()) {
            Some(key) => Some(EnrichmentConfig {
                api_key: SecretString::from(key),
                base_url: lookup("HUNTER_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_HUNTER_BASE_URL.to_string()),
                timeout: Duration::from_secs(parse_or(&lookup, "HUNTER_TIMEOUT_SECS", 10u64)?),
            }),
            None => None,
        };

        let smtp = match lookup("SMTP_HOST").filter(|h| !h.trim().is_empty()) {
            Some(host) => {
                let username = lookup("SMTP_USERNAME").unwrap_or_default();
                Some(SmtpConfig {
                    host,
                    port: parse_or(&lookup, "SMTP_PORT", 587u16)?,
                    password: SecretString::from(lookup("SMTP_PASSWORD").unwrap_or_default()),
                    from_address: lookup("SMTP_FROM").unwrap_or_else(|| username.clone()),
                    username,
                })
            }
            None => None,
        };

        let defaults = CampaignConfig::default();
        let campaign = CampaignConfig {
            send_interval: Duration::from_millis(parse_or(
                &lookup,
                "LEADGEN_SEND_INTERVAL_MS",
                defaults.send_interval.as_millis() as u64,
            )?),
            window: parse_or(&lookup, "LEADGEN_CAMPAIGN_WINDOW", defaults.window)?,
            batch_size: parse_or(&lookup, "LEADGEN_CAMPAIGN_BATCH", defaults.batch_size)?,
        };

        Ok(Self {
            db_path,
            enrichment,
            smtp,
            campaign,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
        None => Ok(default),
    }
}
