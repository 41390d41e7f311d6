//! Lead source adapter: external enrichment first, synthetic fallback after.

pub mod hunter;
pub mod synthetic;

pub use hunter::{EnrichedContact, EnrichmentProvider, HunterClient};

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::SourceError;
use crate::leads::Lead;

/// Outcome of one generation request.
#[derive(Debug, Default)]
pub struct Generation {
    /// External leads first, synthetic leads after; never longer than requested.
    pub leads: Vec<Lead>,
    pub external: usize,
    pub synthetic: usize,
    /// Why the external contribution was empty, if it failed.
    pub degraded: Option<SourceError>,
}

/// Produces candidate leads for an (industry, location, count) request.
#[derive(Clone, Default)]
pub struct LeadSource {
    provider: Option<Arc<dyn EnrichmentProvider>>,
}

impl LeadSource {
    pub fn new(provider: Option<Arc<dyn EnrichmentProvider>>) -> Self {
        Self { provider }
    }

    /// Synthetic generation only (no enrichment key configured).
    pub fn synthetic_only() -> Self {
        Self { provider: None }
    }

    /// Generate up to `count` leads.
    pub async fn generate(&self, industry: &str, location: &str, count: usize) -> Vec<Lead> {
        self.generate_detailed(industry, location, count, Utc::now())
            .await
            .leads
    }

    /// Generate up to `count` leads stamped with `now`, reporting where they came from.
    ///
    /// Enrichment failures never escape: they are logged, kept in
    /// [`Generation::degraded`], and the synthetic roster fills the gap.
    pub async fn generate_detailed(
        &self,
        industry: &str,
        location: &str,
        count: usize,
        now: DateTime<Utc>,
    ) -> Generation {
        if count == 0 {
            return Generation::default();
        }

        let mut taken = HashSet::new();
        let mut leads = Vec::with_capacity(count);
        let mut degraded = None;

        if let Some(provider) = &self.provider {
            let domain = industry_domain(industry);
            match provider.lookup(&domain).await {
                Ok(contacts) => {
                    for contact in contacts {
                        if leads.len() >= count {
                            break;
                        }
                        if let Some(lead) =
                            contact_to_lead(contact, &domain, industry, location, now)
                        {
                            if taken.insert(lead.email.clone()) {
                                leads.push(lead);
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        industry,
                        error = %e,
                        "Enrichment unavailable, using synthetic leads"
                    );
                    degraded = Some(e);
                }
            }
        }

        let external = leads.len();
        if external < count {
            leads.extend(synthetic::synthesize(
                industry,
                location,
                count - external,
                now,
                &mut taken,
            ));
        }
        leads.truncate(count);
        let synthetic = leads.len() - external;

        tracing::info!(
            industry,
            location,
            requested = count,
            external,
            synthetic,
            "Leads generated"
        );

        Generation {
            leads,
            external,
            synthetic,
            degraded,
        }
    }
}

/// Industry name used as a domain-search proxy, e.g. `Real Estate` → `realestate.com`.
pub fn industry_domain(industry: &str) -> String {
    let slug: String = industry
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    format!("{slug}.com")
}

/// Map a provider record into a lead. Records without an email are dropped.
fn contact_to_lead(
    contact: EnrichedContact,
    domain: &str,
    industry: &str,
    location: &str,
    now: DateTime<Utc>,
) -> Option<Lead> {
    let email = contact.email.as_deref().map(str::trim).unwrap_or("");
    if email.is_empty() {
        return None;
    }
    Some(
        Lead::new(
            contact.organization.clone().unwrap_or_default(),
            email,
            industry,
            location,
            now,
        )
        .with_contact(contact.full_name())
        .with_website(format!("https://{domain}")),
    )
}
