//! Read-only reporting over the lead store. Recomputed on every call.

use std::collections::BTreeMap;

use crate::error::DatabaseError;
use crate::leads::Lead;
use crate::leads::filter::distinct_locations;
use crate::store::LeadStore;

/// Funnel counts and industry breakdown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadStats {
    pub total: usize,
    pub sent: usize,
    pub opened: usize,
    pub responded: usize,
    /// Lead count per industry, sorted by industry name.
    pub by_industry: BTreeMap<String, usize>,
    /// Distinct locations, sorted.
    pub locations: Vec<String>,
}

impl LeadStats {
    pub fn from_leads(leads: &[Lead]) -> Self {
        let mut stats = LeadStats {
            total: leads.len(),
            ..Default::default()
        };
        for lead in leads {
            stats.sent += lead.email_sent as usize;
            stats.opened += lead.email_opened as usize;
            stats.responded += lead.response_received as usize;
            *stats.by_industry.entry(lead.industry.clone()).or_default() += 1;
        }
        stats.locations = distinct_locations(leads);
        stats
    }

    /// Share of all leads that were sent, in `[0, 1]`.
    pub fn send_rate(&self) -> f64 {
        ratio(self.sent, self.total)
    }

    /// Share of sent leads that responded, in `[0, 1]`.
    pub fn response_rate(&self) -> f64 {
        ratio(self.responded, self.sent)
    }

    /// Industries ordered by descending count, ties by name.
    pub fn top_industries(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<_> = self
            .by_industry
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Stats over every stored lead.
pub async fn collect(store: &dyn LeadStore) -> Result<LeadStats, DatabaseError> {
    let leads = store.list(None).await?;
    Ok(LeadStats::from_leads(&leads))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::store::LibSqlBackend;

    fn lead(email: &str, industry: &str, sent: bool) -> Lead {
        let mut l = Lead::new("Acme", email, industry, "Austin", Utc::now());
        l.email_sent = sent;
        l
    }

    #[test]
    fn empty_store_has_zero_rates() {
        let stats = LeadStats::from_leads(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.send_rate(), 0.0);
        assert_eq!(stats.response_rate(), 0.0);
        assert!(stats.by_industry.is_empty());
    }

    #[test]
    fn counts_and_histogram() {
        let leads = vec![
            lead("a@x.com", "Technology", true),
            lead("b@x.com", "Technology", false),
            lead("c@x.com", "Finance", true),
        ];
        let stats = LeadStats::from_leads(&leads);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.sent, 2);
        assert_eq!(stats.by_industry["Technology"], 2);
        assert_eq!(stats.by_industry["Finance"], 1);
        assert!((stats.send_rate() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.top_industries()[0], ("Technology", 2));
        assert_eq!(stats.locations, vec!["Austin"]);
    }

    #[tokio::test]
    async fn collect_reads_store() {
        let store = LibSqlBackend::new_memory().await.unwrap();
        store
            .upsert(&[lead("a@x.com", "Finance", false), lead("b@x.com", "Finance", false)])
            .await
            .unwrap();
        store.mark_sent("a@x.com").await.unwrap();
        store.mark_opened("a@x.com").await.unwrap();
        store.mark_responded("a@x.com").await.unwrap();

        let stats = collect(&store).await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.sent, 1);
        assert_eq!(stats.opened, 1);
        assert_eq!(stats.responded, 1);
        assert_eq!(stats.response_rate(), 1.0);
    }
}
