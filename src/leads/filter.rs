//! Post-filter projection over stored leads.

use std::collections::BTreeSet;

use super::model::Lead;

/// Industry / location multiselect. An empty selection matches everything.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub industries: Vec<String>,
    pub locations: Vec<String>,
}

impl LeadFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn industry(mut self, industry: impl Into<String>) -> Self {
        self.industries.push(industry.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.locations.push(location.into());
        self
    }

    pub fn matches(&self, lead: &Lead) -> bool {
        (self.industries.is_empty() || self.industries.iter().any(|i| *i == lead.industry))
            && (self.locations.is_empty() || self.locations.iter().any(|l| *l == lead.location))
    }

    /// Keep matching leads, preserving input order.
    pub fn apply(&self, leads: &[Lead]) -> Vec<Lead> {
        leads.iter().filter(|l| self.matches(l)).cloned().collect()
    }
}

/// Distinct industries present, sorted.
pub fn distinct_industries(leads: &[Lead]) -> Vec<String> {
    leads
        .iter()
        .map(|l| l.industry.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct locations present, sorted.
pub fn distinct_locations(leads: &[Lead]) -> Vec<String> {
    leads
        .iter()
        .map(|l| l.location.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
