//! `LeadStore` trait: the single async interface for lead persistence.

use async_trait::async_trait;

use crate::error::DatabaseError;
use crate::leads::{Customer, Lead, StoredTemplate};

/// Backend-agnostic persistence for leads, customers and stored templates.
///
/// Writers are not coordinated here; the backend's own locking serializes
/// concurrent calls.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Run all pending schema migrations.
    async fn init_schema(&self) -> Result<(), DatabaseError>;

    // ── Leads ───────────────────────────────────────────────────────

    /// Insert or fully replace leads keyed by email.
    ///
    /// All-or-nothing: a rejected lead or a failed write leaves the store
    /// untouched. An empty slice is a no-op.
    async fn upsert(&self, leads: &[Lead]) -> Result<(), DatabaseError>;

    /// Leads newest-first by `generated_date`, up to `limit` when given.
    async fn list(&self, limit: Option<usize>) -> Result<Vec<Lead>, DatabaseError>;

    /// Look up one lead by email.
    async fn get(&self, email: &str) -> Result<Option<Lead>, DatabaseError>;

    /// Set `email_sent`. Returns `false` if no such lead exists.
    async fn mark_sent(&self, email: &str) -> Result<bool, DatabaseError>;

    /// Set `email_opened` on a lead that was already sent.
    /// Returns `false` when nothing changed.
    async fn mark_opened(&self, email: &str) -> Result<bool, DatabaseError>;

    /// Set `response_received` on a lead that was already opened.
    /// Returns `false` when nothing changed.
    async fn mark_responded(&self, email: &str) -> Result<bool, DatabaseError>;

    /// Delete every lead. Customers and templates are untouched.
    /// Returns the number of leads removed.
    async fn clear_all(&self) -> Result<usize, DatabaseError>;

    // ── Customers ───────────────────────────────────────────────────

    async fn record_customer(&self, customer: &Customer) -> Result<(), DatabaseError>;

    async fn list_customers(&self) -> Result<Vec<Customer>, DatabaseError>;

    // ── Templates ───────────────────────────────────────────────────

    /// Insert or replace a named template.
    async fn save_template(&self, template: &StoredTemplate) -> Result<(), DatabaseError>;

    async fn get_template(&self, name: &str) -> Result<Option<StoredTemplate>, DatabaseError>;
}
