//! libSQL backend: async `LeadStore` trait implementation.
//!
//! Supports local file and in-memory databases. One connection is opened
//! per backend instance and dropped with it.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::leads::{Customer, Lead, StoredTemplate};
use crate::store::migrations;
use crate::store::traits::LeadStore;

/// libSQL database backend.
///
/// `libsql::Connection` is `Send + Sync`; SQLite's own locking serializes
/// writers that share the file.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::Pool(format!("Failed to create database directory: {e}"))
                })?;
            }
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        info!(path = %path.display(), "Lead store opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        Ok(backend)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Canonical write format. Fixed precision keeps text ordering chronological.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339, ISO 8601 (naive) or SQLite datetime string.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    // Naive ISO 8601, as written by the earlier tool
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return ndt.and_utc();
        }
    }
    tracing::warn!(raw = s, "Unparseable timestamp, using minimum date");
    DateTime::<Utc>::MIN_UTC
}

/// Map a libsql Row to a Lead. Column order matches `LEAD_COLUMNS`.
fn row_to_lead(row: &libsql::Row) -> Result<Lead, libsql::Error> {
    let generated: String = row.get(7)?;
    Ok(Lead {
        company_name: row.get(0)?,
        email: row.get(1)?,
        phone: row.get(2)?,
        website: row.get(3)?,
        industry: row.get(4)?,
        location: row.get(5)?,
        contact_person: row.get(6)?,
        generated_date: parse_datetime(&generated),
        email_sent: row.get::<i64>(8)? != 0,
        email_opened: row.get::<i64>(9)? != 0,
        response_received: row.get::<i64>(10)? != 0,
    })
}

fn row_to_customer(row: &libsql::Row) -> Result<Customer, libsql::Error> {
    let purchased: String = row.get(3)?;
    Ok(Customer {
        email: row.get(0)?,
        service_purchased: row.get(1)?,
        amount_paid: row.get(2)?,
        purchase_date: parse_datetime(&purchased),
        subscription_status: row.get(4)?,
    })
}

fn row_to_template(row: &libsql::Row) -> Result<StoredTemplate, libsql::Error> {
    Ok(StoredTemplate {
        template_name: row.get(0)?,
        subject: row.get(1)?,
        body: row.get(2)?,
        industry: row.get(3)?,
    })
}

fn flag(value: bool) -> i64 {
    value as i64
}

/// Reject leads that would violate store invariants, before any write.
fn validate(leads: &[Lead]) -> Result<(), DatabaseError> {
    for lead in leads {
        if lead.email.trim().is_empty() {
            return Err(DatabaseError::Constraint(format!(
                "lead {:?} has no email",
                lead.company_name
            )));
        }
        if !lead.funnel_is_ordered() {
            return Err(DatabaseError::Constraint(format!(
                "lead {} has out-of-order funnel flags (stage {})",
                lead.email,
                lead.stage()
            )));
        }
    }
    Ok(())
}

// ── Trait implementation ────────────────────────────────────────────

// Legacy rows may carry NULLs, so every column is coalesced.
const LEAD_COLUMNS: &str = "COALESCE(company_name, ''), COALESCE(email, ''), \
    COALESCE(phone, ''), COALESCE(website, ''), COALESCE(industry, ''), \
    COALESCE(location, ''), COALESCE(contact_person, ''), COALESCE(generated_date, ''), \
    COALESCE(email_sent, 0), COALESCE(email_opened, 0), COALESCE(response_received, 0)";

const CUSTOMER_COLUMNS: &str = "COALESCE(email, ''), COALESCE(service_purchased, ''), \
    COALESCE(amount_paid, 0.0), COALESCE(purchase_date, ''), COALESCE(subscription_status, '')";

const TEMPLATE_COLUMNS: &str = "COALESCE(template_name, ''), COALESCE(subject, ''), \
    COALESCE(body, ''), COALESCE(industry, '')";

const UPSERT_LEAD: &str = "INSERT INTO leads (company_name, email, phone, website, industry, \
    location, contact_person, generated_date, email_sent, email_opened, response_received) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) \
    ON CONFLICT(email) DO UPDATE SET \
        company_name = excluded.company_name, \
        phone = excluded.phone, \
        website = excluded.website, \
        industry = excluded.industry, \
        location = excluded.location, \
        contact_person = excluded.contact_person, \
        generated_date = excluded.generated_date, \
        email_sent = excluded.email_sent, \
        email_opened = excluded.email_opened, \
        response_received = excluded.response_received";

#[async_trait]
impl LeadStore for LibSqlBackend {
    async fn init_schema(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    // ── Leads ───────────────────────────────────────────────────────

    async fn upsert(&self, leads: &[Lead]) -> Result<(), DatabaseError> {
        if leads.is_empty() {
            return Ok(());
        }
        validate(leads)?;

        let tx = self
            .conn()
            .transaction()
            .await
            .map_err(|e| DatabaseError::Query(format!("upsert begin: {e}")))?;

        for lead in leads {
            let result = tx
                .execute(
                    UPSERT_LEAD,
                    params![
                        lead.company_name.as_str(),
                        lead.email.as_str(),
                        lead.phone.as_str(),
                        lead.website.as_str(),
                        lead.industry.as_str(),
                        lead.location.as_str(),
                        lead.contact_person.as_str(),
                        format_datetime(&lead.generated_date),
                        flag(lead.email_sent),
                        flag(lead.email_opened),
                        flag(lead.response_received),
                    ],
                )
                .await;

            if let Err(e) = result {
                let _ = tx.rollback().await;
                return Err(DatabaseError::Query(format!("upsert {}: {e}", lead.email)));
            }
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::Query(format!("upsert commit: {e}")))?;

        debug!(count = leads.len(), "Leads upserted");
        Ok(())
    }

    async fn list(&self, limit: Option<usize>) -> Result<Vec<Lead>, DatabaseError> {
        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {LEAD_COLUMNS} FROM leads ORDER BY generated_date DESC, id ASC LIMIT ?1"
                ),
                params![limit],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list: {e}")))?;

        let mut leads = Vec::new();
        loop {
            match rows.next().await {
                Ok(Some(row)) => {
                    let lead = row_to_lead(&row)
                        .map_err(|e| DatabaseError::Serialization(format!("lead row: {e}")))?;
                    leads.push(lead);
                }
                Ok(None) => break,
                Err(e) => return Err(DatabaseError::Query(format!("list: {e}"))),
            }
        }
        Ok(leads)
    }

    async fn get(&self, email: &str) -> Result<Option<Lead>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE email = ?1"),
                params![email],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let lead = row_to_lead(&row)
                    .map_err(|e| DatabaseError::Serialization(format!("lead row: {e}")))?;
                Ok(Some(lead))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get: {e}"))),
        }
    }

    async fn mark_sent(&self, email: &str) -> Result<bool, DatabaseError> {
        let changed = self
            .conn()
            .execute(
                "UPDATE leads SET email_sent = 1 WHERE email = ?1",
                params![email],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("mark_sent: {e}")))?;

        debug!(email, found = changed > 0, "Lead marked sent");
        Ok(changed > 0)
    }

    async fn mark_opened(&self, email: &str) -> Result<bool, DatabaseError> {
        let changed = self
            .conn()
            .execute(
                "UPDATE leads SET email_opened = 1
                  WHERE email = ?1 AND email_sent = 1 AND COALESCE(email_opened, 0) = 0",
                params![email],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("mark_opened: {e}")))?;

        debug!(email, changed, "Lead marked opened");
        Ok(changed > 0)
    }

    async fn mark_responded(&self, email: &str) -> Result<bool, DatabaseError> {
        let changed = self
            .conn()
            .execute(
                "UPDATE leads SET response_received = 1
                  WHERE email = ?1 AND email_opened = 1 AND COALESCE(response_received, 0) = 0",
                params![email],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("mark_responded: {e}")))?;

        debug!(email, changed, "Lead marked responded");
        Ok(changed > 0)
    }

    async fn clear_all(&self) -> Result<usize, DatabaseError> {
        let count = self
            .conn()
            .execute("DELETE FROM leads", ())
            .await
            .map_err(|e| DatabaseError::Query(format!("clear_all: {e}")))?;

        info!(count, "All leads cleared");
        Ok(count as usize)
    }

    // ── Customers ───────────────────────────────────────────────────

    async fn record_customer(&self, customer: &Customer) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO customers (email, service_purchased, amount_paid, purchase_date,
                    subscription_status) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    customer.email.as_str(),
                    customer.service_purchased.as_str(),
                    customer.amount_paid,
                    format_datetime(&customer.purchase_date),
                    customer.subscription_status.as_str(),
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("record_customer: {e}")))?;
        Ok(())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY purchase_date DESC"),
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_customers: {e}")))?;

        let mut customers = Vec::new();
        loop {
            match rows.next().await {
                Ok(Some(row)) => {
                    let customer = row_to_customer(&row)
                        .map_err(|e| DatabaseError::Serialization(format!("customer row: {e}")))?;
                    customers.push(customer);
                }
                Ok(None) => break,
                Err(e) => return Err(DatabaseError::Query(format!("list_customers: {e}"))),
            }
        }
        Ok(customers)
    }

    // ── Templates ───────────────────────────────────────────────────

    async fn save_template(&self, template: &StoredTemplate) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO email_templates (template_name, subject, body, industry)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(template_name) DO UPDATE SET
                    subject = excluded.subject,
                    body = excluded.body,
                    industry = excluded.industry",
                params![
                    template.template_name.as_str(),
                    template.subject.as_str(),
                    template.body.as_str(),
                    template.industry.as_str(),
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("save_template: {e}")))?;

        debug!(name = %template.template_name, "Template saved");
        Ok(())
    }

    async fn get_template(&self, name: &str) -> Result<Option<StoredTemplate>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {TEMPLATE_COLUMNS} FROM email_templates WHERE template_name = ?1"),
                params![name],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_template: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let template = row_to_template(&row)
                    .map_err(|e| DatabaseError::Serialization(format!("template row: {e}")))?;
                Ok(Some(template))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_template: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    async fn test_db() -> LibSqlBackend {
        LibSqlBackend::new_memory().await.unwrap()
    }

    fn make_lead(email: &str, industry: &str) -> Lead {
        Lead::new("Acme", email, industry, "Austin", Utc::now())
            .with_contact("Jane Doe")
            .with_phone("+1-555-1000")
            .with_website("https://www.acme.com")
    }

    // ── Lead tests ──────────────────────────────────────────────────

    #[tokio::test]
    async fn upsert_and_get() {
        let db = test_db().await;
        let lead = make_lead("jane@acme.com", "tech");
        db.upsert(std::slice::from_ref(&lead)).await.unwrap();

        let fetched = db.get("jane@acme.com").await.unwrap().unwrap();
        assert_eq!(fetched.company_name, "Acme");
        assert_eq!(fetched.contact_person, "Jane Doe");
        assert_eq!(fetched.phone, "+1-555-1000");
        assert!(!fetched.email_sent);
        // Stored at microsecond precision
        assert_eq!(
            fetched.generated_date.timestamp_micros(),
            lead.generated_date.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn get_not_found() {
        let db = test_db().await;
        assert!(db.get("nobody@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_empty_is_noop() {
        let db = test_db().await;
        db.upsert(&[]).await.unwrap();
        assert!(db.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_by_email() {
        let db = test_db().await;
        let mut lead = make_lead("jane@acme.com", "tech");
        lead.email_sent = true;
        db.upsert(&[lead.clone()]).await.unwrap();

        let mut replacement = make_lead("jane@acme.com", "finance");
        replacement.company_name = "Acme Two".into();
        db.upsert(&[replacement]).await.unwrap();

        let all = db.list(None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].company_name, "Acme Two");
        assert_eq!(all[0].industry, "finance");
        // Full replacement, flags included
        assert!(!all[0].email_sent);
    }

    #[tokio::test]
    async fn upsert_keeps_sent_flag_when_incoming_is_sent() {
        let db = test_db().await;
        db.upsert(&[make_lead("jane@acme.com", "tech")]).await.unwrap();
        assert!(db.mark_sent("jane@acme.com").await.unwrap());

        let mut again = make_lead("jane@acme.com", "tech");
        again.email_sent = true;
        db.upsert(&[again]).await.unwrap();

        let stored = db.get("jane@acme.com").await.unwrap().unwrap();
        assert!(stored.email_sent);
    }

    #[tokio::test]
    async fn upsert_surfaces_storage_errors() {
        let db = test_db().await;
        db.conn().execute("DROP TABLE leads", ()).await.unwrap();

        let err = db.upsert(&[make_lead("a@x.com", "tech")]).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Query(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn list_customers_surfaces_storage_errors() {
        let db = test_db().await;
        db.conn().execute("DROP TABLE customers", ()).await.unwrap();

        let err = db.list_customers().await.unwrap_err();
        assert!(matches!(err, DatabaseError::Query(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let db = test_db().await;
        let leads = vec![make_lead("a@x.com", "tech"), make_lead("b@x.com", "tech")];
        db.upsert(&leads).await.unwrap();
        let once = db.list(None).await.unwrap();
        db.upsert(&leads).await.unwrap();
        let twice = db.list(None).await.unwrap();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn upsert_rejects_out_of_order_funnel_without_writing() {
        let db = test_db().await;
        let good = make_lead("good@x.com", "tech");
        let mut bad = make_lead("bad@x.com", "tech");
        bad.email_opened = true;

        let err = db.upsert(&[good, bad]).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Constraint(_)));
        assert!(db.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_rejects_blank_email() {
        let db = test_db().await;
        let err = db.upsert(&[make_lead("  ", "tech")]).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Constraint(_)));
    }

    #[tokio::test]
    async fn list_is_newest_first_with_limit() {
        let db = test_db().await;
        let now = Utc::now();
        let old = Lead::new("Old", "old@x.com", "tech", "Austin", now - Duration::hours(2));
        let mid = Lead::new("Mid", "mid@x.com", "tech", "Austin", now - Duration::hours(1));
        let new = Lead::new("New", "new@x.com", "tech", "Austin", now);
        db.upsert(&[old, new, mid]).await.unwrap();

        let all = db.list(None).await.unwrap();
        let names: Vec<_> = all.iter().map(|l| l.company_name.as_str()).collect();
        assert_eq!(names, vec!["New", "Mid", "Old"]);

        let limited = db.list(Some(2)).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].company_name, "New");
    }

    #[tokio::test]
    async fn same_timestamp_keeps_insertion_order() {
        let db = test_db().await;
        let now = Utc::now();
        let batch: Vec<Lead> = (0..3)
            .map(|i| Lead::new(format!("C{i}"), format!("c{i}@x.com"), "tech", "Austin", now))
            .collect();
        db.upsert(&batch).await.unwrap();

        let emails: Vec<_> = db
            .list(None)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.email)
            .collect();
        assert_eq!(emails, vec!["c0@x.com", "c1@x.com", "c2@x.com"]);
    }

    #[tokio::test]
    async fn mark_sent_sets_flag() {
        let db = test_db().await;
        db.upsert(&[make_lead("a@x.com", "tech")]).await.unwrap();

        assert!(db.mark_sent("a@x.com").await.unwrap());
        assert!(db.get("a@x.com").await.unwrap().unwrap().email_sent);
    }

    #[tokio::test]
    async fn mark_sent_missing_is_not_an_error() {
        let db = test_db().await;
        assert!(!db.mark_sent("ghost@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn opened_requires_sent() {
        let db = test_db().await;
        db.upsert(&[make_lead("a@x.com", "tech")]).await.unwrap();

        assert!(!db.mark_opened("a@x.com").await.unwrap());
        assert!(!db.get("a@x.com").await.unwrap().unwrap().email_opened);

        db.mark_sent("a@x.com").await.unwrap();
        assert!(db.mark_opened("a@x.com").await.unwrap());
        // Second call changes nothing
        assert!(!db.mark_opened("a@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn responded_requires_opened() {
        let db = test_db().await;
        db.upsert(&[make_lead("a@x.com", "tech")]).await.unwrap();
        db.mark_sent("a@x.com").await.unwrap();

        assert!(!db.mark_responded("a@x.com").await.unwrap());
        db.mark_opened("a@x.com").await.unwrap();
        assert!(db.mark_responded("a@x.com").await.unwrap());

        let lead = db.get("a@x.com").await.unwrap().unwrap();
        assert!(lead.email_sent && lead.email_opened && lead.response_received);
    }

    #[tokio::test]
    async fn clear_all_leaves_customers_and_templates() {
        let db = test_db().await;
        db.upsert(&[make_lead("a@x.com", "tech"), make_lead("b@x.com", "tech")])
            .await
            .unwrap();
        db.record_customer(&Customer {
            email: "buyer@x.com".into(),
            service_purchased: "Starter".into(),
            amount_paid: 29.0,
            purchase_date: Utc::now(),
            subscription_status: "active".into(),
        })
        .await
        .unwrap();
        db.save_template(&StoredTemplate {
            template_name: "custom".into(),
            subject: "Hi {company_name}".into(),
            body: "Hello".into(),
            industry: String::new(),
        })
        .await
        .unwrap();

        assert_eq!(db.clear_all().await.unwrap(), 2);
        assert!(db.list(None).await.unwrap().is_empty());
        assert_eq!(db.list_customers().await.unwrap().len(), 1);
        assert!(db.get_template("custom").await.unwrap().is_some());
    }

    // ── Customer / template tests ───────────────────────────────────

    #[tokio::test]
    async fn customer_roundtrip() {
        let db = test_db().await;
        db.record_customer(&Customer {
            email: "buyer@x.com".into(),
            service_purchased: "Professional".into(),
            amount_paid: 79.0,
            purchase_date: Utc::now(),
            subscription_status: "active".into(),
        })
        .await
        .unwrap();

        let customers = db.list_customers().await.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].service_purchased, "Professional");
        assert!((customers[0].amount_paid - 79.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn save_template_replaces_by_name() {
        let db = test_db().await;
        let mut template = StoredTemplate {
            template_name: "custom".into(),
            subject: "v1".into(),
            body: "body".into(),
            industry: "tech".into(),
        };
        db.save_template(&template).await.unwrap();
        template.subject = "v2".into();
        db.save_template(&template).await.unwrap();

        let fetched = db.get_template("custom").await.unwrap().unwrap();
        assert_eq!(fetched.subject, "v2");
        assert!(db.get_template("missing").await.unwrap().is_none());
    }

    // ── Misc ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn legacy_naive_timestamps_parse() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO leads (company_name, email, generated_date) \
                 VALUES ('Legacy', 'legacy@x.com', '2024-03-01T10:20:30.123456')",
                (),
            )
            .await
            .unwrap();

        let lead = db.get("legacy@x.com").await.unwrap().unwrap();
        assert_eq!(lead.generated_date.to_rfc3339(), "2024-03-01T10:20:30.123456+00:00");
        assert!(lead.phone.is_empty());
        assert!(!lead.email_sent);
    }

    #[tokio::test]
    async fn unparseable_timestamp_reads_as_minimum() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO leads (company_name, email, generated_date) \
                 VALUES ('Garbled', 'garbled@x.com', 'last tuesday')",
                (),
            )
            .await
            .unwrap();

        let lead = db.get("garbled@x.com").await.unwrap().unwrap();
        assert_eq!(lead.generated_date, DateTime::<Utc>::MIN_UTC);
        assert_eq!(parse_datetime("not a date"), DateTime::<Utc>::MIN_UTC);
    }

    #[tokio::test]
    async fn open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("nested").join("dir").join("leads.db");
        let db = LibSqlBackend::new_local(&db_path).await.unwrap();
        assert!(db_path.exists());
        drop(db);
    }

    #[tokio::test]
    async fn reopening_keeps_data() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("leads.db");
        {
            let db = LibSqlBackend::new_local(&db_path).await.unwrap();
            db.upsert(&[make_lead("a@x.com", "tech")]).await.unwrap();
        }
        let db = LibSqlBackend::new_local(&db_path).await.unwrap();
        assert!(db.get("a@x.com").await.unwrap().is_some());
    }
}
