//! Campaign runner: renders and sends outreach to a batch of unsent leads.
//!
//! Sends are strictly sequential in input order, with a fixed minimum delay
//! between successive transport calls. A failed send is recorded and the
//! batch moves on. A storage failure stops the run, and the error carries
//! the report of everything done up to that point.

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;
use uuid::Uuid;

use crate::error::{DatabaseError, TransportError};
use crate::leads::Lead;
use crate::store::LeadStore;
use crate::templates::{EmailContent, TemplateEngine, TemplateKey};
use crate::transport::Transport;

/// One lead whose send failed.
#[derive(Debug, Clone)]
pub struct SendFailure {
    pub email: String,
    pub error: TransportError,
}

/// Outcome of one campaign run.
#[derive(Debug, Clone)]
pub struct CampaignReport {
    pub campaign_id: Uuid,
    pub template: TemplateKey,
    /// Leads handed to the run.
    pub attempted: usize,
    /// Leads the transport accepted.
    pub sent: usize,
    /// Leads already marked sent, passed over without a send.
    pub skipped: usize,
    pub failures: Vec<SendFailure>,
    /// Delivered, but the store failed while recording it as sent.
    pub unmarked: Option<String>,
}

impl CampaignReport {
    pub fn sent_count(&self) -> usize {
        self.sent
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }
}

impl std::fmt::Display for CampaignReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Campaign sent to {} of {} leads",
            self.sent, self.attempted
        )?;
        if !self.failures.is_empty() {
            write!(f, " ({} failed)", self.failures.len())?;
        }
        if self.skipped > 0 {
            write!(f, " ({} already sent)", self.skipped)?;
        }
        if let Some(email) = &self.unmarked {
            write!(f, " ({email} delivered but not recorded)")?;
        }
        Ok(())
    }
}

/// A campaign stopped early because the lead store failed.
#[derive(Debug, thiserror::Error)]
#[error(
    "Campaign stopped after {} of {} sends: {source}",
    .report.sent,
    .report.attempted
)]
pub struct CampaignAborted {
    /// Progress up to and including the lead that hit the failure.
    pub report: CampaignReport,
    pub source: DatabaseError,
}

/// Runs outreach campaigns against a lead store through a transport.
pub struct CampaignRunner {
    store: Arc<dyn LeadStore>,
    transport: Arc<dyn Transport>,
    engine: TemplateEngine,
    send_interval: Duration,
}

impl CampaignRunner {
    pub fn new(
        store: Arc<dyn LeadStore>,
        transport: Arc<dyn Transport>,
        engine: TemplateEngine,
        send_interval: Duration,
    ) -> Self {
        Self {
            store,
            transport,
            engine,
            send_interval,
        }
    }

    /// What `lead` would receive under `key`. Sends nothing.
    pub fn preview(&self, lead: &Lead, key: TemplateKey) -> EmailContent {
        self.engine.render(lead, key)
    }

    /// Send `key` to each lead in order and mark successes as sent.
    ///
    /// Transport failures are collected in the report. A storage error
    /// while marking a lead sent stops the run; the partial report comes
    /// back inside [`CampaignAborted`].
    pub async fn run_campaign(
        &self,
        leads: &[Lead],
        key: TemplateKey,
    ) -> Result<CampaignReport, CampaignAborted> {
        let campaign_id = Uuid::new_v4();
        let span = tracing::info_span!("campaign", %campaign_id, template = %key);
        self.run_inner(campaign_id, leads, key).instrument(span).await
    }

    async fn run_inner(
        &self,
        campaign_id: Uuid,
        leads: &[Lead],
        key: TemplateKey,
    ) -> Result<CampaignReport, CampaignAborted> {
        let mut report = CampaignReport {
            campaign_id,
            template: key,
            attempted: leads.len(),
            sent: 0,
            skipped: 0,
            failures: Vec::new(),
            unmarked: None,
        };
        let mut sent_before = false;

        for lead in leads {
            if lead.email_sent {
                report.skipped += 1;
                continue;
            }

            if sent_before && !self.send_interval.is_zero() {
                tokio::time::sleep(self.send_interval).await;
            }
            sent_before = true;

            let content = self.engine.render(lead, key);
            match self.transport.send(&lead.email, &content).await {
                Ok(()) => {
                    report.sent += 1;
                    if let Err(source) = self.store.mark_sent(&lead.email).await {
                        tracing::error!(
                            email = %lead.email,
                            sent = report.sent,
                            error = %source,
                            "Failed to record send, stopping campaign"
                        );
                        report.unmarked = Some(lead.email.clone());
                        return Err(CampaignAborted { report, source });
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        email = %lead.email,
                        transport = self.transport.name(),
                        %error,
                        "Failed to send email"
                    );
                    report.failures.push(SendFailure {
                        email: lead.email.clone(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            attempted = report.attempted,
            sent = report.sent,
            failed = report.failures.len(),
            skipped = report.skipped,
            "Campaign finished"
        );
        Ok(report)
    }
}

/// Up to `batch_size` unsent leads from `leads`, in order.
pub fn select_unsent(leads: &[Lead], batch_size: usize) -> Vec<Lead> {
    leads
        .iter()
        .filter(|l| !l.email_sent)
        .take(batch_size)
        .cloned()
        .collect()
}
