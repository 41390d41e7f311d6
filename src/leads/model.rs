//! Lead data model: contact attributes plus outreach funnel flags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A prospective contact record.
///
/// `email` is the deduplication key. The three funnel flags only ever move
/// from `false` to `true`, and in order: sent, then opened, then responded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub industry: String,
    pub location: String,
    pub contact_person: String,
    /// Creation timestamp; never rewritten after generation.
    pub generated_date: DateTime<Utc>,
    #[serde(default)]
    pub email_sent: bool,
    #[serde(default)]
    pub email_opened: bool,
    #[serde(default)]
    pub response_received: bool,
}

/// Where a lead sits in the outreach funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    Generated,
    Sent,
    Opened,
    Responded,
}

impl std::fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FunnelStage::Generated => "generated",
            FunnelStage::Sent => "sent",
            FunnelStage::Opened => "opened",
            FunnelStage::Responded => "responded",
        };
        f.pad(s)
    }
}

impl Lead {
    /// A fresh, not-yet-contacted lead.
    pub fn new(
        company_name: impl Into<String>,
        email: impl Into<String>,
        industry: impl Into<String>,
        location: impl Into<String>,
        generated_date: DateTime<Utc>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            email: email.into(),
            phone: String::new(),
            website: String::new(),
            industry: industry.into(),
            location: location.into(),
            contact_person: String::new(),
            generated_date,
            email_sent: false,
            email_opened: false,
            response_received: false,
        }
    }

    pub fn with_contact(mut self, contact_person: impl Into<String>) -> Self {
        self.contact_person = contact_person.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = website.into();
        self
    }

    /// Furthest funnel stage reached.
    pub fn stage(&self) -> FunnelStage {
        if self.response_received {
            FunnelStage::Responded
        } else if self.email_opened {
            FunnelStage::Opened
        } else if self.email_sent {
            FunnelStage::Sent
        } else {
            FunnelStage::Generated
        }
    }

    /// True when the flags respect opened ⇒ sent and responded ⇒ opened.
    pub fn funnel_is_ordered(&self) -> bool {
        (!self.email_opened || self.email_sent) && (!self.response_received || self.email_opened)
    }
}

/// A paying customer. Shares storage with leads but has no funnel logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub email: String,
    pub service_purchased: String,
    pub amount_paid: f64,
    pub purchase_date: DateTime<Utc>,
    pub subscription_status: String,
}

/// A named template row from the `email_templates` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTemplate {
    pub template_name: String,
    pub subject: String,
    pub body: String,
    pub industry: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead() -> Lead {
        Lead::new("Acme", "info@acme.com", "tech", "Austin", Utc::now())
    }

    #[test]
    fn new_lead_is_generated() {
        let l = lead();
        assert_eq!(l.stage(), FunnelStage::Generated);
        assert!(l.funnel_is_ordered());
        assert!(l.phone.is_empty());
    }

    #[test]
    fn stage_follows_furthest_flag() {
        let mut l = lead();
        l.email_sent = true;
        assert_eq!(l.stage(), FunnelStage::Sent);
        l.email_opened = true;
        assert_eq!(l.stage(), FunnelStage::Opened);
        l.response_received = true;
        assert_eq!(l.stage(), FunnelStage::Responded);
        assert!(l.funnel_is_ordered());
    }

    #[test]
    fn opened_without_sent_is_out_of_order() {
        let mut l = lead();
        l.email_opened = true;
        assert!(!l.funnel_is_ordered());
    }

    #[test]
    fn responded_without_opened_is_out_of_order() {
        let mut l = lead();
        l.email_sent = true;
        l.response_received = true;
        assert!(!l.funnel_is_ordered());
    }

    #[test]
    fn serde_defaults_flags() {
        let json = r#"{
            "company_name": "Acme", "email": "a@acme.com", "phone": "",
            "website": "", "industry": "tech", "location": "Austin",
            "contact_person": "Jane", "generated_date": "2024-01-01T00:00:00Z"
        }"#;
        let l: Lead = serde_json::from_str(json).unwrap();
        assert!(!l.email_sent && !l.email_opened && !l.response_received);
    }
}
