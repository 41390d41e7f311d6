//! Outreach templates: renders a subject/body pair for a lead.
//!
//! Built-in templates are compiled in. A `custom` template can be
//! registered from storage; its `{field}` placeholders are checked against
//! the lead's fields at registration so rendering itself cannot fail.

use std::fmt;
use std::sync::LazyLock;

use clap::ValueEnum;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::TemplateError;
use crate::leads::{Lead, StoredTemplate};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_]+)\}").expect("placeholder pattern is valid"));

/// Lead fields a custom template may reference.
pub const TEMPLATE_FIELDS: &[&str] = &[
    "company_name",
    "contact_person",
    "email",
    "phone",
    "website",
    "industry",
    "location",
];

/// Which template to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum TemplateKey {
    LeadGeneration,
    EmailMarketing,
    /// Falls back to `LeadGeneration` when no custom template is registered.
    Custom,
}

impl TemplateKey {
    pub const ALL: [TemplateKey; 3] = [
        TemplateKey::LeadGeneration,
        TemplateKey::EmailMarketing,
        TemplateKey::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKey::LeadGeneration => "lead_generation",
            TemplateKey::EmailMarketing => "email_marketing",
            TemplateKey::Custom => "custom",
        }
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully interpolated message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContent {
    pub subject: String,
    pub body: String,
}

/// A validated custom template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomTemplate {
    name: String,
    subject: String,
    body: String,
}

impl CustomTemplate {
    pub fn parse(
        name: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, TemplateError> {
        let template = Self {
            name: name.into(),
            subject: subject.into(),
            body: body.into(),
        };
        validate(&template.name, &template.subject)?;
        validate(&template.name, &template.body)?;
        Ok(template)
    }

    pub fn from_stored(stored: &StoredTemplate) -> Result<Self, TemplateError> {
        Self::parse(&stored.template_name, &stored.subject, &stored.body)
    }

    fn render(&self, lead: &Lead) -> EmailContent {
        EmailContent {
            subject: interpolate(&self.subject, lead),
            body: interpolate(&self.body, lead),
        }
    }
}

fn validate(template: &str, text: &str) -> Result<(), TemplateError> {
    for caps in PLACEHOLDER.captures_iter(text) {
        let field = &caps[1];
        if !TEMPLATE_FIELDS.contains(&field) {
            return Err(TemplateError::UnknownPlaceholder {
                template: template.to_string(),
                field: field.to_string(),
            });
        }
    }

    let stripped = PLACEHOLDER.replace_all(text, "");
    if let Some(pos) = stripped.find(['{', '}']) {
        let fragment: String = stripped[pos..].chars().take(20).collect();
        return Err(TemplateError::Malformed {
            template: template.to_string(),
            fragment,
        });
    }
    Ok(())
}

/// Single pass: substituted values are never re-scanned.
fn interpolate(text: &str, lead: &Lead) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| field_value(lead, &caps[1]).to_string())
        .into_owned()
}

fn field_value<'a>(lead: &'a Lead, field: &str) -> &'a str {
    match field {
        "company_name" => &lead.company_name,
        "contact_person" => greeting_name(lead),
        "email" => &lead.email,
        "phone" => &lead.phone,
        "website" => &lead.website,
        "industry" => &lead.industry,
        "location" => &lead.location,
        _ => "",
    }
}

fn greeting_name(lead: &Lead) -> &str {
    let name = lead.contact_person.trim();
    if name.is_empty() { "there" } else { name }
}

/// Renders outreach messages. Pure: no I/O, no persistence access.
#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    custom: Option<CustomTemplate>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_custom(custom: CustomTemplate) -> Self {
        Self {
            custom: Some(custom),
        }
    }

    /// Render `key` for `lead`. Always produces a message.
    pub fn render(&self, lead: &Lead, key: TemplateKey) -> EmailContent {
        match key {
            TemplateKey::LeadGeneration => lead_generation(lead),
            TemplateKey::EmailMarketing => email_marketing(lead),
            TemplateKey::Custom => match &self.custom {
                Some(custom) => custom.render(lead),
                None => lead_generation(lead),
            },
        }
    }
}

fn lead_generation(lead: &Lead) -> EmailContent {
    let company = &lead.company_name;
    EmailContent {
        subject: format!("Boost {company}'s Sales with Quality Leads"),
        body: format!(
            "Hi {name},

I noticed {company} is in the {industry} industry, and I wanted to reach out about something that could significantly impact your sales pipeline.

We've developed an AI-powered lead generation system that's helping businesses like yours:
✓ Generate 50-100 qualified leads per week
✓ Increase conversion rates by 40%
✓ Save 10+ hours weekly on prospecting

The system automatically:
- Identifies ideal prospects in your market
- Generates personalized outreach emails
- Tracks engagement and responses
- Provides detailed analytics and insights

Would you be interested in a 15-minute demo to see how this could work for {company}?

Best regards,
AI Lead Solutions Team

P.S. We're offering a free 7-day trial for companies in {location} this month.

[Book a Demo] | [Learn More] | [Unsubscribe]
",
            name = greeting_name(lead),
            industry = lead.industry,
            location = lead.location,
        ),
    }
}

fn email_marketing(lead: &Lead) -> EmailContent {
    let company = &lead.company_name;
    EmailContent {
        subject: format!("Double {company}'s Email Response Rates"),
        body: format!(
            "Hello {name},

Are you satisfied with your current email marketing results?

Most {industry} companies see only 2-3% response rates from their outreach campaigns. Our AI email system is generating 8-12% response rates for similar businesses.

Here's what makes it different:
• AI-powered personalization for each recipient
• Industry-specific templates that convert
• Automated follow-up sequences
• Real-time performance tracking

{company} could be seeing much better results with the right approach.

Interested in a quick 10-minute call to discuss your email marketing goals?

Best,
Email Marketing AI Team

[Schedule Call] | [Free Analysis] | [Unsubscribe]
",
            name = greeting_name(lead),
            industry = lead.industry,
        ),
    }
}
