//! Deterministic synthetic leads: the fallback when enrichment comes up short.
//!
//! A fixed roster of company-name styles is walked in order, so the same
//! request always produces the same companies, emails and phone numbers.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::leads::Lead;

/// Company-name styles; `{industry}` is replaced by the title-cased industry.
pub const ROSTER: [&str; 10] = [
    "{industry} Solutions Inc",
    "Premier {industry} Group",
    "{industry} Pro Services",
    "Elite {industry} Co",
    "Advanced {industry} Systems",
    "{industry} Excellence Ltd",
    "Dynamic {industry} Solutions",
    "Next Gen {industry}",
    "Smart {industry} Solutions",
    "Global {industry} Partners",
];

/// Hard cap on synthetic leads per call.
pub const ROSTER_SIZE: usize = ROSTER.len();

/// Longest slug used in a derived email domain.
pub const MAX_SLUG_LEN: usize = 15;

/// Capitalize the first letter of every word, lowercase the rest.
///
/// A "word" starts after any non-alphabetic character, so `e-commerce`
/// becomes `E-Commerce`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Lowercase ASCII alphanumerics of `s`, truncated to [`MAX_SLUG_LEN`].
pub fn slugify(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .take(MAX_SLUG_LEN)
        .collect()
}

/// The roster rendered for one industry, in fixed order.
pub fn company_names(industry: &str) -> Vec<String> {
    let title = title_case(industry.trim());
    ROSTER
        .iter()
        .map(|style| style.replace("{industry}", &title))
        .collect()
}

/// Phone number derived from a roster position.
pub fn phone_for(index: usize) -> String {
    format!("+1-555-{:04}", 1000 + index)
}

/// Synthesize up to `count` leads (never more than [`ROSTER_SIZE`]).
///
/// Emails already in `taken` are never reused; a clashing slug gets the
/// 1-based roster position appended, and the entry is skipped if that
/// still clashes. Every returned email is added to `taken`.
pub fn synthesize(
    industry: &str,
    location: &str,
    count: usize,
    generated_date: DateTime<Utc>,
    taken: &mut HashSet<String>,
) -> Vec<Lead> {
    let mut leads = Vec::with_capacity(count.min(ROSTER_SIZE));

    for (i, company) in company_names(industry).into_iter().enumerate() {
        if leads.len() >= count {
            break;
        }

        let mut slug = slugify(&company);
        if taken.contains(&email_for(&slug)) {
            slug = format!("{slug}{}", i + 1);
            if taken.contains(&email_for(&slug)) {
                continue;
            }
        }

        let email = email_for(&slug);
        taken.insert(email.clone());
        leads.push(
            Lead::new(company, email, industry, location, generated_date)
                .with_contact(format!("Contact Person {}", i + 1))
                .with_website(format!("https://www.{slug}.com"))
                .with_phone(phone_for(i)),
        );
    }

    leads
}

fn email_for(slug: &str) -> String {
    format!("info@{slug}.com")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("technology"), "Technology");
        assert_eq!(title_case("real estate"), "Real Estate");
        assert_eq!(title_case("e-commerce"), "E-Commerce");
        assert_eq!(title_case("HEALTHCARE"), "Healthcare");
    }

    #[test]
    fn slug_strips_and_truncates() {
        assert_eq!(slugify("Technology Solutions Inc"), "technologysolut");
        assert_eq!(slugify("Elite Tech Co."), "elitetechco");
        assert_eq!(slugify("A, B. C"), "abc");
        assert!(slugify("Advanced Telecommunications Systems").len() <= MAX_SLUG_LEN);
    }

    #[test]
    fn roster_order_is_fixed() {
        let names = company_names("technology");
        assert_eq!(names.len(), ROSTER_SIZE);
        assert_eq!(names[0], "Technology Solutions Inc");
        assert_eq!(names[1], "Premier Technology Group");
        assert_eq!(names[2], "Technology Pro Services");
        assert_eq!(names[9], "Global Technology Partners");
    }

    #[test]
    fn synthesize_derives_fields() {
        let mut taken = HashSet::new();
        let leads = synthesize("technology", "Austin", 3, Utc::now(), &mut taken);
        assert_eq!(leads.len(), 3);

        let first = &leads[0];
        assert_eq!(first.company_name, "Technology Solutions Inc");
        assert_eq!(first.email, "info@technologysolut.com");
        assert_eq!(first.website, "https://www.technologysolut.com");
        assert_eq!(first.contact_person, "Contact Person 1");
        assert_eq!(first.phone, "+1-555-1000");
        assert_eq!(first.location, "Austin");
        assert_eq!(first.industry, "technology");
        assert!(!first.email_sent);

        assert_eq!(leads[2].phone, "+1-555-1002");
        assert_eq!(taken.len(), 3);
    }

    #[test]
    fn synthesize_is_capped_by_roster() {
        let mut taken = HashSet::new();
        let leads = synthesize("finance", "NYC", 25, Utc::now(), &mut taken);
        assert_eq!(leads.len(), ROSTER_SIZE);
    }

    #[test]
    fn long_industry_slugs_stay_unique() {
        // "Telecommunications Solutions Inc" and "Telecommunications Pro Services"
        // share their first 15 slug characters.
        let mut taken = HashSet::new();
        let leads = synthesize("telecommunications", "Denver", 10, Utc::now(), &mut taken);
        let emails: HashSet<_> = leads.iter().map(|l| l.email.clone()).collect();
        assert_eq!(emails.len(), leads.len());
        assert_eq!(leads[0].email, "info@telecommunicati.com");
        assert_eq!(leads[2].email, "info@telecommunicati3.com");
    }

    #[test]
    fn taken_emails_are_not_reused() {
        let mut taken = HashSet::from(["info@technologysolut.com".to_string()]);
        let leads = synthesize("technology", "Austin", 2, Utc::now(), &mut taken);
        assert_eq!(leads[0].email, "info@technologysolut1.com");
        assert_eq!(leads[0].company_name, "Technology Solutions Inc");
    }
}
