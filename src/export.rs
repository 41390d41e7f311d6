//! Flat-file export of leads as RFC 4180 CSV.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::leads::Lead;

/// Column order of every export. Do not reorder: downstream sheets key on it.
pub const COLUMNS: [&str; 11] = [
    "company_name",
    "email",
    "phone",
    "website",
    "industry",
    "location",
    "contact_person",
    "generated_date",
    "email_sent",
    "email_opened",
    "response_received",
];

/// `leads_YYYYMMDD_HHMMSS.csv` for the given instant.
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("leads_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

/// Write a header row plus one row per lead. Returns the number of rows written.
pub fn write_csv<W: Write>(mut out: W, leads: &[Lead]) -> std::io::Result<usize> {
    write_row(&mut out, COLUMNS.iter().copied())?;
    for lead in leads {
        let generated = lead
            .generated_date
            .to_rfc3339_opts(SecondsFormat::Micros, true);
        write_row(
            &mut out,
            [
                lead.company_name.as_str(),
                lead.email.as_str(),
                lead.phone.as_str(),
                lead.website.as_str(),
                lead.industry.as_str(),
                lead.location.as_str(),
                lead.contact_person.as_str(),
                generated.as_str(),
                flag(lead.email_sent),
                flag(lead.email_opened),
                flag(lead.response_received),
            ],
        )?;
    }
    out.flush()?;
    Ok(leads.len())
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

fn write_row<'a, W: Write>(
    out: &mut W,
    fields: impl IntoIterator<Item = &'a str>,
) -> std::io::Result<()> {
    let mut first = true;
    for field in fields {
        if !first {
            out.write_all(b",")?;
        }
        first = false;
        write_field(out, field)?;
    }
    out.write_all(b"\r\n")
}

fn write_field<W: Write>(out: &mut W, field: &str) -> std::io::Result<()> {
    if field.contains([',', '"', '\n', '\r']) {
        write!(out, "\"{}\"", field.replace('"', "\"\""))
    } else {
        out.write_all(field.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()
    }

    #[test]
    fn file_name_format() {
        assert_eq!(export_file_name(at()), "leads_20240506_070809.csv");
    }

    #[test]
    fn header_only_for_no_leads() {
        let mut buf = Vec::new();
        assert_eq!(write_csv(&mut buf, &[]).unwrap(), 0);
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, format!("{}\r\n", COLUMNS.join(",")));
    }

    #[test]
    fn rows_follow_column_order() {
        let mut lead = Lead::new("Acme", "jane@acme.com", "tech", "Austin", at())
            .with_contact("Jane")
            .with_phone("+1-555-1000")
            .with_website("https://acme.com");
        lead.email_sent = true;

        let mut buf = Vec::new();
        write_csv(&mut buf, &[lead]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "Acme,jane@acme.com,+1-555-1000,https://acme.com,tech,Austin,Jane,\
             2024-05-06T07:08:09.000000Z,1,0,0"
        );
    }

    #[test]
    fn quotes_special_characters() {
        let lead = Lead::new("Smith, Jones & \"Co\"", "a@b.com", "law", "New York, NY", at());
        let mut buf = Vec::new();
        write_csv(&mut buf, &[lead]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"Smith, Jones & \"\"Co\"\"\""));
        assert!(text.contains("\"New York, NY\""));
    }
}
