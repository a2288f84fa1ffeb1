//! CSV contact import: line splitting, header auto-mapping, row extraction.
//!
//! The CSV grammar is intentionally small: commas split fields unless inside
//! a double-quoted span, and each field is trimmed. Escaped (doubled) quotes
//! are not supported; each `"` just toggles the quoted state.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

static SHEET_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"docs\.google\.com/spreadsheets/d/([A-Za-z0-9_-]+)").expect("valid regex")
});

static SHEET_GID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#?&]gid=(\d+)").expect("valid regex"));

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// A parsed CSV: first non-empty line is the header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Split one CSV line on commas outside double quotes, trimming each field.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Parse CSV text into headers and data rows.
///
/// Fails when there are fewer than two non-empty lines or the header row is
/// entirely blank.
pub fn parse_csv(text: &str) -> Result<CsvTable, CoreError> {
    let lines: Vec<&str> = text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .collect();
    if lines.len() < 2 {
        return Err(CoreError::Validation(
            "CSV must have a header row and at least one data row".into(),
        ));
    }

    let headers = parse_csv_line(lines[0]);
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CoreError::Validation("CSV header row is empty".into()));
    }

    Ok(CsvTable {
        headers,
        rows: lines[1..].iter().map(|l| parse_csv_line(l)).collect(),
    })
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Contact fields an import column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Email,
    FirstName,
    LastName,
    Company,
    CustomMessage,
}

impl ContactField {
    pub const ALL: [ContactField; 5] = [
        ContactField::Email,
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::Company,
        ContactField::CustomMessage,
    ];

    /// Normalized header spellings accepted for this field.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            ContactField::Email => &["email", "emailaddress", "mail"],
            ContactField::FirstName => &["firstname", "first", "name", "fname", "givenname"],
            ContactField::LastName => &["lastname", "last", "surname", "lname", "familyname"],
            ContactField::Company => &[
                "company",
                "companyname",
                "organization",
                "organisation",
                "org",
                "business",
            ],
            ContactField::CustomMessage => &[
                "custommessage",
                "message",
                "note",
                "notes",
                "personalmessage",
            ],
        }
    }
}

/// Lowercase and drop `_`, space, and `-`.
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !matches!(c, '_' | ' ' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Column index for each contact field, `None` when no header matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub email: Option<usize>,
    pub first_name: Option<usize>,
    pub last_name: Option<usize>,
    pub company: Option<usize>,
    pub custom_message: Option<usize>,
}

impl ColumnMapping {
    /// Match headers against each field's synonyms; a column is used at most once.
    pub fn auto_map(headers: &[String]) -> Self {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let mut taken = vec![false; headers.len()];
        let mut mapping = ColumnMapping::default();

        for field in ContactField::ALL {
            let found = field.synonyms().iter().find_map(|synonym| {
                normalized
                    .iter()
                    .enumerate()
                    .find(|(i, h)| !taken[*i] && h.as_str() == *synonym)
                    .map(|(i, _)| i)
            });
            if let Some(i) = found {
                taken[i] = true;
                *mapping.slot(field) = Some(i);
            }
        }
        mapping
    }

    pub fn get(&self, field: ContactField) -> Option<usize> {
        match field {
            ContactField::Email => self.email,
            ContactField::FirstName => self.first_name,
            ContactField::LastName => self.last_name,
            ContactField::Company => self.company,
            ContactField::CustomMessage => self.custom_message,
        }
    }

    fn slot(&mut self, field: ContactField) -> &mut Option<usize> {
        match field {
            ContactField::Email => &mut self.email,
            ContactField::FirstName => &mut self.first_name,
            ContactField::LastName => &mut self.last_name,
            ContactField::Company => &mut self.company,
            ContactField::CustomMessage => &mut self.custom_message,
        }
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One importable contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedRow {
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub custom_message: Option<String>,
}

/// Map rows through auto-detected columns, dropping rows without an email.
pub fn parse_rows(headers: &[String], rows: &[Vec<String>]) -> Vec<MappedRow> {
    map_rows(&ColumnMapping::auto_map(headers), rows)
}

/// Map rows through an explicit column mapping.
pub fn map_rows(mapping: &ColumnMapping, rows: &[Vec<String>]) -> Vec<MappedRow> {
    rows.iter().filter_map(|row| map_row(mapping, row)).collect()
}

fn map_row(mapping: &ColumnMapping, row: &[String]) -> Option<MappedRow> {
    let cell = |field: ContactField| {
        mapping
            .get(field)
            .and_then(|i| row.get(i))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let email = cell(ContactField::Email).filter(|e| e.contains('@'))?;
    let first_name = cell(ContactField::FirstName).unwrap_or_else(|| display_name_from_email(&email));

    Some(MappedRow {
        first_name,
        last_name: cell(ContactField::LastName),
        company: cell(ContactField::Company),
        custom_message: cell(ContactField::CustomMessage),
        email,
    })
}

/// `jane.doe@co.com` becomes `Jane Doe`.
pub fn display_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    local
        .split(['.', '_', '-'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Everything an import preview shows before generation.
#[derive(Debug, Clone, Serialize)]
pub struct ImportPreview {
    pub headers: Vec<String>,
    pub mapping: ColumnMapping,
    pub rows: Vec<MappedRow>,
    /// Data rows dropped for lacking a usable email.
    pub dropped: usize,
}

/// Parse CSV text and map it in one step.
pub fn preview_csv(text: &str) -> Result<ImportPreview, CoreError> {
    let table = parse_csv(text)?;
    let mapping = ColumnMapping::auto_map(&table.headers);
    if mapping.email.is_none() {
        return Err(CoreError::Validation(
            "No email column found; add a column named \"email\"".into(),
        ));
    }
    let rows = map_rows(&mapping, &table.rows);
    Ok(ImportPreview {
        dropped: table.rows.len() - rows.len(),
        headers: table.headers,
        mapping,
        rows,
    })
}

// ---------------------------------------------------------------------------
// Google Sheets
// ---------------------------------------------------------------------------

/// Rewrite a Google Sheets share link to its CSV export URL.
///
/// Returns `None` when `url` is not a spreadsheet link.
pub fn sheet_export_url(url: &str) -> Option<String> {
    let id = SHEET_ID_RE.captures(url)?.get(1)?.as_str();
    let gid = SHEET_GID_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map_or("0", |m| m.as_str());
    Some(format!(
        "https://docs.google.com/spreadsheets/d/{id}/export?format=csv&gid={gid}"
    ))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn quoted_commas_stay_in_field() {
        assert_eq!(
            parse_csv_line(r#" a , "Acme, Inc" ,c"#),
            strings(&["a", "Acme, Inc", "c"])
        );
        assert_eq!(parse_csv_line(""), strings(&[""]));
    }

    #[test]
    fn doubled_quotes_toggle_away() {
        assert_eq!(parse_csv_line(r#""say ""hi""",x"#), strings(&["say hi", "x"]));
    }

    #[test]
    fn short_or_headless_csv_is_rejected() {
        assert_matches!(parse_csv("email\n"), Err(CoreError::Validation(_)));
        assert_matches!(parse_csv(""), Err(CoreError::Validation(_)));
        assert_matches!(parse_csv(" , \na@x.com,Ann"), Err(CoreError::Validation(_)));
        let table = parse_csv("email\r\n\r\na@x.com\r\n").unwrap();
        assert_eq!(table.rows, vec![strings(&["a@x.com"])]);
    }

    #[test]
    fn header_synonyms_map() {
        let headers = strings(&["E-mail", "First_Name", "Surname", "Organisation", "Notes"]);
        let mapping = ColumnMapping::auto_map(&headers);
        assert_eq!(
            mapping,
            ColumnMapping {
                email: Some(0),
                first_name: Some(1),
                last_name: Some(2),
                company: Some(3),
                custom_message: Some(4),
            }
        );
    }

    #[test]
    fn column_is_not_reused() {
        let mapping = ColumnMapping::auto_map(&strings(&["Email", "Name"]));
        assert_eq!(mapping.email, Some(0));
        assert_eq!(mapping.first_name, Some(1));
        assert_eq!(mapping.last_name, None);
    }

    #[test]
    fn rows_without_email_are_dropped() {
        let headers = strings(&["Email", "First", "Company"]);
        let rows = vec![strings(&["a@x.com", "Ann", "Acme"]), strings(&["", "Bob", "Beta"])];
        let mapped = parse_rows(&headers, &rows);
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].first_name, "Ann");
        assert_eq!(mapped[0].company.as_deref(), Some("Acme"));
        assert_eq!(mapped[0].last_name, None);
    }

    #[test]
    fn missing_first_name_comes_from_email() {
        assert_eq!(display_name_from_email("jane.doe@co.com"), "Jane Doe");
        assert_eq!(display_name_from_email("BOB_smith-jr@x.io"), "Bob Smith Jr");

        let mapped = parse_rows(&strings(&["email"]), &[strings(&["jane.doe@co.com"])]);
        assert_eq!(mapped[0].first_name, "Jane Doe");
    }

    #[test]
    fn short_rows_and_invalid_emails() {
        let headers = strings(&["first", "email"]);
        let rows = vec![strings(&["Ann"]), strings(&["Bob", "not-an-email"]), strings(&["Cy", "c@x.com"])];
        let mapped = parse_rows(&headers, &rows);
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].email, "c@x.com");
    }

    #[test]
    fn preview_counts_dropped_rows() {
        let preview = preview_csv("Email,Name\na@x.com,Ann\n,Bob\nb@x.com,\n").unwrap();
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.dropped, 1);
        assert_eq!(preview.rows[1].first_name, "B");

        assert_matches!(preview_csv("name,company\nAnn,Acme"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn sheet_urls_rewrite_to_export() {
        assert_eq!(
            sheet_export_url("https://docs.google.com/spreadsheets/d/1AbC-x_9/edit#gid=42").as_deref(),
            Some("https://docs.google.com/spreadsheets/d/1AbC-x_9/export?format=csv&gid=42")
        );
        assert_eq!(
            sheet_export_url("https://docs.google.com/spreadsheets/d/abc/edit?usp=sharing").as_deref(),
            Some("https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=0")
        );
        assert_eq!(sheet_export_url("https://example.com/file.csv"), None);
    }
}
