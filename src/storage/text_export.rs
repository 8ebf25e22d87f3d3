//! Plain-text export of a bill
//!
//! ```text
//! Bill: H.2212
//! Title: An Act relative to parks
//! Sponsor: Jane Doe
//! General Court: 194th (2023-2024)
//! Source: view_text
//! URL: https://malegislature.gov/Bills/194/H2212/Text
//! ============================================================
//!
//! SECTION 1. ...
//! ```

use crate::bill::{BillRecord, TextSource};

/// Line separating the header from the bill text
pub const SEPARATOR_WIDTH: usize = 60;

/// A bill text export, header plus full text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextExport {
    pub number: String,
    pub title: Option<String>,
    pub sponsor: Option<String>,
    pub session_label: String,
    pub source: TextSource,
    /// Text URL, else the detail page
    pub url: String,
    pub text: String,
}

impl TextExport {
    pub fn from_record(record: &BillRecord) -> Self {
        Self {
            number: record.number.clone(),
            title: record.title.clone(),
            sponsor: record.sponsor.clone(),
            session_label: record.session_label.clone(),
            source: record.text_source,
            url: record.source_url().to_string(),
            text: record.full_text.clone(),
        }
    }

    /// Renders the export file content
    pub fn render(&self) -> String {
        format!(
            "Bill: {}\nTitle: {}\nSponsor: {}\nGeneral Court: {}\nSource: {}\nURL: {}\n{}\n\n{}",
            header_value(&self.number),
            header_value(self.title.as_deref().unwrap_or_default()),
            header_value(self.sponsor.as_deref().unwrap_or_default()),
            header_value(&self.session_label),
            self.source,
            self.url,
            separator(),
            self.text
        )
    }

    /// Parses export file content
    ///
    /// # Returns
    ///
    /// * `Ok(TextExport)` - Header and text recovered
    /// * `Err(String)` - Description of what is missing or malformed
    pub fn parse(content: &str) -> Result<Self, String> {
        let marker = format!("{}\n\n", separator());
        let (header, text) = content
            .split_once(&marker)
            .ok_or_else(|| "missing header separator".to_string())?;

        let field = |name: &str| -> Option<String> {
            let prefix = format!("{}:", name);
            header
                .lines()
                .find_map(|line| line.strip_prefix(prefix.as_str()))
                .map(|value| value.trim().to_string())
        };
        let required = |name: &str| field(name).ok_or_else(|| format!("missing '{}' line", name));
        let optional = |name: &str| field(name).filter(|value| !value.is_empty());

        let number = required("Bill")?;
        if number.is_empty() {
            return Err("empty bill number".to_string());
        }

        let source_id = required("Source")?;
        let source = TextSource::from_identifier(&source_id)
            .ok_or_else(|| format!("unknown source '{}'", source_id))?;

        Ok(Self {
            number,
            title: optional("Title"),
            sponsor: optional("Sponsor"),
            session_label: required("General Court")?,
            source,
            url: required("URL")?,
            text: text.to_string(),
        })
    }
}

/// Collapses whitespace runs, newlines included, so a value stays on its line
fn header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}
