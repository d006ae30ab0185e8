//! The image migration plan in CSV form.

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::path::Path;

pub const MANIFEST_HEADER: &str =
    "page_path,selector_context,current_remote_url,proposed_local_path,alt_text";

/// One remote image occurrence and where its local copy should live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRow {
    pub page_path: String,
    pub selector_context: String,
    pub remote_url: String,
    /// Root-relative path, e.g. `assets/images/services/services-hero.jpg`.
    pub proposed_local_path: String,
    pub alt_text: String,
}

impl PlanRow {
    fn fields(&self) -> [&str; 5] {
        [
            &self.page_path,
            &self.selector_context,
            &self.remote_url,
            &self.proposed_local_path,
            &self.alt_text,
        ]
    }

    fn from_fields(mut fields: Vec<String>) -> Self {
        fields.resize(5, String::new());
        let mut fields = fields.into_iter();
        let mut next = || fields.next().unwrap_or_default();
        Self {
            page_path: next(),
            selector_context: next(),
            remote_url: next(),
            proposed_local_path: next(),
            alt_text: next(),
        }
    }
}

/// Quote a field when it contains a comma, quote or newline.
pub fn csv_escape(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Header line plus one line per row, newline terminated.
pub fn render_csv(rows: &[PlanRow]) -> String {
    let mut out = String::from(MANIFEST_HEADER);
    out.push('\n');
    for row in rows {
        let line: Vec<Cow<'_, str>> = row.fields().into_iter().map(csv_escape).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

/// Parse manifest content. The first record is the header; blank lines are
/// ignored and short records are padded with empty fields.
pub fn parse_csv(content: &str) -> Vec<PlanRow> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => record.push(std::mem::take(&mut field)),
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            other => field.push(other),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
        .into_iter()
        .skip(1)
        .filter(|r| !(r.len() == 1 && r[0].is_empty()))
        .map(PlanRow::from_fields)
        .collect()
}

pub fn read_manifest(path: &Path) -> Result<Vec<PlanRow>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Missing plan file: {}", path.display()))?;
    Ok(parse_csv(&content))
}

pub fn write_manifest(path: &Path, rows: &[PlanRow]) -> Result<()> {
    std::fs::write(path, render_csv(rows))
        .with_context(|| format!("Failed to write {}", path.display()))
}
