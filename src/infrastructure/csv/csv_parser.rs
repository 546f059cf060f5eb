// ============================================================
// SURVEY CSV PARSER
// ============================================================
// Parse spreadsheet survey exports with delimiter and encoding detection

use std::path::Path;

use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::domain::survey::SurveyRow;

/// Parser for survey exports.
///
/// The format is looser than RFC 4180: a `"` only toggles quoting and is
/// dropped, so `""` inside a quoted field is not unescaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurveyCsvParser;

impl SurveyCsvParser {
    pub fn new() -> Self {
        Self
    }

    /// Read a survey file from disk and parse it
    pub fn parse_file(&self, path: &Path) -> Result<Vec<SurveyRow>> {
        let bytes = std::fs::read(path).map_err(|e| {
            AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Ok(self.parse_content(&Self::decode_bytes(&bytes)))
    }

    /// Parse CSV text into respondent rows.
    ///
    /// Returns an empty list when there is no data line. Data lines with
    /// fewer fields than the header are dropped.
    pub fn parse_content(&self, content: &str) -> Vec<SurveyRow> {
        let lines: Vec<&str> = content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !trim_cell(line).is_empty())
            .collect();

        if lines.len() < 2 {
            return Vec::new();
        }

        let delimiter = Self::detect_delimiter(lines[0]);
        let headers = Self::split_fields(lines[0], delimiter);

        let mut rows = Vec::with_capacity(lines.len() - 1);
        let mut dropped = 0usize;

        for line in &lines[1..] {
            let values = Self::split_fields(line, delimiter);
            if values.len() < headers.len() {
                dropped += 1;
                continue;
            }

            let mut row = SurveyRow::new();
            for (header, value) in headers.iter().zip(values) {
                if !header.is_empty() {
                    row.insert(header.as_str(), value);
                }
            }
            rows.push(row);
        }

        debug!(
            rows = rows.len(),
            dropped,
            delimiter = %delimiter,
            "Parsed survey CSV"
        );

        rows
    }

    /// Pick `;` when the header line has strictly more semicolons than commas
    pub fn detect_delimiter(header_line: &str) -> char {
        let commas = header_line.matches(',').count();
        let semicolons = header_line.matches(';').count();

        if semicolons > commas {
            ';'
        } else {
            ','
        }
    }

    /// Split one line, honouring double-quoted sections
    pub fn split_fields(line: &str, delimiter: char) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;

        for ch in line.chars() {
            if ch == '"' {
                in_quotes = !in_quotes;
            } else if ch == delimiter && !in_quotes {
                fields.push(clean_field(&current));
                current.clear();
            } else {
                current.push(ch);
            }
        }
        fields.push(clean_field(&current));

        fields
    }

    /// Decode file bytes: UTF-8 (BOM stripped), falling back to Windows-1257
    /// for legacy Baltic exports
    pub fn decode_bytes(bytes: &[u8]) -> String {
        let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
        if !had_errors {
            return text.into_owned();
        }

        debug!("Survey file is not valid UTF-8, decoding as Windows-1257");
        let (text, _, _) = encoding_rs::WINDOWS_1257.decode(bytes);
        text.into_owned()
    }
}

/// Trim whitespace, including a stray byte-order mark
fn trim_cell(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

fn clean_field(raw: &str) -> String {
    let trimmed = trim_cell(raw);
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    trimmed.to_string()
}
