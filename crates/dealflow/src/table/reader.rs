//! Delimited-text parsing with encoding and separator detection.

use super::{LeadTable, TableError, TableFormat, TableOrigin};
use crate::config::LoadConfig;
use std::path::Path;
use tracing::warn;

pub(super) const MEMORY_SOURCE: &str = "<memory>";

const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];
const SAMPLE_LINES: usize = 10;

pub(super) fn load(path: &Path, load: &LoadConfig) -> Result<LeadTable, TableError> {
    let source = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|err| TableError::Open {
        path: source.clone(),
        source: err,
    })?;

    from_bytes(&bytes, source, load)
}

pub(super) fn from_bytes(
    bytes: &[u8],
    source: String,
    load: &LoadConfig,
) -> Result<LeadTable, TableError> {
    let content = decode(bytes);
    let delimiter = detect_delimiter(&content);
    parse(&content, delimiter, source, load)
}

/// UTF-8 when the bytes allow it, otherwise Latin-1 (every byte maps to the
/// code point of the same value, so no input is ever rejected outright).
fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&byte| char::from(byte)).collect(),
    }
}

/// Scores each candidate separator by per-line count consistency over a small
/// sample: high average count and low spread win. Falls back to comma.
fn detect_delimiter(content: &str) -> u8 {
    let sample_lines: Vec<&str> = content.lines().take(SAMPLE_LINES).collect();
    if sample_lines.is_empty() {
        return b',';
    }

    let mut best_delimiter = b',';
    let mut best_score = 0.0f32;

    for &delimiter in &DELIMITER_CANDIDATES {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| line.bytes().filter(|&b| b == delimiter).count())
            .collect();

        let avg = counts.iter().sum::<usize>() as f32 / counts.len() as f32;
        let variance = counts
            .iter()
            .map(|&count| (count as f32 - avg).powi(2))
            .sum::<f32>()
            / counts.len() as f32;

        let score = avg / (1.0 + variance.sqrt());
        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}

fn parse(
    content: &str,
    delimiter: u8,
    source: String,
    load: &LoadConfig,
) -> Result<LeadTable, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|err| TableError::Parse {
            path: source.clone(),
            source: err,
        })?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.iter().all(|header| header.is_empty()) {
        return Err(TableError::Empty { path: source });
    }

    let width = headers.len();
    let budget = load.row_budget();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut skipped_records = 0usize;
    let mut capped = false;

    for record in csv_reader.records() {
        if rows.len() >= budget {
            capped = true;
            break;
        }

        match record {
            Ok(record) if record.len() > width => {
                skipped_records += 1;
                warn!(
                    source = %source,
                    fields = record.len(),
                    expected = width,
                    "skipping record with more fields than the header"
                );
            }
            Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
            Err(error) => {
                skipped_records += 1;
                warn!(source = %source, %error, "skipping unreadable record");
            }
        }
    }

    if capped {
        warn!(source = %source, limit = budget, "row cap reached; remaining records ignored");
    }
    if skipped_records > 0 {
        warn!(source = %source, skipped_records, "some records were skipped");
    }

    Ok(LeadTable::from_parts(
        headers,
        rows,
        TableOrigin {
            source,
            format: TableFormat::Delimited { delimiter },
            skipped_records,
            capped,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_content_decodes_as_is() {
        assert_eq!(decode("Owner,Città".as_bytes()), "Owner,Città");
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        let bytes = [b'J', b'o', b's', 0xe9];
        assert_eq!(decode(&bytes), "Jos\u{e9}");
    }

    #[test]
    fn comma_wins_on_plain_lists() {
        assert_eq!(detect_delimiter("a,b,c\nd,e,f\n"), b',');
    }

    #[test]
    fn semicolon_wins_when_more_consistent() {
        assert_eq!(detect_delimiter("a;b;c\nd;e;f\n"), b';');
    }

    #[test]
    fn pipe_and_tab_are_recognized() {
        assert_eq!(detect_delimiter("a|b|c\nd|e|f\n"), b'|');
        assert_eq!(detect_delimiter("a\tb\nc\td\n"), b'\t');
    }

    #[test]
    fn empty_content_defaults_to_comma() {
        assert_eq!(detect_delimiter(""), b',');
    }

    #[test]
    fn inconsistent_counts_lose_to_steady_ones() {
        // Commas appear often but unevenly; semicolons are steady.
        let content = "a;b,,,,\nc;d\ne;f,\n";
        assert_eq!(detect_delimiter(content), b';');
    }
}
