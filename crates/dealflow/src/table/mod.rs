//! Tabular input handling for lead lists.
//!
//! Everything downstream works on a [`LeadTable`]: an owned header row plus
//! string cells, with every row padded or truncated to the header width.
//! Values stay untyped here; coercion happens where a pipeline needs numbers.

use crate::config::LoadConfig;
use std::io::Read;
use std::path::Path;

mod reader;
mod spreadsheet;
pub mod writer;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// How the table arrived on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableFormat {
    Delimited { delimiter: u8 },
    Spreadsheet { sheet: String },
}

impl TableFormat {
    pub fn describe(&self) -> String {
        match self {
            Self::Delimited { delimiter } => {
                format!("delimited text ('{}' separated)", char::from(*delimiter))
            }
            Self::Spreadsheet { sheet } => format!("spreadsheet (sheet '{sheet}')"),
        }
    }
}

/// Provenance carried alongside the parsed cells, surfaced in logs and the
/// optional header audit.
#[derive(Debug, Clone)]
pub struct TableOrigin {
    pub source: String,
    pub format: TableFormat,
    pub skipped_records: usize,
    pub capped: bool,
}

#[derive(Debug)]
pub struct LeadTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    origin: TableOrigin,
}

impl LeadTable {
    /// Loads a lead list, dispatching on file extension: known workbook
    /// extensions go through calamine, everything else is treated as
    /// delimited text with the separator sniffed from a sample.
    pub fn from_path(path: &Path, load: &LoadConfig) -> Result<Self, TableError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some(ext) if SPREADSHEET_EXTENSIONS.contains(&ext) => spreadsheet::load(path, load),
            _ => reader::load(path, load),
        }
    }

    /// Reads delimited text from any reader, with the same decoding and
    /// separator sniffing as [`LeadTable::from_path`].
    pub fn from_reader<R: Read>(mut input: R, load: &LoadConfig) -> Result<Self, TableError> {
        let mut bytes = Vec::new();
        input
            .read_to_end(&mut bytes)
            .map_err(|source| TableError::Open {
                path: reader::MEMORY_SOURCE.to_string(),
                source,
            })?;
        reader::from_bytes(&bytes, reader::MEMORY_SOURCE.to_string(), load)
    }

    /// Pads short rows with empty cells so every row matches the header
    /// width. Over-wide rows never reach here; the parsers reject them.
    pub(crate) fn from_parts(
        headers: Vec<String>,
        mut rows: Vec<Vec<String>>,
        origin: TableOrigin,
    ) -> Self {
        let width = headers.len();
        for row in &mut rows {
            if row.len() < width {
                row.resize(width, String::new());
            }
        }

        Self {
            headers,
            rows,
            origin,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn origin(&self) -> &TableOrigin {
        &self.origin
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of an exact header as stored, for cell lookups once a
    /// binding has been resolved.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|name| name == header)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("could not open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not read workbook {path}: {reason}")]
    Workbook { path: String, reason: String },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("{path} has no header row")]
    Empty { path: String },
}
