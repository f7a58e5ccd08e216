//! Workbook ingestion via calamine. Only the first worksheet is read; lead
//! vendors ship single-sheet exports and the first sheet is the convention.

use super::{LeadTable, TableError, TableFormat, TableOrigin};
use crate::config::LoadConfig;
use calamine::{open_workbook_auto, Data, DataType, Reader};
use std::path::Path;
use tracing::warn;

pub(super) fn load(path: &Path, load: &LoadConfig) -> Result<LeadTable, TableError> {
    let source = path.display().to_string();

    let mut workbook = open_workbook_auto(path).map_err(|error| TableError::Workbook {
        path: source.clone(),
        reason: error.to_string(),
    })?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .unwrap_or_else(|| "Sheet1".to_string());

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableError::Workbook {
            path: source.clone(),
            reason: "workbook has no worksheets".to_string(),
        })?
        .map_err(|error| TableError::Workbook {
            path: source.clone(),
            reason: error.to_string(),
        })?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = match sheet_rows.next() {
        Some(row) => row.iter().map(render_cell).collect(),
        None => return Err(TableError::Empty { path: source }),
    };
    if headers.iter().all(|header| header.trim().is_empty()) {
        return Err(TableError::Empty { path: source });
    }

    let budget = load.row_budget();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut capped = false;

    for row in sheet_rows {
        if rows.len() >= budget {
            capped = true;
            break;
        }
        rows.push(row.iter().map(render_cell).collect());
    }

    if capped {
        warn!(source = %source, limit = budget, "row cap reached; remaining rows ignored");
    }

    Ok(LeadTable::from_parts(
        headers,
        rows,
        TableOrigin {
            source,
            format: TableFormat::Spreadsheet { sheet },
            skipped_records: 0,
            capped,
        },
    ))
}

/// String cells pass through; numeric, boolean, date and error cells fall
/// back to their display form so no value silently disappears.
fn render_cell(cell: &Data) -> String {
    cell.as_string()
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{}", cell))
}
