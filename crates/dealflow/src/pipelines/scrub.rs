//! List scrubbing: filters a raw county or marketing extract down to the
//! distressed-stock profile and appends a maximum allowable offer column.
//!
//! Scrubbing is stricter than outreach drafting. A row missing any of the
//! three criteria columns is dropped rather than priced at zero, and the
//! repair budget is heavier because nothing is known about condition yet.

use crate::columns::{bind_column, Binding, SchemaError};
use crate::config::LoadConfig;
use crate::pipelines::{cell, coerce_numeric, county_sqft_candidates, county_value_candidates};
use crate::table::writer::{self, WriteError};
use crate::table::{LeadTable, TableError, TableOrigin};
use crate::underwriting::{mao, DEFAULT_MARGIN, DEFAULT_TRANSACTION_FEE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Header appended for the computed offer ceiling. The outreach pipeline
/// recognizes it as an existing offer column, so a scrubbed export can be
/// fed straight back in.
pub const MAO_HEADER: &str = "MAO";

/// Accepted spellings for the construction-year column. County assessor
/// books call it `yr_impr`; marketing lists spell it out.
pub const YEAR_BUILT_CANDIDATES: &[&str] = &[
    "effective year built",
    "year built",
    "yr built",
    "yr impr",
    "yr blt",
];

/// Criteria and pricing knobs for a scrub run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrubRules {
    /// Builds in or after this year fall outside the buy box.
    pub year_built_cutoff: f64,
    /// Living area must exceed this to stay in.
    pub sqft_floor: f64,
    /// Share of market value kept after the wholesale discount.
    pub margin: f64,
    /// Repair budget per square foot, padded above the outreach rate since
    /// condition is unknown at this stage.
    pub repair_rate_per_sqft: f64,
    /// Fixed closing and assignment costs.
    pub transaction_fee: f64,
    /// Maximum rows exported; 0 means uncapped.
    pub export_cap: usize,
    /// Input columns carried into the export, resolved against the headers
    /// actually present. Empty keeps every input column.
    pub export_columns: Vec<String>,
}

impl Default for ScrubRules {
    fn default() -> Self {
        Self {
            year_built_cutoff: 1980.0,
            sqft_floor: 1500.0,
            margin: DEFAULT_MARGIN,
            repair_rate_per_sqft: 30.0,
            transaction_fee: DEFAULT_TRANSACTION_FEE,
            export_cap: 0,
            export_columns: Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScrubError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// The three criteria columns. All are mandatory; a list that cannot be
/// filtered should fail loudly instead of passing everything through.
#[derive(Debug, Clone)]
struct ScrubBindings {
    year_built: Binding,
    sqft: Binding,
    value: Binding,
}

impl ScrubBindings {
    fn resolve(headers: &[String]) -> Result<Self, SchemaError> {
        let year_built = bind_column(headers, YEAR_BUILT_CANDIDATES)
            .ok_or_else(|| SchemaError::for_role("year built", headers))?;
        let sqft = bind_column(headers, &county_sqft_candidates())
            .ok_or_else(|| SchemaError::for_role("sqft", headers))?;
        let value = bind_column(headers, &county_value_candidates())
            .ok_or_else(|| SchemaError::for_role("value", headers))?;

        Ok(Self {
            year_built,
            sqft,
            value,
        })
    }
}

/// Row accounting for a scrub run; every input row lands in exactly one
/// bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScrubReport {
    pub rows_read: usize,
    pub rows_missing_data: usize,
    pub rows_outside_criteria: usize,
    pub rows_exported: usize,
    pub export_capped: bool,
}

/// Filtered rows shaped for the export file.
#[derive(Debug)]
pub struct ScrubOutput {
    pub origin: TableOrigin,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub report: ScrubReport,
}

impl ScrubOutput {
    pub fn write_csv(&self, path: &Path) -> Result<(), WriteError> {
        writer::write_csv(path, &self.headers, &self.rows)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScrubPipeline {
    rules: ScrubRules,
}

impl ScrubPipeline {
    pub fn new(rules: ScrubRules) -> Self {
        Self { rules }
    }

    /// Loads, filters, and exports in one step.
    pub fn run_file(
        &self,
        input: &Path,
        output: &Path,
        load: &LoadConfig,
    ) -> Result<ScrubOutput, ScrubError> {
        let table = LeadTable::from_path(input, load)?;
        let scrubbed = self.process(&table)?;
        scrubbed.write_csv(output)?;
        Ok(scrubbed)
    }

    /// Keeps rows built before the cutoff with living area above the floor,
    /// in input order, and appends the MAO column.
    pub fn process(&self, table: &LeadTable) -> Result<ScrubOutput, ScrubError> {
        let bindings = ScrubBindings::resolve(table.headers())?;
        let export = self.export_bindings(table.headers());

        info!(
            year_built = %bindings.year_built.header,
            sqft = %bindings.sqft.header,
            value = %bindings.value.header,
            "scrub criteria columns resolved"
        );

        let mut headers: Vec<String> = export.iter().map(|b| b.header.clone()).collect();
        headers.push(MAO_HEADER.to_string());

        let mut report = ScrubReport {
            rows_read: table.row_count(),
            ..ScrubReport::default()
        };
        let mut rows: Vec<Vec<String>> = Vec::new();

        for row in table.rows() {
            if self.rules.export_cap != 0 && rows.len() >= self.rules.export_cap {
                report.export_capped = true;
                break;
            }

            let year = coerce_numeric(cell(row, bindings.year_built.index));
            let sqft = coerce_numeric(cell(row, bindings.sqft.index));
            let value = coerce_numeric(cell(row, bindings.value.index));
            let (year, sqft, value) = match (year, sqft, value) {
                (Some(year), Some(sqft), Some(value)) => (year, sqft, value),
                _ => {
                    report.rows_missing_data += 1;
                    continue;
                }
            };

            if year >= self.rules.year_built_cutoff || sqft <= self.rules.sqft_floor {
                report.rows_outside_criteria += 1;
                continue;
            }

            let offer_ceiling = mao(
                value,
                sqft * self.rules.repair_rate_per_sqft,
                self.rules.transaction_fee,
                self.rules.margin,
            );

            let mut export_row: Vec<String> = export
                .iter()
                .map(|binding| cell(row, binding.index).to_string())
                .collect();
            export_row.push(offer_ceiling.to_string());
            rows.push(export_row);
        }

        report.rows_exported = rows.len();
        if report.rows_missing_data > 0 {
            warn!(
                dropped = report.rows_missing_data,
                "rows dropped for unreadable year/sqft/value cells"
            );
        }
        info!(
            read = report.rows_read,
            exported = report.rows_exported,
            outside_criteria = report.rows_outside_criteria,
            capped = report.export_capped,
            "scrub complete"
        );

        Ok(ScrubOutput {
            origin: table.origin().clone(),
            headers,
            rows,
            report,
        })
    }

    /// Resolves the configured export columns against the input, keeping
    /// their configured order. Absent columns are skipped with a warning;
    /// an empty configuration keeps the whole input row.
    fn export_bindings(&self, headers: &[String]) -> Vec<Binding> {
        if self.rules.export_columns.is_empty() {
            return headers
                .iter()
                .enumerate()
                .map(|(index, header)| Binding {
                    header: header.clone(),
                    index,
                })
                .collect();
        }

        let mut bindings = Vec::new();
        for wanted in &self.rules.export_columns {
            match bind_column(headers, &[wanted.as_str()]) {
                Some(binding) => bindings.push(binding),
                None => warn!(column = %wanted, "export column not present in input; skipped"),
            }
        }
        bindings
    }
}
