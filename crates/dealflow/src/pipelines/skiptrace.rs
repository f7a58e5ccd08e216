//! Skip-trace preparation: reshapes a scrubbed list into the three-column
//! layout skip-trace vendors ingest, with addresses standardized to a full
//! mailing form.

use crate::columns::{bind_column, Binding, ColumnRole, SchemaError};
use crate::config::LoadConfig;
use crate::pipelines::{cell, county_value_candidates};
use crate::table::writer::{self, WriteError};
use crate::table::{LeadTable, TableError, TableOrigin};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Fixed vendor-facing header names. Whatever the input called its columns,
/// the export always uses these.
pub const EXPORT_ADDRESS_HEADER: &str = "Address";
pub const EXPORT_VALUE_HEADER: &str = "Value";
pub const EXPORT_MAO_HEADER: &str = "MAO";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkiptraceRules {
    /// City/state tail appended to bare street addresses. Lists pulled from
    /// a single county ship street-only addresses.
    pub locality_suffix: String,
}

impl Default for SkiptraceRules {
    fn default() -> Self {
        Self {
            locality_suffix: ", Houston, TX".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SkiptraceError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Address is the one mandatory column; value and offer ceiling ride along
/// when present so the vendor results can be matched back against pricing.
#[derive(Debug, Clone)]
struct SkiptraceBindings {
    address: Binding,
    value: Option<Binding>,
    mao: Option<Binding>,
}

impl SkiptraceBindings {
    fn resolve(headers: &[String]) -> Result<Self, SchemaError> {
        let address = ColumnRole::Address
            .bind(headers)
            .ok_or_else(|| SchemaError::for_role("address", headers))?;
        let value = bind_column(headers, &county_value_candidates());
        let mao = bind_column(headers, ColumnRole::Offer.candidates());

        Ok(Self {
            address,
            value,
            mao,
        })
    }
}

/// Appends the locality suffix to a bare street address. Already-complete
/// addresses pass through, and blank cells stay blank rather than becoming
/// a dangling ", Houston, TX".
fn standardize_address(raw: &str, suffix: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.ends_with(suffix) {
        return trimmed.to_string();
    }
    format!("{trimmed}{suffix}")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SkiptraceReport {
    pub rows_exported: usize,
    pub value_included: bool,
    pub mao_included: bool,
}

#[derive(Debug)]
pub struct SkiptraceOutput {
    pub origin: TableOrigin,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub report: SkiptraceReport,
}

impl SkiptraceOutput {
    pub fn write_csv(&self, path: &Path) -> Result<(), WriteError> {
        writer::write_csv(path, &self.headers, &self.rows)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkiptracePipeline {
    rules: SkiptraceRules,
}

impl SkiptracePipeline {
    pub fn new(rules: SkiptraceRules) -> Self {
        Self { rules }
    }

    /// Loads, reshapes, and exports in one step.
    pub fn run_file(
        &self,
        input: &Path,
        output: &Path,
        load: &LoadConfig,
    ) -> Result<SkiptraceOutput, SkiptraceError> {
        let table = LeadTable::from_path(input, load)?;
        let prepared = self.process(&table)?;
        prepared.write_csv(output)?;
        Ok(prepared)
    }

    /// Every input row yields exactly one output row, in order.
    pub fn process(&self, table: &LeadTable) -> Result<SkiptraceOutput, SkiptraceError> {
        let bindings = SkiptraceBindings::resolve(table.headers())?;

        info!(address = %bindings.address.header, "skip-trace address column resolved");
        if bindings.value.is_none() && bindings.mao.is_none() {
            warn!("no value or offer column found; export carries addresses only");
        }

        let mut headers = vec![EXPORT_ADDRESS_HEADER.to_string()];
        if bindings.value.is_some() {
            headers.push(EXPORT_VALUE_HEADER.to_string());
        }
        if bindings.mao.is_some() {
            headers.push(EXPORT_MAO_HEADER.to_string());
        }

        let rows: Vec<Vec<String>> = table
            .rows()
            .iter()
            .map(|row| {
                let mut out = vec![standardize_address(
                    cell(row, bindings.address.index),
                    &self.rules.locality_suffix,
                )];
                if let Some(value) = &bindings.value {
                    out.push(cell(row, value.index).trim().to_string());
                }
                if let Some(mao) = &bindings.mao {
                    out.push(cell(row, mao.index).trim().to_string());
                }
                out
            })
            .collect();

        let report = SkiptraceReport {
            rows_exported: rows.len(),
            value_included: bindings.value.is_some(),
            mao_included: bindings.mao.is_some(),
        };
        info!(rows = report.rows_exported, "skip-trace file prepared");

        Ok(SkiptraceOutput {
            origin: table.origin().clone(),
            headers,
            rows,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn table_from(raw: &str) -> LeadTable {
        LeadTable::from_reader(Cursor::new(raw), &LoadConfig::default()).expect("table parses")
    }

    fn prepare(raw: &str) -> SkiptraceOutput {
        SkiptracePipeline::default()
            .process(&table_from(raw))
            .expect("pipeline runs")
    }

    #[test]
    fn bare_street_addresses_gain_the_locality_suffix() {
        let output = prepare("site_addr_1,tot_mkt_val,MAO\n12 Oak St,200000,70000\n");

        assert_eq!(output.rows[0][0], "12 Oak St, Houston, TX");
    }

    #[test]
    fn complete_addresses_pass_through_unchanged() {
        let output = prepare(
            "Address\n\"12 Oak St, Houston, TX\"\n9 Elm St\n",
        );

        assert_eq!(output.rows[0][0], "12 Oak St, Houston, TX");
        assert_eq!(output.rows[1][0], "9 Elm St, Houston, TX");
    }

    #[test]
    fn blank_addresses_stay_blank() {
        let output = prepare("Address,Est Value\n,100000\n");

        assert_eq!(output.rows[0][0], "");
        assert_eq!(output.rows[0][1], "100000");
    }

    #[test]
    fn export_headers_are_vendor_fixed_names() {
        let output = prepare("site_addr_1,tot_mkt_val,mao\n12 Oak St,200000,70000\n");

        assert_eq!(output.headers, ["Address", "Value", "MAO"]);
        assert_eq!(output.rows[0], ["12 Oak St, Houston, TX", "200000", "70000"]);
        assert!(output.report.value_included);
        assert!(output.report.mao_included);
    }

    #[test]
    fn optional_columns_are_omitted_when_absent() {
        let output = prepare("Property Address\n12 Oak St\n");

        assert_eq!(output.headers, ["Address"]);
        assert_eq!(output.rows[0].len(), 1);
        assert!(!output.report.value_included);
        assert!(!output.report.mao_included);
    }

    #[test]
    fn row_order_and_count_are_preserved() {
        let output = prepare("Address\n1 A St\n2 B St\n3 C St\n");

        assert_eq!(output.report.rows_exported, 3);
        assert_eq!(output.rows[1][0], "2 B St, Houston, TX");
    }

    #[test]
    fn missing_address_column_is_a_schema_error() {
        let table = table_from("tot_mkt_val,MAO\n200000,70000\n");
        let err = SkiptracePipeline::default()
            .process(&table)
            .expect_err("address is mandatory");

        match err {
            SkiptraceError::Schema(schema) => assert_eq!(schema.role, "address"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn custom_suffix_flows_through() {
        let pipeline = SkiptracePipeline::new(SkiptraceRules {
            locality_suffix: ", Dallas, TX".to_string(),
        });
        let output = pipeline
            .process(&table_from("Address\n4 Main St\n"))
            .expect("pipeline runs");

        assert_eq!(output.rows[0][0], "4 Main St, Dallas, TX");
    }

    #[test]
    fn suffix_standardization_trims_first() {
        assert_eq!(
            standardize_address("  12 Oak St  ", ", Houston, TX"),
            "12 Oak St, Houston, TX"
        );
        assert_eq!(standardize_address("   ", ", Houston, TX"), "");
    }
}
