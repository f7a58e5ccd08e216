//! The three lead pipelines: outreach drafting, list scrubbing, and
//! skip-trace preparation. Each one resolves its column roles, transforms
//! rows, and writes a CSV export.

use crate::columns::ColumnRole;

pub mod outreach;
pub mod scrub;
pub mod skiptrace;

/// Assessor-book spellings the county-facing pipelines accept on top of the
/// shared role lists.
const COUNTY_SQFT_HEADER: &str = "bld ar";
const COUNTY_VALUE_HEADER: &str = "tot mkt val";

pub(crate) fn county_sqft_candidates() -> Vec<&'static str> {
    let mut list = ColumnRole::Sqft.candidates().to_vec();
    list.push(COUNTY_SQFT_HEADER);
    list
}

pub(crate) fn county_value_candidates() -> Vec<&'static str> {
    let mut list = ColumnRole::Value.candidates().to_vec();
    list.push(COUNTY_VALUE_HEADER);
    list
}

/// Strict numeric coercion shared by every pipeline. Surrounding whitespace
/// is tolerated; currency symbols and thousands separators are not, so
/// "$245,000" is missing data rather than a guessed number.
pub(crate) fn coerce_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed.parse::<f64>().ok()
}

/// Cell lookup against a padded row. Bindings always point inside the
/// header width, but a plain empty string beats a panic on a stray row.
pub(crate) fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}
