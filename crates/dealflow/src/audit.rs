//! Header audit side files.
//!
//! A JSON snapshot of what the loader saw and how each column role resolved,
//! written next to a pipeline export. When a vendor list binds oddly this is
//! the first thing to look at.

use crate::columns::ColumnRole;
use crate::table::LeadTable;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("could not serialize header audit: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
    #[error("could not write header audit {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// How one role resolved. Unbound roles are recorded too; their absence is
/// usually the interesting part.
#[derive(Debug, Serialize)]
pub struct RoleBinding {
    pub role: ColumnRole,
    pub header: Option<String>,
    pub column: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HeaderAudit {
    pub source: String,
    pub format: String,
    pub headers: Vec<String>,
    pub skipped_records: usize,
    pub capped: bool,
    pub bindings: Vec<RoleBinding>,
    pub generated_at: DateTime<Utc>,
}

impl HeaderAudit {
    /// Probes every column role against the table as loaded.
    pub fn capture(table: &LeadTable) -> Self {
        let origin = table.origin();
        let bindings = ColumnRole::ALL
            .iter()
            .map(|&role| {
                let bound = role.bind(table.headers());
                RoleBinding {
                    role,
                    header: bound.as_ref().map(|binding| binding.header.clone()),
                    column: bound.map(|binding| binding.index),
                }
            })
            .collect();

        Self {
            source: origin.source.clone(),
            format: origin.format.describe(),
            headers: table.headers().to_vec(),
            skipped_records: origin.skipped_records,
            capped: origin.capped,
            bindings,
            generated_at: Utc::now(),
        }
    }

    pub fn write(&self, path: &Path) -> Result<(), AuditError> {
        let json =
            serde_json::to_string_pretty(self).map_err(|source| AuditError::Serialize { source })?;
        std::fs::write(path, json).map_err(|source| AuditError::Write {
            path: path.display().to_string(),
            source,
        })
    }
}
