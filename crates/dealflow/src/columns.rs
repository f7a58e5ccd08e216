//! Header-to-role resolution for messy vendor exports.
//!
//! Marketing lists and county extracts never agree on column names, so each
//! semantic role carries an ordered list of acceptable header spellings and
//! one generic picker walks that list. List order encodes priority among
//! synonyms; adding a spelling never touches control flow.

use serde::Serialize;
use std::collections::HashMap;

/// Semantic roles the outreach pipeline binds to input columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Owner,
    Address,
    Phone,
    Offer,
    Value,
    Sqft,
}

impl ColumnRole {
    pub const ALL: [Self; 6] = [
        Self::Owner,
        Self::Address,
        Self::Phone,
        Self::Offer,
        Self::Value,
        Self::Sqft,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::Offer => "offer",
            Self::Value => "value",
            Self::Sqft => "sqft",
        }
    }

    /// Ordered header spellings accepted for this role; earlier wins.
    pub const fn candidates(self) -> &'static [&'static str] {
        match self {
            Self::Owner => &[
                "owner name",
                "first name",
                "matched first name",
                "owner firstname",
                "owner first name",
            ],
            Self::Address => &["property address", "address", "site address", "site addr 1"],
            Self::Phone => &[
                "mobile number",
                "owner mobile 1",
                "owner mobile",
                "phone",
                "owner phone",
            ],
            Self::Offer => &[
                "mao (your offer)",
                "mao",
                "offer",
                "offer proxy",
                "initial offer",
            ],
            Self::Value => &[
                "est value",
                "estimated value",
                "total assessed value",
                "assessed value",
                "market value",
            ],
            Self::Sqft => &["building sqft", "sqft", "living area", "building sq ft"],
        }
    }

    /// Binds this role against a header row, applying the phone fallbacks
    /// where they exist.
    pub fn bind(self, headers: &[String]) -> Option<Binding> {
        match self {
            Self::Phone => bind_phone_column(headers),
            role => bind_column(headers, role.candidates()),
        }
    }
}

const PHONE_HINTS: &[&str] = &["phone", "mobile"];
const PHONE_LAST_RESORT: &[&str] = &["relative", "pager", "landline"];
const PHONE_LIKE_TOKENS: &[&str] = &["phone", "mobile", "number", "tel", "cell"];

/// A resolved header with its column position. The index points at the
/// rightmost occurrence so exact duplicate headers behave like the
/// case-insensitive collision rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub header: String,
    pub index: usize,
}

pub fn bind_column(headers: &[String], candidates: &[&str]) -> Option<Binding> {
    let header = pick_column(headers, candidates)?;
    let index = headers.iter().rposition(|name| name == header)?;
    Some(Binding {
        header: header.to_string(),
        index,
    })
}

pub fn bind_phone_column(headers: &[String]) -> Option<Binding> {
    let header = pick_phone_column(headers)?;
    let index = headers.iter().rposition(|name| name == header)?;
    Some(Binding {
        header: header.to_string(),
        index,
    })
}

/// Raised when a mandatory role cannot be bound to any header.
#[derive(Debug, thiserror::Error)]
#[error("no usable {role} column detected; headers present: {available:?}")]
pub struct SchemaError {
    pub role: &'static str,
    pub available: Vec<String>,
}

impl SchemaError {
    pub(crate) fn for_role(role: &'static str, headers: &[String]) -> Self {
        Self {
            role,
            available: headers.to_vec(),
        }
    }
}

/// Strips BOM and zero-width characters that spreadsheet exports leave on the
/// first header, folds underscores into spaces (assessor extracts ship
/// `tot_mkt_val` style names), collapses whitespace runs, and lowercases.
pub fn normalize_header(raw: &str) -> String {
    let cleaned = raw.replace(['\u{feff}', '\u{200b}'], "").replace('_', " ");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// Returns the first candidate that matches any header, comparing normalized
/// names. When two headers collide case-insensitively the later one wins,
/// matching how the lookup map is built in header order.
pub fn pick_column<'h>(headers: &'h [String], candidates: &[&str]) -> Option<&'h str> {
    let mut by_normalized: HashMap<String, &'h str> = HashMap::with_capacity(headers.len());
    for header in headers {
        by_normalized.insert(normalize_header(header), header.as_str());
    }

    candidates
        .iter()
        .find_map(|candidate| by_normalized.get(&normalize_header(candidate)).copied())
}

/// Phone resolution with fuzzy fallbacks: the candidate list first, then any
/// header mentioning "phone"/"mobile" (in header order), then skip-trace
/// style headers that pair relative/pager/landline with a phone-like token.
pub fn pick_phone_column<'h>(headers: &'h [String]) -> Option<&'h str> {
    if let Some(exact) = pick_column(headers, ColumnRole::Phone.candidates()) {
        return Some(exact);
    }

    let hinted = headers.iter().find(|header| {
        let normalized = normalize_header(header);
        PHONE_HINTS.iter().any(|hint| normalized.contains(hint))
    });
    if let Some(header) = hinted {
        return Some(header.as_str());
    }

    headers
        .iter()
        .find(|header| {
            let normalized = normalize_header(header);
            PHONE_LAST_RESORT.iter().any(|kind| normalized.contains(kind))
                && PHONE_LIKE_TOKENS
                    .iter()
                    .any(|token| normalized.contains(token))
        })
        .map(String::as_str)
}
