//! Offer computation and action classification.

use crate::pipelines::coerce_numeric;
use serde::{Deserialize, Serialize};

/// Numeric knobs for the outreach offer math. All pricing behavior flows
/// from this struct; nothing is hard-coded at the call sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRules {
    /// Share of estimated value kept after the wholesale discount.
    pub margin: f64,
    /// Repair budget per square foot when a sqft column is available.
    pub repair_rate_per_sqft: f64,
    /// Repair budget as a share of value when no sqft column exists.
    pub fallback_repair_ratio: f64,
    /// Fixed closing and assignment costs.
    pub transaction_fee: f64,
    /// Offers at or above this amount go straight to SEND_OFFER.
    pub send_offer_threshold: f64,
}

impl Default for OfferRules {
    fn default() -> Self {
        Self {
            margin: 0.70,
            repair_rate_per_sqft: 25.0,
            fallback_repair_ratio: 0.30,
            transaction_fee: 10_000.0,
            send_offer_threshold: 80_000.0,
        }
    }
}

/// Which branch produced the offers for a run. Decided once per run from
/// the resolved bindings, never per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferBasis {
    /// The input already carries an offer column; rows are coerced as-is.
    Existing,
    /// Offers are derived from value (and sqft when bound).
    Heuristic,
}

impl OfferBasis {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Existing => "existing offer column",
            Self::Heuristic => "value-based heuristic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferAction {
    AskCondition,
    SendOffer,
}

impl OfferAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::AskCondition => "ASK_CONDITION",
            Self::SendOffer => "SEND_OFFER",
        }
    }
}

/// Branch 1: a non-numeric cell means this row has no offer, not a zero
/// offer. Each row is judged on its own cell.
pub(super) fn existing_offer(cell: &str) -> Option<f64> {
    coerce_numeric(cell)
}

/// Branch 2: missing value or sqft cells default to zero so the formula
/// always yields a number, even a deeply negative one.
pub(super) fn heuristic_offer(value_cell: &str, sqft_cell: Option<&str>, rules: &OfferRules) -> f64 {
    let value = coerce_numeric(value_cell).unwrap_or(0.0);
    let repairs = match sqft_cell {
        Some(cell) => coerce_numeric(cell).unwrap_or(0.0) * rules.repair_rate_per_sqft,
        None => value * rules.fallback_repair_ratio,
    };

    value * rules.margin - repairs - rules.transaction_fee
}

/// The threshold is inclusive: an offer of exactly the threshold is strong
/// enough to send.
pub fn classify(offer: Option<f64>, rules: &OfferRules) -> OfferAction {
    match offer {
        Some(amount) if amount >= rules.send_offer_threshold => OfferAction::SendOffer,
        _ => OfferAction::AskCondition,
    }
}
