//! Deal underwriting math: maximum allowable offer, risk-tier margins,
//! component repair estimates, and seller-motivation scoring.
//!
//! Everything here is pure arithmetic over explicit inputs so the qualify
//! command and the scrub pipeline share one set of numbers.

pub mod motivation;
pub mod repairs;

pub const DEFAULT_MARGIN: f64 = 0.70;
pub const DEFAULT_TRANSACTION_FEE: f64 = 10_000.0;

/// Repair bids routinely come in over the walkthrough estimate; expert
/// underwriting pads them before the offer math.
pub const REPAIR_CONTINGENCY: f64 = 1.15;

/// Maximum allowable offer: after-repair value discounted by the margin,
/// less repairs and the fixed transaction fee.
pub fn mao(arv: f64, repairs: f64, fee: f64, margin: f64) -> f64 {
    arv * margin - repairs - fee
}

/// Margin schedule by acquisition risk appetite. Tier 1 pays the most,
/// tier 3 the least; unknown tiers get the standard margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTier {
    Aggressive,
    Standard,
    Conservative,
}

impl RiskTier {
    pub fn from_number(tier: u8) -> Self {
        match tier {
            1 => Self::Aggressive,
            3 => Self::Conservative,
            _ => Self::Standard,
        }
    }

    pub fn margin(self) -> f64 {
        match self {
            Self::Aggressive => 0.80,
            Self::Standard => 0.70,
            Self::Conservative => 0.60,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::Standard => "standard",
            Self::Conservative => "conservative",
        }
    }
}

/// Tiered offer with the repair contingency applied.
pub fn expert_mao(arv: f64, repairs: f64, fee: f64, tier: RiskTier) -> f64 {
    mao(arv, repairs * REPAIR_CONTINGENCY, fee, tier.margin())
}

/// Plain-language rationale an acquisitions agent can paste into a reply.
pub fn offer_justification(year_built: u32, sqft: f64, offer: f64) -> String {
    format!(
        "Homes built in {year_built} at roughly {sqft:.0} sqft typically need full \
         mechanical and cosmetic updates. Pricing that work at current contractor \
         rates, we can support an offer of {}.",
        crate::format::money(offer)
    )
}
