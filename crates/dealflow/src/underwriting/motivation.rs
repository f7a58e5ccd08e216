//! Seller motivation heuristics from ownership tenure.

/// Score plus the human-readable flags that earned it. Flags appear in
/// qualify output verbatim, so the wording is part of the contract with
/// the acquisitions team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotivationScore {
    pub score: u8,
    pub flags: Vec<&'static str>,
}

pub const LONG_OWNERSHIP_FLAG: &str = "Long Ownership (>10 Yrs)";
pub const HIGH_EQUITY_FLAG: &str = "High Equity (Likely Paid Off)";

/// Long tenure signals willingness to sell; very long tenure usually means
/// the mortgage is retired, which widens the negotiable range.
pub fn assess(ownership_years: u32) -> MotivationScore {
    let mut score = 0;
    let mut flags = Vec::new();

    if ownership_years >= 10 {
        score += 1;
        flags.push(LONG_OWNERSHIP_FLAG);
    }
    if ownership_years >= 15 {
        score += 1;
        flags.push(HIGH_EQUITY_FLAG);
    }

    MotivationScore { score, flags }
}
