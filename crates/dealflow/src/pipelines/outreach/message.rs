//! SMS draft templates.

use crate::format::money;

/// Blank owner cells greet "there" instead of producing "Hi ,".
pub(super) fn greeting_name(owner: &str) -> &str {
    let trimmed = owner.trim();
    if trimmed.is_empty() {
        "there"
    } else {
        trimmed
    }
}

pub(super) fn ask_condition_draft(owner: &str, address: &str) -> String {
    format!(
        "Hi {}, quick question about {} - is the home currently livable, or would \
         it need a full rehab/teardown? That one detail changes the range a lot.",
        greeting_name(owner),
        address
    )
}

pub(super) fn send_offer_draft(owner: &str, address: &str, offer: f64) -> String {
    format!(
        "Hi {}, I'm looking at {}. Based on current renovation costs, would you \
         consider an offer around {}?",
        greeting_name(owner),
        address,
        money(offer)
    )
}
