//! Dollar formatting shared by drafts and console summaries.

/// Rounds to whole dollars and renders with a `$` prefix and thousands
/// separators, the way the outreach drafts quote an offer.
pub fn money(amount: f64) -> String {
    format!("${}", thousands(amount.round() as i64))
}

pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (position, ch) in digits.chars().enumerate() {
        let remaining = digits.len() - position;
        if position > 0 && remaining % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(245_000), "245,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
        assert_eq!(thousands(-10_000), "-10,000");
    }

    #[test]
    fn money_rounds_to_whole_dollars() {
        assert_eq!(money(245_000.0), "$245,000");
        assert_eq!(money(69_999.6), "$70,000");
        assert_eq!(money(-10_000.0), "$-10,000");
    }
}
