//! Phone normalization for SMS-ready exports.

/// Reduces a raw phone cell to `(AAA) BBB-CCCC` when it holds a ten-digit
/// NANP number, optionally prefixed with a country "1". Anything else passes
/// through trimmed: a malformed or international number is better left for
/// a human than mangled by a guess.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();

    let mut digits: String = trimmed.chars().filter(|ch| ch.is_ascii_digit()).collect();
    if digits.len() == 11 && digits.starts_with('1') {
        digits.remove(0);
    }

    if digits.len() == 10 {
        format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        trimmed.to_string()
    }
}
