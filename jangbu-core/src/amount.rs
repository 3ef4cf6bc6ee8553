//! Amount parsing and formatting (whole KRW, no minor units).

/// Parse a bank-export amount string.
///
/// Strips separators and currency marks (`,`, `원`, `₩`, whitespace).
/// Malformed values parse as 0 — the row is kept and falls through to the
/// other-income/other-expense classifier fallback rather than being dropped.
pub fn parse_amount(raw: &str) -> i64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '원' | '₩') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return 0;
    }
    if let Ok(v) = cleaned.parse::<i64>() {
        return v;
    }
    // Some exports carry a fractional tail ("5000.00").
    cleaned
        .parse::<f64>()
        .map(|v| if v.is_finite() { v.round() as i64 } else { 0 })
        .unwrap_or(0)
}

/// Format an amount with thousands separators; negatives in parentheses,
/// the way the published statement prints them.
pub fn format_amount(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("({grouped})")
    } else {
        grouped
    }
}
