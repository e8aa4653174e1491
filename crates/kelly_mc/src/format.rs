/// Insert thousands separators into a whole number
fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a wealth amount with two decimals, e.g. `1,234.56`
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let cents_total = (value.abs() * 100.0).round() as u64;
    let whole = cents_total / 100;
    let cents = cents_total % 100;
    let sign = if value < 0.0 && cents_total > 0 { "-" } else { "" };
    format!("{sign}{}.{cents:02}", group_thousands(whole))
}

/// Format a fraction as a percentage, e.g. `0.1234` → `12.34%`
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Format a stake fraction, e.g. `0.25` → `0.2500`
pub fn format_fraction(value: f64) -> String {
    format!("{value:.4}")
}

/// Format an optional ratio, `n/a` when undefined
pub fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3}"),
        None => "n/a".to_string(),
    }
}

/// Label for a percentile given as a fraction, e.g. `0.05` → `P5`
pub fn percentile_label(p: f64) -> String {
    let pct = p * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("P{}", pct.round() as i64)
    } else {
        format!("P{pct:.1}")
    }
}
