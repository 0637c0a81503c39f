//! Number formatting for dashboard metrics.
//!
//! Magnitudes are shortened by dividing by 1000 through a fixed scale of
//! Portuguese unit words: none, "mil", then "milhões" for everything above.

/// Units for each division by 1000, before the final "milhões" bucket.
const SCALE: [&str; 2] = ["", "mil"];

/// Unit used once the value has been divided past the scale.
const LAST_UNIT: &str = "milhões";

/// Currency prefix used for revenue metrics.
pub const CURRENCY_PREFIX: &str = "R$";

/// Format a magnitude with two decimals and a unit suffix.
///
/// `prefix` is placed in front, separated by a space, when non-empty.
/// Example: 1500.0 -> "1.50 mil", 500.0 -> "500.00 ".
pub fn format_number(value: f64, prefix: &str) -> String {
    let mut value = value;
    for unit in SCALE {
        if value < 1000.0 {
            return with_prefix(prefix, value, unit);
        }
        value /= 1000.0;
    }
    with_prefix(prefix, value, LAST_UNIT)
}

/// Revenue metric with the currency prefix.
pub fn format_revenue(value: f64) -> String {
    format_number(value, CURRENCY_PREFIX)
}

/// Sale count metric.
pub fn format_count(count: usize) -> String {
    format_number(count as f64, "")
}

fn with_prefix(prefix: &str, value: f64, unit: &str) -> String {
    if prefix.is_empty() {
        format!("{:.2} {}", value, unit)
    } else {
        format!("{} {:.2} {}", prefix, value, unit)
    }
}
