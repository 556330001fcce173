/// Best-effort integer coercion for scraped table cells ("1,234,567" -> 1234567).
/// Anything that does not parse after stripping commas and whitespace is absent.
pub fn parse_count(text: &str) -> Option<i64> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<i64>().ok()
}

/// Minor currency units to major units (1999 -> 19.99).
pub fn minor_to_major(minor: i64) -> f64 {
    minor as f64 / 100.0
}

/// Prices after the free-title rule: when both are absent and the title is free
/// both become zero.
pub fn settle_prices(
    is_free: bool,
    base: Option<f64>,
    current: Option<f64>,
) -> (Option<f64>, Option<f64>) {
    if is_free && base.is_none() && current.is_none() {
        (Some(0.0), Some(0.0))
    } else {
        (base, current)
    }
}

pub fn is_on_sale(discount_percent: Option<i64>) -> bool {
    discount_percent.is_some_and(|d| d > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_strip_commas_and_whitespace() {
        assert_eq!(parse_count("1,234,567"), Some(1_234_567));
        assert_eq!(parse_count("  42 "), Some(42));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("-"), None);
        assert_eq!(parse_count("12.5"), None);
        assert_eq!(parse_count("n/a"), None);
    }

    #[test]
    fn minor_units_become_dollars() {
        assert_eq!(minor_to_major(1999), 19.99);
        assert_eq!(minor_to_major(0), 0.0);
        assert_eq!(minor_to_major(6000), 60.0);
    }

    #[test]
    fn free_titles_without_prices_cost_zero() {
        assert_eq!(settle_prices(true, None, None), (Some(0.0), Some(0.0)));
        assert_eq!(settle_prices(false, None, None), (None, None));
        assert_eq!(settle_prices(true, Some(9.99), None), (Some(9.99), None));
    }

    #[test]
    fn only_positive_discounts_mean_on_sale() {
        assert!(!is_on_sale(None));
        assert!(!is_on_sale(Some(0)));
        assert!(is_on_sale(Some(25)));
    }
}
