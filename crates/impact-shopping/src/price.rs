//! Price and shipping normalization.
//!
//! Provider prices arrive either as numbers or as locale-formatted text
//! (`"1 129,00 $"`, `"$24.99"`). Everything here is total: malformed input
//! degrades to `0.0` rather than failing the comparison.

use serde::{Deserialize, Serialize};

/// Label shown when shipping is free.
pub const FREE_SHIPPING_LABEL: &str = "Gratuit";

/// Label shown when the shipping cost cannot be determined.
pub const UNKNOWN_SHIPPING_LABEL: &str = "Livraison inconnue";

/// A raw price as sent by the provider.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(f64),
    Text(String),
}

impl PriceValue {
    /// Text suitable for display. Numbers are rendered with two decimals.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            PriceValue::Number(n) => format_amount(*n),
            PriceValue::Text(text) => text.clone(),
        }
    }
}

/// Normalized shipping cost and its display label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shipping {
    pub cost: f64,
    pub label: String,
}

impl Shipping {
    fn free() -> Self {
        Self {
            cost: 0.0,
            label: FREE_SHIPPING_LABEL.to_string(),
        }
    }

    fn unknown() -> Self {
        Self {
            cost: 0.0,
            label: UNKNOWN_SHIPPING_LABEL.to_string(),
        }
    }
}

/// Converts a provider price into a finite, non-negative number.
///
/// Numbers pass through (non-finite or negative become `0.0`); text goes
/// through [`parse_price_text`].
#[must_use]
pub fn normalize_price(value: &PriceValue) -> f64 {
    match value {
        PriceValue::Number(n) if n.is_finite() && *n >= 0.0 => *n,
        PriceValue::Number(_) => 0.0,
        PriceValue::Text(text) => parse_price_text(text),
    }
}

/// Parses locale-formatted price text.
///
/// Keeps only digits and separators, treats commas as decimal points, and
/// when several separators remain keeps only the last one as the decimal
/// point (`"1.129.00"` is read as `1129.00`). Trailing separators are
/// dropped first so `"15.00."` reads as `15.00`. Anything that still fails
/// to parse yields `0.0`.
#[must_use]
pub fn parse_price_text(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    let cleaned = cleaned.trim_end_matches('.');

    let candidate = match cleaned.rfind('.') {
        Some(last) if cleaned[..last].contains('.') => {
            let mut joined: String = cleaned[..last].chars().filter(|c| *c != '.').collect();
            joined.push_str(&cleaned[last..]);
            joined
        }
        _ => cleaned.to_string(),
    };

    candidate
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Interprets free-text shipping information.
///
/// - absent or blank: unknown, cost `0`
/// - contains "free" / "gratuit" (any case): free, cost `0`
/// - contains digits: that amount, labelled `"+ N.NN $"` (a parsed zero is free)
/// - anything else: unknown, cost `0`
#[must_use]
pub fn parse_shipping(text: Option<&str>) -> Shipping {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Shipping::unknown();
    };

    let lower = text.to_lowercase();
    if lower.contains("free") || lower.contains("gratuit") {
        return Shipping::free();
    }

    if !text.chars().any(|c| c.is_ascii_digit()) {
        return Shipping::unknown();
    }

    let cost = parse_price_text(text);
    if cost <= 0.0 {
        return Shipping::free();
    }

    Shipping {
        cost,
        label: format!("+ {}", format_amount(cost)),
    }
}

/// Item price plus shipping, rounded to cents. Always finite.
#[must_use]
pub fn total_price(price: f64, shipping: &Shipping) -> f64 {
    let total = price + shipping.cost;
    if !total.is_finite() {
        return 0.0;
    }
    let cents = (total * 100.0).round() / 100.0;
    if cents.is_finite() {
        cents
    } else {
        total
    }
}

fn format_amount(amount: f64) -> String {
    format!("{amount:.2} $")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_pass_through() {
        assert!((normalize_price(&PriceValue::Number(24.99)) - 24.99).abs() < f64::EPSILON);
    }

    #[test]
    fn non_finite_and_negative_numbers_become_zero() {
        assert_eq!(normalize_price(&PriceValue::Number(f64::NAN)), 0.0);
        assert_eq!(normalize_price(&PriceValue::Number(f64::INFINITY)), 0.0);
        assert_eq!(normalize_price(&PriceValue::Number(-3.0)), 0.0);
    }

    #[test]
    fn text_with_currency_symbol() {
        assert!((parse_price_text("$24.99") - 24.99).abs() < 1e-9);
        assert!((parse_price_text("24,99 $") - 24.99).abs() < 1e-9);
    }

    #[test]
    fn text_with_thousands_separators() {
        assert!((parse_price_text("1 129,00 $") - 1129.0).abs() < 1e-9);
        assert!((parse_price_text("$1,129.00") - 1129.0).abs() < 1e-9);
        assert!((parse_price_text("1.129.00") - 1129.0).abs() < 1e-9);
    }

    #[test]
    fn trailing_period_is_ignored() {
        assert!((parse_price_text("+ $15.00.") - 15.0).abs() < 1e-9);
    }

    #[test]
    fn separators_without_digits_are_zero() {
        for input in ["", "$", ".", "...", ",,,", ".,.", "Gratuit"] {
            assert_eq!(parse_price_text(input), 0.0, "input {input:?}");
        }
    }

    #[test]
    fn display_formats_numbers_with_two_decimals() {
        assert_eq!(PriceValue::Number(5.5).display(), "5.50 $");
        assert_eq!(PriceValue::Text("5,50 $".to_string()).display(), "5,50 $");
    }

    #[test]
    fn untagged_deserialization_accepts_both_shapes() {
        let n: PriceValue = serde_json::from_str("12.5").expect("number");
        let t: PriceValue = serde_json::from_str("\"12,50 $\"").expect("text");
        assert_eq!(n, PriceValue::Number(12.5));
        assert_eq!(t, PriceValue::Text("12,50 $".to_string()));
    }

    #[test]
    fn shipping_free_in_either_language() {
        for text in ["Free delivery", "Livraison gratuite", "GRATUIT"] {
            let shipping = parse_shipping(Some(text));
            assert_eq!(shipping.cost, 0.0);
            assert_eq!(shipping.label, FREE_SHIPPING_LABEL, "text {text:?}");
        }
    }

    #[test]
    fn free_shipping_ignores_amounts_in_the_text() {
        for text in ["Free shipping over $35", "Livraison gratuite dès 50,00 $"] {
            let shipping = parse_shipping(Some(text));
            assert_eq!(shipping.cost, 0.0, "text {text:?}");
            assert_eq!(shipping.label, FREE_SHIPPING_LABEL, "text {text:?}");
        }
    }

    #[test]
    fn shipping_with_amount() {
        let shipping = parse_shipping(Some("+ $15.00 delivery"));
        assert!((shipping.cost - 15.0).abs() < 1e-9);
        assert_eq!(shipping.label, "+ 15.00 $");

        let shipping = parse_shipping(Some("Livraison : 7,5 $"));
        assert!((shipping.cost - 7.5).abs() < 1e-9);
        assert_eq!(shipping.label, "+ 7.50 $");
    }

    #[test]
    fn shipping_unknown_when_absent_or_without_digits() {
        for text in [None, Some(""), Some("   "), Some("Livraison standard")] {
            let shipping = parse_shipping(text);
            assert_eq!(shipping.cost, 0.0);
            assert_eq!(shipping.label, UNKNOWN_SHIPPING_LABEL, "text {text:?}");
        }
    }

    #[test]
    fn shipping_of_zero_is_free() {
        assert_eq!(parse_shipping(Some("+ $0.00 delivery")).label, FREE_SHIPPING_LABEL);
    }

    #[test]
    fn total_adds_shipping() {
        let shipping = parse_shipping(Some("+ $15.00 delivery"));
        assert!((total_price(100.0, &shipping) - 115.0).abs() < 1e-9);
        assert!((total_price(100.0, &parse_shipping(None)) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn total_is_rounded_to_cents() {
        let shipping = parse_shipping(Some("+ 10,00 $"));
        assert_eq!(total_price(59.99, &shipping).to_string(), "69.99");
    }

    #[test]
    fn total_stays_finite_for_huge_prices() {
        let huge = parse_price_text(&"9".repeat(308));
        assert!(huge.is_finite());
        let total = total_price(huge, &parse_shipping(None));
        assert!(total.is_finite());
        assert!((total - huge).abs() <= huge * f64::EPSILON);

        let overflowing = Shipping {
            cost: f64::MAX,
            label: "+".to_string(),
        };
        assert_eq!(total_price(f64::MAX, &overflowing), 0.0);
    }
}
