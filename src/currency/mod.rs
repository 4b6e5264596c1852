use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("INR")
    }
}

/// Digit grouping convention for the integer part of an amount.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Grouping {
    /// 1,200,000
    #[default]
    Western,
    /// 12,00,000
    Indian,
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    #[serde(default)]
    pub grouping: Grouping,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-IN".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            grouping: Grouping::Western,
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "INR" => "₹".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "BDT" => "৳".into(),
        "NPR" => "रू".into(),
        _ => format!("{} ", code),
    }
}

/// Renders an amount held in minor units, e.g. `format_amount(2_400_000, .., 0)` is `₹24,00,000`
/// under Indian grouping.
pub fn format_amount(amount: u64, code: &CurrencyCode, locale: &LocaleConfig, precision: u8) -> String {
    let (whole, fraction) = match 10u64.checked_pow(u32::from(precision)) {
        Some(scale) => (amount / scale, amount % scale),
        None => (0, amount),
    };
    let whole = group_digits(&whole.to_string(), locale);
    let symbol = symbol_for(code.as_str());
    if precision == 0 {
        format!("{}{}", symbol, whole)
    } else {
        format!(
            "{}{}{}{:0width$}",
            symbol,
            whole,
            locale.decimal_separator,
            fraction,
            width = precision as usize
        )
    }
}

fn group_digits(digits: &str, locale: &LocaleConfig) -> String {
    let separator = locale.grouping_separator;
    let chars: Vec<char> = digits.chars().collect();
    if chars.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = chars.split_at(chars.len() - 3);
    let group = match locale.grouping {
        Grouping::Western => 3,
        Grouping::Indian => 2,
    };
    let mut grouped = String::new();
    for (idx, ch) in head.iter().enumerate() {
        if idx != 0 && (head.len() - idx) % group == 0 {
            grouped.push(separator);
        }
        grouped.push(*ch);
    }
    grouped.push(separator);
    grouped.extend(tail);
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indian() -> LocaleConfig {
        LocaleConfig {
            grouping: Grouping::Indian,
            ..LocaleConfig::default()
        }
    }

    #[test]
    fn formats_rupees_with_western_grouping() {
        let code = CurrencyCode::default();
        assert_eq!(format_amount(24_000, &code, &LocaleConfig::default(), 0), "₹24,000");
        assert_eq!(format_amount(1_200_000, &code, &LocaleConfig::default(), 0), "₹1,200,000");
        assert_eq!(format_amount(200, &code, &LocaleConfig::default(), 0), "₹200");
    }

    #[test]
    fn formats_indian_lakh_grouping() {
        let code = CurrencyCode::default();
        assert_eq!(format_amount(120_000, &code, &indian(), 0), "₹1,20,000");
        assert_eq!(format_amount(12_345_678, &code, &indian(), 0), "₹1,23,45,678");
        assert_eq!(format_amount(6_000, &code, &indian(), 0), "₹6,000");
    }

    #[test]
    fn formats_minor_units() {
        let code = CurrencyCode::new("usd");
        assert_eq!(format_amount(125_050, &code, &LocaleConfig::default(), 2), "$1,250.50");
        assert_eq!(format_amount(7, &code, &LocaleConfig::default(), 2), "$0.07");
    }

    #[test]
    fn oversized_precision_keeps_every_digit_in_the_fraction() {
        let code = CurrencyCode::new("usd");
        let rendered = format_amount(125_050, &code, &LocaleConfig::default(), 22);
        assert_eq!(rendered, "$0.0000000000000000125050");
    }

    #[test]
    fn unknown_codes_fall_back_to_code_prefix() {
        assert_eq!(symbol_for("KES"), "KES ");
    }
}
