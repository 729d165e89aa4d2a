//! Locale-aware number parsing and currency formatting

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use super::currencies::{currency_symbol, minor_digits};
use super::DEFAULT_LOCALE;

/// Where the currency symbol goes relative to the number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPlacement {
    /// `$1,234.50`
    Before,
    /// `€ 1.234,50`
    BeforeSpaced,
    /// `1.234,50 €`
    AfterSpaced,
}

/// Digit grouping and decimal separators of a locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separators {
    pub grouping: char,
    pub decimal: char,
    pub placement: SymbolPlacement,
}

const ENGLISH_STYLE: Separators = Separators {
    grouping: ',',
    decimal: '.',
    placement: SymbolPlacement::Before,
};

const CONTINENTAL_STYLE: Separators = Separators {
    grouping: '.',
    decimal: ',',
    placement: SymbolPlacement::AfterSpaced,
};

const SPACE_GROUPED_STYLE: Separators = Separators {
    grouping: '\u{a0}',
    decimal: ',',
    placement: SymbolPlacement::AfterSpaced,
};

impl Separators {
    /// Separators for a BCP 47 tag such as `en-US` or `de_DE`
    ///
    /// Unknown languages use English conventions.
    pub fn for_locale(tag: &str) -> Self {
        let tag = tag.replace('_', "-").to_lowercase();
        let mut parts = tag.split('-');
        let language = parts.next().unwrap_or_default();
        let region = parts.find(|p| p.len() == 2).unwrap_or_default();

        match (language, region) {
            ("de", "ch") | ("de", "li") | ("it", "ch") => Separators {
                grouping: '\'',
                decimal: '.',
                placement: SymbolPlacement::BeforeSpaced,
            },
            ("es", "mx") | ("es", "us") => ENGLISH_STYLE,
            ("pt", "br") => Separators {
                placement: SymbolPlacement::BeforeSpaced,
                ..CONTINENTAL_STYLE
            },
            ("pt", _) => SPACE_GROUPED_STYLE,
            ("nl", _) => Separators {
                placement: SymbolPlacement::BeforeSpaced,
                ..CONTINENTAL_STYLE
            },
            ("de" | "es" | "it" | "id" | "tr" | "da" | "el" | "ro" | "hr" | "sl" | "sr" | "vi", _) => {
                CONTINENTAL_STYLE
            }
            (
                "fr" | "ru" | "pl" | "cs" | "sk" | "sv" | "nb" | "no" | "fi" | "uk" | "bg" | "hu"
                | "lt" | "lv" | "et",
                _,
            ) => SPACE_GROUPED_STYLE,
            _ => ENGLISH_STYLE,
        }
    }

    fn is_grouping(&self, c: char) -> bool {
        if self.grouping.is_whitespace() {
            c.is_whitespace()
        } else if self.grouping == '\'' {
            c == '\'' || c == '\u{2019}'
        } else {
            c == self.grouping
        }
    }
}

/// Read plain numeric text (`12`, `-3.50`, `1e3`) as a decimal
///
/// Returns `None` for empty or non-numeric text. The whole text must be a
/// number: `12abc` is `None`, not `12`.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    let text = text.strip_prefix('+').unwrap_or(text);
    if text.is_empty() {
        return None;
    }

    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Read a number written with a locale's separators
///
/// Grouping separators are dropped and the first decimal separator becomes
/// `.`. A `None` locale uses [`DEFAULT_LOCALE`].
pub fn parse_locale_number(text: &str, locale: Option<&str>) -> Option<Decimal> {
    let separators = Separators::for_locale(locale.unwrap_or(DEFAULT_LOCALE));

    let mut normalized = String::with_capacity(text.len());
    let mut seen_decimal = false;
    for c in text.trim().chars() {
        if separators.is_grouping(c) {
            continue;
        }
        if c == separators.decimal && !seen_decimal {
            normalized.push('.');
            seen_decimal = true;
        } else {
            normalized.push(c);
        }
    }

    parse_decimal(&normalized)
}

/// Insert the grouping separator every three digits
fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Format an amount as currency text for a locale
///
/// The amount is rounded half away from zero to the currency's minor
/// units. Unknown currency codes are shown as the code itself.
pub fn format_currency(amount: Decimal, currency_code: &str, locale: &str) -> String {
    let separators = Separators::for_locale(locale);
    let digits = minor_digits(currency_code);
    let symbol = currency_symbol(currency_code);

    let mut rounded = amount.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(digits);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = rounded.abs().to_string();

    let (whole, fraction) = match plain.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (plain.as_str(), None),
    };

    let mut number = group_digits(whole, separators.grouping);
    if let Some(fraction) = fraction {
        number.push(separators.decimal);
        number.push_str(fraction);
    }

    let sign = if negative { "-" } else { "" };
    match separators.placement {
        SymbolPlacement::Before => format!("{}{}{}", sign, symbol, number),
        SymbolPlacement::BeforeSpaced => format!("{}{}\u{a0}{}", sign, symbol, number),
        SymbolPlacement::AfterSpaced => format!("{}{}\u{a0}{}", sign, number, symbol),
    }
}
