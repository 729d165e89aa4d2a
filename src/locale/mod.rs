//! Locale and currency resolution
//!
//! The user's locale decides how numbers are read and how money is shown.
//! It is resolved once at start-up into a [`LocaleContext`] which is then
//! passed explicitly to whatever parses or formats amounts.
//!
//! ## Resolution Order
//!
//! 1. `locale` in the settings file
//! 2. `LC_ALL`, `LC_MONETARY`, then `LANG` (POSIX form such as `de_DE.UTF-8`)
//! 3. [`DEFAULT_LOCALE`]
//!
//! The currency comes from `currency_code` in the settings file when set,
//! otherwise from the locale's country.

pub mod currencies;
pub mod number;

use rust_decimal::Decimal;

use crate::config::settings::Settings;

pub use currencies::{currency_code, currency_symbol, FALLBACK_CURRENCY};
pub use number::{format_currency, parse_decimal, parse_locale_number, Separators};

/// Locale used when nothing else is configured
pub const DEFAULT_LOCALE: &str = "en-US";

/// Environment variables consulted for the locale, in order
const LOCALE_ENV_VARS: &[&str] = &["LC_ALL", "LC_MONETARY", "LANG"];

/// Extract the upper-cased country code from a locale tag
///
/// `en-US` gives `US`, `zh-Hant-TW` gives `TW`. A tag without a region is
/// returned whole, upper-cased (`fr` gives `FR`).
pub fn country_code(locale: &str) -> String {
    let normalized = locale.replace('_', "-");
    let region = normalized
        .split('-')
        .skip(1)
        .find(|part| part.len() == 2 || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit())));

    match region {
        Some(region) => region.to_uppercase(),
        None => normalized.to_uppercase(),
    }
}

/// Turn a POSIX locale value into a BCP 47 tag
///
/// `de_DE.UTF-8@euro` becomes `de-DE`. The `C` and `POSIX` locales carry
/// no language information and yield `None`.
pub fn normalize_posix_locale(raw: &str) -> Option<String> {
    let base = raw.split(['.', '@']).next().unwrap_or_default().trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}

/// The resolved locale and currency for this session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleContext {
    /// BCP 47 locale tag, e.g. `en-US`
    pub tag: String,
    /// Upper-cased country code derived from the tag
    pub country_code: String,
    /// ISO 4217 currency code
    pub currency_code: String,
}

impl LocaleContext {
    /// Build a context for a locale tag, deriving the currency from its country
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let country_code = country_code(&tag);
        let currency_code = currencies::currency_code(&country_code).to_string();
        Self {
            tag,
            country_code,
            currency_code,
        }
    }

    /// Use an explicit currency instead of the locale's
    pub fn with_currency(mut self, currency_code: impl Into<String>) -> Self {
        self.currency_code = currency_code.into().trim().to_uppercase();
        self
    }

    /// Resolve from settings and the process environment
    pub fn detect(settings: &Settings) -> Self {
        Self::detect_with(settings, |name| std::env::var(name).ok())
    }

    /// Resolve from settings and an arbitrary environment lookup
    pub fn detect_with<F>(settings: &Settings, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let tag = settings
            .locale
            .clone()
            .filter(|l| !l.trim().is_empty())
            .or_else(|| {
                LOCALE_ENV_VARS
                    .iter()
                    .filter_map(|var| lookup(*var))
                    .find_map(|value| normalize_posix_locale(&value))
            })
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        let context = Self::new(tag);
        let context = match settings.currency_code.as_deref() {
            Some(code) if !code.trim().is_empty() => context.with_currency(code),
            _ => context,
        };

        tracing::debug!(
            locale = %context.tag,
            currency = %context.currency_code,
            "resolved locale"
        );
        context
    }

    /// Format an amount in this context's currency
    pub fn format(&self, amount: Decimal) -> String {
        format_currency(amount, &self.currency_code, &self.tag)
    }

    /// Read user-typed numeric text using this locale's separators
    pub fn parse_number(&self, text: &str) -> Option<Decimal> {
        parse_locale_number(text, Some(&self.tag))
    }
}

impl Default for LocaleContext {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}
