//! Locale-aware number formatting for KPI cards.
//!
//! Uses `rust_decimal` so that rounding happens on the exact decimal value
//! the backend sent, never on a binary float approximation.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{CoreError, Result};
use crate::snapshot::KpiValue;

/// Placeholder rendered for absent values.
pub const PLACEHOLDER: &str = "--";

/// Fraction digits for USD amounts (minimum and maximum).
const CURRENCY_FRACTION_DIGITS: u32 = 2;

/// Maximum fraction digits for plain numbers.
const NUMBER_MAX_FRACTION_DIGITS: u32 = 3;

/// Where the currency symbol sits relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyPattern {
    /// Symbol before the digits (`$1,234.50`).
    Prefix(&'static str),
    /// Symbol after the digits (`1.234,50 $`).
    Suffix(&'static str),
}

/// Number formatting conventions of one locale.
///
/// Only the parts needed to render USD amounts and grouped integers are
/// modelled. The currency is always USD; only its placement and the
/// separators follow the locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    tag: &'static str,
    grouping: &'static str,
    decimal: &'static str,
    usd: CurrencyPattern,
}

impl Locale {
    pub const EN_US: Self = Self {
        tag: "en-US",
        grouping: ",",
        decimal: ".",
        usd: CurrencyPattern::Prefix("$"),
    };

    pub const EN_GB: Self = Self {
        tag: "en-GB",
        grouping: ",",
        decimal: ".",
        usd: CurrencyPattern::Prefix("US$"),
    };

    pub const DE_DE: Self = Self {
        tag: "de-DE",
        grouping: ".",
        decimal: ",",
        usd: CurrencyPattern::Suffix("\u{a0}$"),
    };

    pub const FR_FR: Self = Self {
        tag: "fr-FR",
        grouping: "\u{202f}",
        decimal: ",",
        usd: CurrencyPattern::Suffix("\u{a0}$"),
    };

    /// BCP 47 style tag, e.g. `en-US`.
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Parse a locale tag.
    ///
    /// Accepts BCP 47 (`de-DE`) and POSIX (`de_DE.UTF-8`, `C`) spellings.
    pub fn parse(tag: &str) -> Result<Self> {
        let base = tag
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .trim()
            .replace('_', "-")
            .to_ascii_lowercase();

        match base.as_str() {
            "en-us" | "en" | "c" | "posix" => Ok(Self::EN_US),
            "en-gb" => Ok(Self::EN_GB),
            "de-de" | "de" => Ok(Self::DE_DE),
            "fr-fr" | "fr" => Ok(Self::FR_FR),
            _ => Err(CoreError::UnknownLocale(tag.to_string())),
        }
    }

    /// Resolve the viewer's locale from `LC_ALL`, `LC_NUMERIC` and `LANG`.
    ///
    /// Falls back to `en-US` when nothing usable is set.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        pick_locale(var("LC_ALL"), var("LC_NUMERIC"), var("LANG"))
    }
}

/// First non-blank of `LC_ALL`, `LC_NUMERIC`, `LANG` decides; an
/// unrecognised tag there falls back to `en-US` rather than to the next one.
fn pick_locale(lc_all: Option<String>, lc_numeric: Option<String>, lang: Option<String>) -> Locale {
    [lc_all, lc_numeric, lang]
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
        .and_then(|v| Locale::parse(&v).ok())
        .unwrap_or_default()
}

impl Default for Locale {
    fn default() -> Self {
        Self::EN_US
    }
}

impl FromStr for Locale {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag)
    }
}

/// Formats KPI values for display.
///
/// Stateless apart from the locale it was built with: the same input always
/// produces the same output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumberFormatter {
    locale: Locale,
}

impl NumberFormatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Format an optional KPI value.
    ///
    /// - `None` renders as [`PLACEHOLDER`].
    /// - Numbers render as USD when `is_currency`, else as grouped numbers.
    /// - Text is returned unchanged, whatever `is_currency` says.
    pub fn format(&self, value: Option<&KpiValue>, is_currency: bool) -> String {
        match value {
            None => PLACEHOLDER.to_string(),
            Some(v) => self.format_value(v, is_currency),
        }
    }

    /// Format a present KPI value.
    pub fn format_value(&self, value: &KpiValue, is_currency: bool) -> String {
        match value {
            KpiValue::Number(d) if is_currency => self.currency(*d),
            KpiValue::Number(d) => self.number(*d),
            KpiValue::Text(s) => s.clone(),
        }
    }

    /// USD amount with exactly two fraction digits.
    pub fn currency(&self, amount: Decimal) -> String {
        let (negative, digits) =
            self.digits(amount, CURRENCY_FRACTION_DIGITS, CURRENCY_FRACTION_DIGITS);
        let sign = if negative { "-" } else { "" };
        match self.locale.usd {
            CurrencyPattern::Prefix(symbol) => format!("{sign}{symbol}{digits}"),
            CurrencyPattern::Suffix(symbol) => format!("{sign}{digits}{symbol}"),
        }
    }

    /// Grouped number with up to three fraction digits, none forced.
    pub fn number(&self, value: Decimal) -> String {
        let (negative, digits) = self.digits(value, 0, NUMBER_MAX_FRACTION_DIGITS);
        if negative {
            format!("-{digits}")
        } else {
            digits
        }
    }

    /// Percentage with exactly two decimals and a `.` separator.
    ///
    /// `fraction` is in [0, 1]; `0.2` renders as `20.00%`. Returns `None` for
    /// absent or non-numeric input, and for a fraction too large to scale.
    pub fn percent(fraction: Option<&KpiValue>) -> Option<String> {
        let pct = fraction?.as_decimal()?.checked_mul(Decimal::ONE_HUNDRED)?;
        let (negative, (int_part, frac_part)) = split_digits(pct, 2, 2);
        let sign = if negative { "-" } else { "" };
        Some(format!("{sign}{int_part}.{frac_part}%"))
    }

    /// Render `|value|` with locale separators.
    ///
    /// Returns whether the input is negative, even when it rounds to zero.
    fn digits(&self, value: Decimal, min_frac: u32, max_frac: u32) -> (bool, String) {
        let (negative, (int_part, frac_part)) = split_digits(value, min_frac, max_frac);
        let int_part = group_thousands(&int_part, self.locale.grouping);
        let body = if frac_part.is_empty() {
            int_part
        } else {
            format!("{int_part}{}{frac_part}", self.locale.decimal)
        };
        (negative, body)
    }
}

/// Round half away from zero to `max_frac` digits, then split into integer
/// and fraction digit strings with the fraction padded to `min_frac`.
fn split_digits(value: Decimal, min_frac: u32, max_frac: u32) -> (bool, (String, String)) {
    let rounded = value.round_dp_with_strategy(max_frac, RoundingStrategy::MidpointAwayFromZero);
    let negative = value.is_sign_negative() && !value.is_zero();
    let repr = rounded.abs().to_string();

    let (int_part, frac_part) = match repr.split_once('.') {
        Some((i, f)) => (i.to_string(), f.trim_end_matches('0').to_string()),
        None => (repr, String::new()),
    };

    let mut frac_part = frac_part;
    while (frac_part.len() as u32) < min_frac {
        frac_part.push('0');
    }

    (negative, (int_part, frac_part))
}

/// Insert `sep` between every group of three integer digits.
fn group_thousands(digits: &str, sep: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * sep.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(ch);
    }
    out
}
