//! KPI snapshot payload and query types.
//!
//! The backend returns a flat JSON object. Fields are parsed leniently:
//! a missing or `null` field becomes `None`, a JSON number becomes
//! [`KpiValue::Number`], and anything else is kept verbatim as
//! [`KpiValue::Text`] so the formatter can pass it through.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A single KPI value as received from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KpiValue {
    /// JSON number, held with exact decimal precision.
    Number(Decimal),
    /// Any non-numeric scalar, rendered unchanged.
    Text(String),
}

impl KpiValue {
    /// Numeric view of the value, if it is a number.
    #[inline]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(d) => Some(*d),
            Self::Text(_) => None,
        }
    }
}

impl From<Decimal> for KpiValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<u64> for KpiValue {
    fn from(value: u64) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<&str> for KpiValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for KpiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(d) => write!(f, "{d}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

struct KpiValueVisitor;

impl<'de> Visitor<'de> for KpiValueVisitor {
    type Value = KpiValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a scalar value")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<KpiValue, E> {
        Ok(KpiValue::Number(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<KpiValue, E> {
        Ok(KpiValue::Number(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<KpiValue, E> {
        // f64 Display is the shortest round-trip form, so 0.2 stays 0.2.
        let repr = v.to_string();
        Ok(match Decimal::from_str(&repr) {
            Ok(d) => KpiValue::Number(d),
            Err(_) => KpiValue::Text(repr),
        })
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<KpiValue, E> {
        Ok(KpiValue::Text(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<KpiValue, E> {
        Ok(KpiValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<KpiValue, E> {
        Ok(KpiValue::Text(v))
    }
}

impl<'de> Deserialize<'de> for KpiValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(KpiValueVisitor)
    }
}

/// All-time (or filtered) KPI bundle returned by the backend.
///
/// Replaced wholesale on every fetch; never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KpiSnapshot {
    /// Revenue in USD.
    #[serde(default)]
    pub total_revenue: Option<KpiValue>,
    /// Count of unique orders.
    #[serde(default)]
    pub total_orders: Option<KpiValue>,
    /// Units sold.
    #[serde(default)]
    pub total_units_sold: Option<KpiValue>,
    /// Gross profit in USD.
    #[serde(default)]
    pub gross_profit: Option<KpiValue>,
    /// Profit as a fraction of revenue, in [0, 1].
    #[serde(default)]
    pub profit_margin: Option<KpiValue>,
}

impl KpiSnapshot {
    /// Build a fully numeric snapshot.
    pub fn from_numbers(
        total_revenue: Decimal,
        total_orders: u64,
        total_units_sold: u64,
        gross_profit: Decimal,
        profit_margin: Decimal,
    ) -> Self {
        Self {
            total_revenue: Some(total_revenue.into()),
            total_orders: Some(total_orders.into()),
            total_units_sold: Some(total_units_sold.into()),
            gross_profit: Some(gross_profit.into()),
            profit_margin: Some(profit_margin.into()),
        }
    }
}

/// Optional filters accepted by the KPI endpoint.
///
/// Unset fields are omitted from the query string, so the default query
/// produces a bare GET.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiQuery {
    /// Inclusive start of the order date range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    /// Inclusive end of the order date range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    /// Sales territory (matched case-insensitively by the backend).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Product code filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
}

impl KpiQuery {
    /// True when no filter is set.
    pub fn is_empty(&self) -> bool {
        self.start.is_none()
            && self.end.is_none()
            && self.region.is_none()
            && self.product_code.is_none()
    }

    /// Parse an ISO `YYYY-MM-DD` date for use as a range bound.
    pub fn parse_date(s: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|e| CoreError::InvalidDate(format!("{s}: {e}")))
    }
}
