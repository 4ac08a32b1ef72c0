//! Typed node attributes.
//!
//! Nodes carry an open, ordered map of attributes ([`Attributes`]). Layout
//! algorithms read them by name and interpret them through the lookups on
//! [`AttributeValue`]: as a number, as a grouping key, or as a timestamp.
//! Every lookup returns `Option` so that missing or malformed attributes
//! degrade to an algorithm-specific fallback instead of an error.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered attribute map carried by every node.
pub type Attributes = IndexMap<String, AttributeValue>;

/// Formats accepted for textual timestamps that are not RFC 3339.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A single attribute value.
///
/// Deserialization is untagged: JSON booleans, numbers and strings map to
/// [`AttributeValue::Bool`], [`AttributeValue::Number`] and
/// [`AttributeValue::Text`]. [`AttributeValue::Timestamp`] is only produced
/// programmatically and serializes as an RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl AttributeValue {
    /// Interprets the value as a number.
    ///
    /// Numbers are returned as-is and text is parsed as a float. Booleans and
    /// timestamps are not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Bool(_) | Self::Timestamp(_) => None,
        }
    }

    /// Renders the value as a grouping key.
    ///
    /// Integral numbers drop their fractional part so that `2` and `2.0`
    /// land in the same group.
    ///
    /// # Examples
    ///
    /// ```
    /// # use meridian_core::attribute::AttributeValue;
    /// assert_eq!(AttributeValue::from(2.0).as_key(), "2");
    /// assert_eq!(AttributeValue::from(2.5).as_key(), "2.5");
    /// assert_eq!(AttributeValue::from("analysis").as_key(), "analysis");
    /// ```
    pub fn as_key(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Self::Number(n) => n.to_string(),
            Self::Text(text) => text.clone(),
            Self::Timestamp(ts) => ts.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Interprets the value as a point in time, in milliseconds since the Unix epoch.
    ///
    /// Accepts:
    /// - a finite number (already epoch milliseconds),
    /// - a [`AttributeValue::Timestamp`],
    /// - text in RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]`, `YYYY-MM-DD HH:MM:SS[.fff]`,
    ///   `YYYY-MM-DD` (UTC midnight), or an integer string of epoch milliseconds.
    ///
    /// # Examples
    ///
    /// ```
    /// # use meridian_core::attribute::AttributeValue;
    /// let iso = AttributeValue::from("1970-01-02T00:00:00Z");
    /// assert_eq!(iso.as_timestamp_millis(), Some(86_400_000));
    ///
    /// let date = AttributeValue::from("1970-01-02");
    /// assert_eq!(date.as_timestamp_millis(), Some(86_400_000));
    ///
    /// assert_eq!(AttributeValue::from("soon").as_timestamp_millis(), None);
    /// ```
    pub fn as_timestamp_millis(&self) -> Option<i64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n as i64),
            Self::Number(_) | Self::Bool(_) => None,
            Self::Timestamp(ts) => Some(ts.timestamp_millis()),
            Self::Text(text) => parse_timestamp(text.trim()),
        }
    }
}

fn parse_timestamp(text: &str) -> Option<i64> {
    if text.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.timestamp_millis());
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc().timestamp_millis());
    }

    text.parse::<i64>().ok()
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}
