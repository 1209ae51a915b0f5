//! Tolerant number fields
//!
//! Hand-edited data files carry numbers as JSON numbers, as text such as
//! `"1,000"`, or as `null`. These helpers are used with
//! `#[serde(deserialize_with = ...)]` so none of those shapes fail a record.

use serde::{Deserialize, Deserializer};

use crate::pricing::parse_price_text;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

/// A number that may be absent: `null` and unparseable text become `None`
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawNumber>::deserialize(deserializer)? {
        None => None,
        Some(RawNumber::Number(n)) => Some(n),
        Some(RawNumber::Text(text)) => parse_price_text(&text),
    })
}

/// A number that defaults to zero when `null` or unparseable
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_number(deserializer)?.unwrap_or(0.0))
}
