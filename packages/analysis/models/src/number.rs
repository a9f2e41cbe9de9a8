//! Lenient numeric field decoding.
//!
//! The backend serializes areas and counts as JSON numbers in most
//! analyses but as numeric strings in some precomputed results. Both decode
//! to `f64`; anything else decodes to `None`, which consumers treat as "not
//! a number".

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

/// Deserializes an optional number that may also arrive as a string.
///
/// # Errors
///
/// Only fails if the underlying deserializer fails; unparseable values
/// become `None`.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(NumberOrText::Other(_)) | None => None,
    })
}
