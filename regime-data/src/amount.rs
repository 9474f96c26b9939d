use regime_core::utils::parse_amount;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Deserializes a required amount cell, accepting `₹`/`Rs`/`INR` markers and
/// thousands separators.
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.trim().is_empty() {
        return Err(serde::de::Error::custom("amount is empty"));
    }
    parse_amount(&s).map_err(serde::de::Error::custom)
}

/// Like [`deserialize_amount`], but an empty cell is `None`.
pub(crate) fn deserialize_optional_amount<'de, D>(
    deserializer: D
) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_amount(&s).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
