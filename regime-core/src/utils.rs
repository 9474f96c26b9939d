use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as an amount.
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseAmountError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes amount input: trims whitespace, drops currency markers and
/// thousands separators.
fn normalize_amount_input(s: &str) -> String {
    let trimmed = s.trim();
    let trimmed = trimmed.trim_start_matches('₹');
    let lowered = trimmed.to_ascii_lowercase();
    let stripped = if let Some(rest) = lowered.strip_prefix("inr") {
        &trimmed[trimmed.len() - rest.len()..]
    } else if let Some(rest) = lowered.strip_prefix("rs.") {
        &trimmed[trimmed.len() - rest.len()..]
    } else if let Some(rest) = lowered.strip_prefix("rs") {
        &trimmed[trimmed.len() - rest.len()..]
    } else {
        trimmed
    };
    stripped.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`] amount.
///
/// Handles comma as thousands separator (both `1,200,000` and the Indian
/// grouping `12,00,000`) and a leading `₹`, `Rs`, `Rs.` or `INR`.
/// Empty or whitespace-only input is treated as 0.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use regime_core::utils::parse_amount;
///
/// assert_eq!(parse_amount("12,00,000").unwrap(), dec!(1200000));
/// assert_eq!(parse_amount("₹ 15,000.50").unwrap(), dec!(15000.50));
/// assert_eq!(parse_amount("").unwrap(), dec!(0));
/// assert!(parse_amount("twelve").is_err());
/// ```
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid amount: {}", e);
        ParseAmountError {
            input: s.to_string(),
            source: e,
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_amount_plain() {
        assert_eq!(parse_amount("150000").unwrap(), dec!(150000));
    }

    #[test]
    fn parse_amount_western_grouping() {
        assert_eq!(parse_amount("1,200,000.25").unwrap(), dec!(1200000.25));
    }

    #[test]
    fn parse_amount_currency_prefixes() {
        assert_eq!(parse_amount("Rs. 2,500").unwrap(), dec!(2500));
        assert_eq!(parse_amount("RS 2500").unwrap(), dec!(2500));
        assert_eq!(parse_amount("INR 99.99").unwrap(), dec!(99.99));
        assert_eq!(parse_amount("₹7,000").unwrap(), dec!(7000));
    }

    #[test]
    fn parse_amount_whitespace_is_zero() {
        assert_eq!(parse_amount("   ").unwrap(), dec!(0));
    }

    #[test]
    fn parse_amount_negative_passes_through() {
        // Sign checks belong to TaxInput::validate
        assert_eq!(parse_amount("-10").unwrap(), dec!(-10));
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        assert!(parse_amount("abc").is_err());
    }
}
