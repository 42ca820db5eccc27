//! Decimal-aware numeric coercion for consumption cells.

use crate::types::DecimalSeparator;

/// Cell contents treated as a missing number rather than a parse failure.
pub const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// Whether a (trimmed) cell denotes a missing value.
#[inline]
pub fn is_missing(text: &str) -> bool {
    MISSING_TOKENS.contains(&text.trim())
}

/// Parse a cell as a number using the given decimal separator.
///
/// Returns `Ok(None)` for missing cells and `Err(())` when the text is not a
/// number under this separator. With a comma separator the text must not
/// contain a dot, and with a dot separator it must not contain a comma.
pub fn parse_number(text: &str, decimal: DecimalSeparator) -> Result<Option<f64>, ()> {
    let trimmed = text.trim();
    if is_missing(trimmed) {
        return Ok(None);
    }

    let parsed = match decimal {
        DecimalSeparator::Dot => {
            if trimmed.contains(',') {
                return Err(());
            }
            trimmed.parse::<f64>()
        }
        DecimalSeparator::Comma => {
            if trimmed.contains('.') {
                return Err(());
            }
            trimmed.replace(',', ".").parse::<f64>()
        }
    };

    match parsed {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(()),
    }
}

/// Lenient coercion: missing or unparseable cells become 0.
#[inline]
pub fn coerce_number(text: &str, decimal: DecimalSeparator) -> f64 {
    parse_number(text, decimal).ok().flatten().unwrap_or(0.0)
}
