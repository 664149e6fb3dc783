//! Amount type for handling monetary values with optional dollar signs.
//!
//! Sheet cells come back formatted (`$1,234.50`) while the master CSV files hold plain numbers
//! (`1234.5`). `Amount` accepts both and always holds an exact `Decimal`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a dollar amount.
///
/// Serializes as a JSON number.
///
/// ```
/// # use expense_insights::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("$1,000.00").unwrap();
/// let b = Amount::from_str("1000").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "$1,000.00");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// The largest magnitude `from_str` accepts.
    pub const LIMIT: i64 = 1_000_000_000_000;

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError {
    input: String,
    source: Option<rust_decimal::Error>,
    out_of_range: bool,
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(e) => write!(f, "Invalid amount '{}': {e}", self.input),
            None if self.out_of_range => write!(
                f,
                "Invalid amount '{}': larger than {}",
                self.input,
                Amount::LIMIT
            ),
            None => write!(f, "Invalid amount '{}'", self.input),
        }
    }
}

impl Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn Error + 'static))
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError {
                input: s.to_string(),
                source: None,
                out_of_range: false,
            });
        }

        // "-$5.00" and "$-5.00" are both seen in exported sheets
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let (negative, rest) = match rest.strip_prefix('-') {
            Some(rest) => (!negative, rest),
            None => (negative, rest),
        };

        let digits = rest.replace(',', "");
        let value = Decimal::from_str(digits.trim()).map_err(|e| AmountError {
            input: s.to_string(),
            source: Some(e),
            out_of_range: false,
        })?;
        if value.abs() > Decimal::from(Amount::LIMIT) {
            return Err(AmountError {
                input: s.to_string(),
                source: None,
                out_of_range: true,
            });
        }
        Ok(Amount(if negative { -value } else { value }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.0.is_sign_negative() && !self.0.is_zero() {
            "-"
        } else {
            ""
        };
        let abs = self.0.abs().to_f64().unwrap_or_default();
        write!(f, "{sign}${}", format_num::format_num!(",.2", abs))
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain_number() {
        assert_eq!(Amount::from_str("100.00").unwrap().value(), d("100"));
        assert_eq!(Amount::from_str("12.5").unwrap().value(), d("12.50"));
    }

    #[test]
    fn test_parse_sheet_formatted() {
        assert_eq!(Amount::from_str("$1,234.56").unwrap().value(), d("1234.56"));
        assert_eq!(Amount::from_str("  $9.99 ").unwrap().value(), d("9.99"));
    }

    #[test]
    fn test_parse_negative_forms() {
        assert_eq!(Amount::from_str("-$5.00").unwrap().value(), d("-5"));
        assert_eq!(Amount::from_str("$-5.00").unwrap().value(), d("-5"));
        assert_eq!(Amount::from_str("-5").unwrap().value(), d("-5"));
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(Amount::from_str("abc").is_err());
        assert!(Amount::from_str("").is_err());
        assert!(Amount::from_str("   ").is_err());
        assert!(Amount::from_str("$").is_err());
        let msg = Amount::from_str("twelve").unwrap_err().to_string();
        assert!(msg.contains("twelve"), "{msg}");
    }

    #[test]
    fn test_parse_out_of_range_is_error() {
        assert_eq!(
            Amount::from_str("1,000,000,000,000").unwrap().value(),
            d("1000000000000")
        );
        assert!(Amount::from_str("1000000000000.01").is_err());
        assert!(Amount::from_str("-$99999999999999999999.9999999").is_err());
        let msg = Amount::from_str("79228162514264337593543950335")
            .unwrap_err()
            .to_string();
        assert!(msg.contains("larger than"), "{msg}");
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::new(d("50")).to_string(), "$50.00");
        assert_eq!(Amount::new(d("-60000")).to_string(), "-$60,000.00");
        assert_eq!(Amount::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&Amount::new(d("9.99"))).unwrap();
        assert_eq!(json, "9.99");
        let back: Amount = serde_json::from_str("9.99").unwrap();
        assert_eq!(back.value(), d("9.99"));
    }

    #[test]
    fn test_is_positive() {
        assert!(Amount::from_str("0.01").unwrap().is_positive());
        assert!(!Amount::ZERO.is_positive());
        assert!(!Amount::from_str("-1").unwrap().is_positive());
    }
}
