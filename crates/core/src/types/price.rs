//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored without a currency; the shop operates in a single
//! currency configured at the web layer.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price must be a decimal number")]
    Malformed,
    /// The amount is zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
}

/// A positive price amount.
///
/// ## Examples
///
/// ```
/// use gothic_shop_core::Price;
///
/// assert_eq!(Price::parse("450").unwrap().to_string(), "450");
/// assert_eq!(Price::parse(" 19.90 ").unwrap().to_string(), "19.90");
///
/// assert!(Price::parse("").is_err());
/// assert!(Price::parse("free").is_err());
/// assert!(Price::parse("0").is_err());
/// assert!(Price::parse("-5").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotPositive` if the amount is zero or negative.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        Ok(Self(amount))
    }

    /// Parse a price from user input or a stored value.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a decimal number, or not
    /// greater than zero.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(trimmed).map_err(|_| PriceError::Malformed)?;
        Self::new(amount)
    }

    /// Returns the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Price::parse("450").unwrap().amount(), Decimal::new(450, 0));
        assert_eq!(Price::parse("0.01").unwrap().amount(), Decimal::new(1, 2));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Price::parse("   "), Err(PriceError::Empty));
        assert_eq!(Price::parse("12x5"), Err(PriceError::Malformed));
        assert_eq!(Price::parse("0.00"), Err(PriceError::NotPositive));
        assert_eq!(Price::parse("-1"), Err(PriceError::NotPositive));
    }

    #[test]
    fn test_display_keeps_scale() {
        assert_eq!(Price::parse("450.50").unwrap().to_string(), "450.50");
    }

    #[test]
    fn test_serde_rejects_non_positive() {
        let price: Price = serde_json::from_str("\"12.5\"").unwrap();
        assert_eq!(price.to_string(), "12.5");
        assert!(serde_json::from_str::<Price>("\"0\"").is_err());
    }
}
