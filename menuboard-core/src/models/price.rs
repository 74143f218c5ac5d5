use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A currency amount for a dish.
///
/// The backend stores prices as whatever the form submitted, so both JSON
/// strings and numbers are accepted when reading. Text that is not an amount
/// ("Market price", "", null) is kept as [`Price::Unparsed`] so one odd
/// record does not fail a whole listing. Amounts are written back as strings
/// with the scale the user entered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Price {
    Amount(Decimal),
    Unparsed(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceError {
    #[error("Price cannot be empty")]
    Empty,
    #[error("Invalid price '{0}'")]
    Invalid(String),
    #[error("Price cannot be negative: {0}")]
    Negative(String),
}

impl Price {
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount.to_string()));
        }
        Ok(Price::Amount(amount))
    }

    /// `None` when the backend stored something that is not an amount.
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Price::Amount(amount) => Some(*amount),
            Price::Unparsed(_) => None,
        }
    }

    /// The text a form shows when this price is edited.
    pub fn to_input(&self) -> String {
        match self {
            Price::Amount(amount) => amount.to_string(),
            Price::Unparsed(raw) => raw.clone(),
        }
    }

    /// Lenient reading used for backend data.
    fn from_stored(raw: &str) -> Self {
        raw.parse()
            .unwrap_or_else(|_| Price::Unparsed(raw.to_string()))
    }
}

impl Default for Price {
    fn default() -> Self {
        Price::Unparsed(String::new())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }
        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| PriceError::Invalid(s.to_string()))?;
        Price::new(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(amount) => write!(f, "${:.2}", amount),
            Price::Unparsed(raw) if raw.trim().is_empty() => write!(f, "-"),
            Price::Unparsed(raw) => write!(f, "{}", raw.trim()),
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_input())
    }
}

struct PriceVisitor;

impl<'de> Visitor<'de> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a price as a string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
        Ok(Price::from_stored(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
        Ok(Price::Amount(Decimal::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
        Ok(Price::new(Decimal::from(v)).unwrap_or_else(|_| Price::Unparsed(v.to_string())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
        // Go through the shortest float repr so 3.1 stays 3.1 rather than 3.0999..
        Ok(Price::from_stored(&v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Price, E> {
        Ok(Price::Unparsed(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Price, E> {
        Ok(Price::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Price, E> {
        Ok(Price::default())
    }
}

impl<'de> serde::Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}
