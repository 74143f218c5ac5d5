use serde::{Deserialize, Serialize};
use std::fmt;

use super::key::EntityKey;
use super::price::Price;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    #[serde(skip)]
    pub key: EntityKey,
    pub name: String,
    pub price: Price,
}

impl Dish {
    pub fn new(name: impl Into<String>, price: Price) -> Self {
        Self {
            key: EntityKey::new(),
            name: name.into(),
            price,
        }
    }

    /// Same content, ignoring the local key.
    pub fn same_as(&self, other: &Dish) -> bool {
        self.name == other.name && self.price == other.price
    }
}

impl From<DishInput> for Dish {
    fn from(input: DishInput) -> Self {
        Dish::new(input.name, input.price)
    }
}

impl fmt::Display for Dish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.price)
    }
}

/// Validated dish payload, as sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DishInput {
    pub name: String,
    pub price: Price,
}

/// Raw dish form fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DishDraft {
    pub name: String,
    pub price: String,
}

pub const DISH_FIELDS_REQUIRED: &str = "Please enter both dish name and price.";

impl DishDraft {
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
        }
    }

    pub fn from_dish(dish: &Dish) -> Self {
        Self {
            name: dish.name.clone(),
            price: dish.price.to_input(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.price.trim().is_empty()
    }

    /// Checks the form the same way before any request is made.
    pub fn parse(&self) -> Result<DishInput, String> {
        let name = self.name.trim();
        if name.is_empty() || self.price.trim().is_empty() {
            return Err(DISH_FIELDS_REQUIRED.to_string());
        }
        let price = self.price.parse::<Price>().map_err(|e| e.to_string())?;
        Ok(DishInput {
            name: name.to_string(),
            price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_requires_both_fields() {
        assert_eq!(
            DishDraft::new("", "5").parse(),
            Err(DISH_FIELDS_REQUIRED.to_string())
        );
        assert_eq!(
            DishDraft::new("Tea", "  ").parse(),
            Err(DISH_FIELDS_REQUIRED.to_string())
        );
    }

    #[test]
    fn test_parse_trims_name() {
        let input = DishDraft::new("  Tea ", "3").parse().unwrap();
        assert_eq!(input.name, "Tea");
        assert_eq!(input.price, "3".parse().unwrap());
    }

    #[test]
    fn test_parse_bad_price() {
        let err = DishDraft::new("Tea", "three").parse().unwrap_err();
        assert!(err.contains("Invalid price"));
    }

    #[test]
    fn test_deserialize_assigns_fresh_key() {
        let a: Dish = serde_json::from_str(r#"{"name":"Tea","price":"3"}"#).unwrap();
        let b: Dish = serde_json::from_str(r#"{"name":"Tea","price":3}"#).unwrap();
        assert!(a.same_as(&b));
        assert_ne!(a.key, b.key);
    }

    #[test]
    fn test_key_not_serialized() {
        let dish = Dish::new("Tea", "3".parse().unwrap());
        let json = serde_json::to_value(&dish).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Tea", "price": "3"}));
    }

    #[test]
    fn test_odd_stored_price_is_kept_for_editing() {
        let dish: Dish = serde_json::from_str(r#"{"name":"Fish","price":"Market price"}"#).unwrap();
        assert_eq!(dish.to_string(), "Fish - Market price");
        assert_eq!(DishDraft::from_dish(&dish).price, "Market price");
    }

    #[test]
    fn test_display() {
        let dish = Dish::new("Latte", "4.5".parse().unwrap());
        assert_eq!(dish.to_string(), "Latte - $4.50");
    }
}
