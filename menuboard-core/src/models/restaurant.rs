use serde::{Deserialize, Serialize};
use std::fmt;

use super::menu::Menu;

/// Top-level tenant. The backend stores the identifier as `_id`; some
/// responses carry `id` instead, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RestaurantRecord")]
pub struct Restaurant {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub menus: Vec<Menu>,
}

#[derive(Deserialize)]
struct RestaurantRecord {
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    menus: Vec<Menu>,
}

impl TryFrom<RestaurantRecord> for Restaurant {
    type Error = String;

    fn try_from(record: RestaurantRecord) -> Result<Self, Self::Error> {
        let id = record
            .mongo_id
            .or(record.id)
            .ok_or_else(|| "missing field `_id`".to_string())?;
        Ok(Restaurant::new(id, record.name, record.location).with_menus(record.menus))
    }
}

impl Restaurant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            menus: Vec::new(),
        }
    }

    pub fn with_menus(mut self, menus: Vec<Menu>) -> Self {
        self.menus = menus;
        self
    }

    pub fn menu(&self, menu_id: &str) -> Option<&Menu> {
        self.menus.iter().find(|m| m.id == menu_id)
    }
}

impl fmt::Display for Restaurant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count()))?;
        if !self.location.is_empty() {
            writeln!(f, "Location: {}", self.location)?;
        }
        writeln!(f, "ID: {}", self.id)?;

        if self.menus.is_empty() {
            writeln!(f, "\nNo menus available")?;
        } else {
            writeln!(f, "\nMenus:")?;
            for menu in &self.menus {
                let marker = if menu.pending { " (saving)" } else { "" };
                writeln!(
                    f,
                    "  - {} [{}] {} categories, {} dishes{}",
                    menu.name,
                    menu.id,
                    menu.categories.len(),
                    menu.dish_count(),
                    marker
                )?;
            }
        }
        Ok(())
    }
}

/// Fields for creating or renaming a restaurant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RestaurantDraft {
    pub name: String,
    pub location: String,
}

impl RestaurantDraft {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    pub fn from_restaurant(restaurant: &Restaurant) -> Self {
        Self::new(restaurant.name.clone(), restaurant.location.clone())
    }

    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.location.trim().is_empty()
    }
}
