use serde::{Deserialize, Serialize};

use super::dish::Dish;
use super::key::EntityKey;

/// A named section of a menu.
///
/// The backend has no identifier for categories: dishes are addressed through
/// the category name, so names must stay unique within a menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(skip)]
    pub key: EntityKey,
    pub name: String,
    #[serde(default)]
    pub dishes: Vec<Dish>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            key: EntityKey::new(),
            name: name.into(),
            dishes: Vec::new(),
        }
    }

    pub fn with_dishes(mut self, dishes: Vec<Dish>) -> Self {
        self.dishes = dishes;
        self
    }

    pub fn dish_position(&self, key: EntityKey) -> Option<usize> {
        self.dishes.iter().position(|d| d.key == key)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryDraft {
    pub name: String,
    pub dishes: Vec<Dish>,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dishes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CategoryRename<'a> {
    pub name: &'a str,
}
