use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;
use super::key::EntityKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_text: Option<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Placeholder inserted before the backend confirmed the menu.
    #[serde(skip)]
    pub pending: bool,
}

impl Menu {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            welcome_text: None,
            categories: Vec::new(),
            pending: false,
        }
    }

    /// A local stand-in keyed by the current time in milliseconds.
    pub fn placeholder(name: impl Into<String>) -> Self {
        let mut menu = Self::new(chrono::Utc::now().timestamp_millis().to_string(), name);
        menu.pending = true;
        menu
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_position(&self, key: EntityKey) -> Option<usize> {
        self.categories.iter().position(|c| c.key == key)
    }

    pub fn dish_count(&self) -> usize {
        self.categories.iter().map(|c| c.dishes.len()).sum()
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count()))?;
        if let Some(welcome) = &self.welcome_text {
            writeln!(f, "{}", welcome)?;
        }
        for (i, category) in self.categories.iter().enumerate() {
            writeln!(f, "\n{}. {}", i + 1, category.name)?;
            for (j, dish) in category.dishes.iter().enumerate() {
                writeln!(f, "   {}. {}", j + 1, dish)?;
            }
        }
        Ok(())
    }
}

/// Name and welcome text of a menu, as sent on create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MenuDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welcome_text: Option<String>,
}

impl MenuDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            welcome_text: None,
        }
    }

    pub fn from_menu(menu: &Menu) -> Self {
        Self {
            name: menu.name.clone(),
            welcome_text: menu.welcome_text.clone(),
        }
    }

    pub fn with_welcome_text(mut self, text: impl Into<String>) -> Self {
        self.welcome_text = Some(text.into());
        self
    }
}

/// Body of a menu creation response. Older backends answer with `menu_id`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatedMenu {
    #[serde(alias = "menu_id")]
    pub id: String,
}
