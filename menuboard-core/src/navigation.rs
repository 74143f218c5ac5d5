//! Named routes and the back stack.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    RestaurantSelection,
    MenuManagement {
        restaurant_id: String,
    },
    AddEditMenu {
        restaurant_id: String,
        menu_id: String,
    },
    OnboardBrand,
    AddAd {
        brand_id: Option<String>,
    },
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Route::RestaurantSelection => "Select Restaurant/Cafe",
            Route::MenuManagement { .. } => "Manage Menus",
            Route::AddEditMenu { .. } => "Add/Edit Menu",
            Route::OnboardBrand => "Onboard a Brand",
            Route::AddAd { .. } => "Add New Ad",
        }
    }

    pub fn restaurant_id(&self) -> Option<&str> {
        match self {
            Route::MenuManagement { restaurant_id } | Route::AddEditMenu { restaurant_id, .. } => {
                Some(restaurant_id)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Stack of visited routes. The initial route is never popped.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::starting_at(Route::default())
    }

    pub fn starting_at(route: Route) -> Self {
        Self { stack: vec![route] }
    }

    pub fn current(&self) -> &Route {
        // The stack always holds the initial route.
        &self.stack[self.stack.len() - 1]
    }

    pub fn navigate(&mut self, route: Route) {
        tracing::debug!("Navigating to {}", route.title());
        self.stack.push(route);
    }

    /// Returns to the previous route. Returns false when already at the start.
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.stack.truncate(1);
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_restaurant_selection() {
        let nav = Navigator::new();
        assert_eq!(nav.current(), &Route::RestaurantSelection);
        assert_eq!(nav.current().title(), "Select Restaurant/Cafe");
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn test_navigate_and_back_carry_params() {
        let mut nav = Navigator::new();
        nav.navigate(Route::MenuManagement {
            restaurant_id: "r1".to_string(),
        });
        nav.navigate(Route::AddEditMenu {
            restaurant_id: "r1".to_string(),
            menu_id: "m1".to_string(),
        });
        assert_eq!(nav.current().title(), "Add/Edit Menu");
        assert_eq!(nav.current().restaurant_id(), Some("r1"));

        assert!(nav.back());
        assert_eq!(nav.current().title(), "Manage Menus");
        assert!(nav.back());
        assert!(!nav.back());
        assert_eq!(nav.current(), &Route::RestaurantSelection);
    }

    #[test]
    fn test_reset_returns_to_start() {
        let mut nav = Navigator::new();
        nav.navigate(Route::OnboardBrand);
        nav.navigate(Route::AddAd { brand_id: None });
        assert_eq!(nav.depth(), 3);
        nav.reset();
        assert_eq!(nav.depth(), 1);
        assert_eq!(nav.current(), &Route::RestaurantSelection);
    }

    #[test]
    fn test_titles() {
        assert_eq!(Route::OnboardBrand.to_string(), "Onboard a Brand");
        assert_eq!(Route::AddAd { brand_id: None }.title(), "Add New Ad");
    }
}
