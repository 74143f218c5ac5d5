use std::fmt::Write as _;

use super::{Notice, ScreenResult};
use crate::models::Restaurant;
use crate::navigation::Route;
use crate::store::MenuStore;

/// Lists the menus of one restaurant and hosts the "create menu" modal.
///
/// The screen keeps its own copy of the restaurant, fetched directly, next to
/// the shared list in the store.
#[derive(Debug)]
pub struct MenuManagementScreen {
    restaurant_id: String,
    restaurant: Option<Restaurant>,
    modal_open: bool,
    new_menu_name: String,
    busy: bool,
}

impl MenuManagementScreen {
    pub fn new(restaurant_id: impl Into<String>) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            restaurant: None,
            modal_open: false,
            new_menu_name: String::new(),
            busy: false,
        }
    }

    pub fn restaurant(&self) -> Option<&Restaurant> {
        self.restaurant.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub async fn load(&mut self, store: &mut MenuStore) -> ScreenResult<()> {
        self.busy = true;
        let fetched = store.fetch_one(&self.restaurant_id).await;
        self.busy = false;
        let restaurant = fetched.map_err(|e| Notice::from_error(&e, "Failed to load restaurant."))?;
        self.restaurant = Some(restaurant);

        // Writes go through the shared list, so it has to know this restaurant.
        if store.restaurant(&self.restaurant_id).is_none() {
            store
                .fetch_all()
                .await
                .map_err(|e| Notice::from_error(&e, "Failed to load restaurant."))?;
        }
        Ok(())
    }

    pub fn open_create_menu(&mut self) {
        self.modal_open = true;
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn new_menu_name(&self) -> &str {
        &self.new_menu_name
    }

    pub fn set_new_menu_name(&mut self, name: impl Into<String>) {
        self.new_menu_name = name.into();
    }

    /// Creates the menu typed into the modal and returns the editor route for
    /// it. A blank name just closes the modal.
    pub async fn create_menu(&mut self, store: &mut MenuStore) -> ScreenResult<Option<Route>> {
        let name = self.new_menu_name.trim().to_string();
        if name.is_empty() {
            self.close_modal();
            return Ok(None);
        }

        self.busy = true;
        let result = store.add_menu(&self.restaurant_id, &name).await;
        self.busy = false;
        let menu_id = result.map_err(|e| Notice::from_error(&e, "Failed to create menu."))?;

        self.close_modal();
        self.refresh(store).await;
        Ok(Some(Route::AddEditMenu {
            restaurant_id: self.restaurant_id.clone(),
            menu_id,
        }))
    }

    pub fn edit_menu(&self, menu_id: &str) -> Route {
        Route::AddEditMenu {
            restaurant_id: self.restaurant_id.clone(),
            menu_id: menu_id.to_string(),
        }
    }

    pub async fn remove_menu(&mut self, store: &mut MenuStore, menu_id: &str) -> ScreenResult<()> {
        self.busy = true;
        let result = store.remove_menu(&self.restaurant_id, menu_id).await;
        self.busy = false;
        result.map_err(|e| Notice::from_error(&e, "Failed to remove menu."))?;
        self.refresh(store).await;
        Ok(())
    }

    fn close_modal(&mut self) {
        self.modal_open = false;
        self.new_menu_name.clear();
    }

    async fn refresh(&mut self, store: &MenuStore) {
        match store.fetch_one(&self.restaurant_id).await {
            Ok(restaurant) => self.restaurant = Some(restaurant),
            Err(e) => {
                tracing::warn!("Error fetching restaurant data: {}", e);
                if let Some(shared) = store.restaurant(&self.restaurant_id) {
                    self.restaurant = Some(shared.clone());
                }
            }
        }
    }

    pub fn render(&self) -> String {
        let restaurant = match &self.restaurant {
            Some(r) => r,
            None => return "Loading...\n".to_string(),
        };

        let mut out = String::new();
        let _ = writeln!(out, "{}", restaurant.name);
        if restaurant.menus.is_empty() {
            let _ = writeln!(out, "\nNo menus available");
        }
        for menu in &restaurant.menus {
            let _ = writeln!(out, "  - {} [{}]", menu.name, menu.id);
        }
        if self.modal_open {
            let _ = writeln!(out, "\nCreate New Menu");
            let _ = writeln!(out, "  Menu name: {}", self.new_menu_name);
        }
        out
    }
}
