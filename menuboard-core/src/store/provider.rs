//! The shared restaurant/menu state consumed by every screen.
//!
//! Writes go to the backend first. Only after the backend accepted a write is
//! the matching branch of the local tree patched; operations that the backend
//! owns more of (restaurant and menu edits) additionally re-fetch the whole
//! list and reconcile against it.

use serde_json::Value;

use super::error::{StoreError, StoreResult};
use super::tree;
use crate::api::{ApiClient, ApiError};
use crate::models::{
    Category, CategoryDraft, Dish, DishDraft, EntityKey, Menu, MenuDraft, Restaurant,
    RestaurantDraft,
};

/// Application state mirrored from the backend.
#[derive(Debug)]
pub struct MenuStore {
    api: ApiClient,
    restaurants: Vec<Restaurant>,
    loading: bool,
    selected_restaurant: Option<String>,
}

impl MenuStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            restaurants: Vec::new(),
            loading: false,
            selected_restaurant: None,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // ------------------------------------------------------------------
    // Snapshot access
    // ------------------------------------------------------------------

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn restaurant(&self, restaurant_id: &str) -> Option<&Restaurant> {
        self.restaurants.iter().find(|r| r.id == restaurant_id)
    }

    pub fn menu(&self, restaurant_id: &str, menu_id: &str) -> Option<&Menu> {
        self.restaurant(restaurant_id)?.menu(menu_id)
    }

    pub fn category(&self, restaurant_id: &str, menu_id: &str, key: EntityKey) -> Option<&Category> {
        self.menu(restaurant_id, menu_id)?
            .categories
            .iter()
            .find(|c| c.key == key)
    }

    /// Current position of a category, for the index-addressed backend routes.
    pub fn locate_category(&self, restaurant_id: &str, menu_id: &str, key: EntityKey) -> Option<usize> {
        self.menu(restaurant_id, menu_id)?.category_position(key)
    }

    /// Category name and current position of a dish.
    pub fn locate_dish(
        &self,
        restaurant_id: &str,
        menu_id: &str,
        key: EntityKey,
    ) -> Option<(String, usize)> {
        self.menu(restaurant_id, menu_id)?
            .categories
            .iter()
            .find_map(|c| c.dish_position(key).map(|i| (c.name.clone(), i)))
    }

    pub fn selected_restaurant(&self) -> Option<&str> {
        self.selected_restaurant.as_deref()
    }

    pub fn select_restaurant(&mut self, restaurant_id: Option<String>) {
        self.selected_restaurant = restaurant_id;
    }

    // ------------------------------------------------------------------
    // Restaurants
    // ------------------------------------------------------------------

    /// Loads the full restaurant list. `is_loading` is true only while the
    /// request is in flight.
    pub async fn fetch_all(&mut self) -> StoreResult<()> {
        self.loading = true;
        let result = self.api.list_restaurants().await;
        self.loading = false;

        match result {
            Ok(mut fresh) => {
                tree::adopt_keys(&self.restaurants, &mut fresh);
                tracing::debug!("Loaded {} restaurant(s)", fresh.len());
                self.restaurants = fresh;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Error fetching restaurants: {}", e);
                Err(e.into())
            }
        }
    }

    /// Fetches one restaurant without touching the shared list.
    pub async fn fetch_one(&self, restaurant_id: &str) -> StoreResult<Restaurant> {
        self.api.get_restaurant(restaurant_id).await.map_err(|e| {
            tracing::warn!("Error fetching restaurant {}: {}", restaurant_id, e);
            e.into()
        })
    }

    pub async fn add_restaurant(&mut self, draft: &RestaurantDraft) -> StoreResult<Restaurant> {
        if !draft.is_complete() {
            return Err(StoreError::Validation(
                "Please enter both a name and a location.".to_string(),
            ));
        }
        let draft = RestaurantDraft::new(draft.name.trim(), draft.location.trim());

        let created = self.api.create_restaurant(&draft).await.map_err(|e| {
            tracing::warn!("Error adding restaurant: {}", e);
            StoreError::from(e)
        })?;

        tracing::info!("Added restaurant '{}' ({})", created.name, created.id);
        self.restaurants.push(created.clone());
        Ok(created)
    }

    pub async fn update_restaurant(
        &mut self,
        restaurant_id: &str,
        draft: &RestaurantDraft,
    ) -> StoreResult<()> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::Validation(
                "Restaurant name cannot be empty".to_string(),
            ));
        }
        self.require_restaurant(restaurant_id)?;
        let draft = RestaurantDraft::new(draft.name.trim(), draft.location.trim());

        self.api
            .update_restaurant(restaurant_id, &draft)
            .await
            .map_err(|e| {
                tracing::warn!("Error updating restaurant: {}", e);
                StoreError::from(e)
            })?;

        let restaurant = tree::restaurant_mut(&mut self.restaurants, restaurant_id)?;
        restaurant.name = draft.name;
        if !draft.location.is_empty() {
            restaurant.location = draft.location;
        }
        self.refresh_after_write("update restaurant").await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Menus
    // ------------------------------------------------------------------

    /// Creates a menu and returns the backend id.
    ///
    /// A pending placeholder is visible while the request runs. It is dropped
    /// if the backend rejects the menu and replaced by the re-fetched tree
    /// otherwise. Any accepted POST is followed by a re-fetch, even when the
    /// response does not name the new id.
    pub async fn add_menu(&mut self, restaurant_id: &str, name: &str) -> StoreResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation(
                "Menu name cannot be empty".to_string(),
            ));
        }
        let known: Vec<String> = self
            .require_restaurant(restaurant_id)?
            .menus
            .iter()
            .map(|m| m.id.clone())
            .collect();

        let placeholder = Menu::placeholder(name);
        let temp_id = placeholder.id.clone();
        tree::insert_menu(&mut self.restaurants, restaurant_id, placeholder)?;

        let created = match self.api.create_menu(restaurant_id, &MenuDraft::new(name)).await {
            Ok(created) => created,
            Err(e) => {
                tracing::warn!("Error adding menu: {}", e);
                tree::discard_menu(&mut self.restaurants, restaurant_id, &temp_id);
                return Err(e.into());
            }
        };
        let refreshed = self.fetch_all().await.is_ok();

        let menu_id = match created {
            Some(menu_id) => {
                if !refreshed {
                    tree::confirm_menu(&mut self.restaurants, restaurant_id, &temp_id, &menu_id)?;
                }
                menu_id
            }
            None => {
                if !refreshed {
                    tree::discard_menu(&mut self.restaurants, restaurant_id, &temp_id);
                }
                self.new_menu_id(restaurant_id, name, &known).ok_or_else(|| {
                    tracing::warn!("Menu '{}' was created but its id is unknown", name);
                    ApiError::Decode("menu created without an id".to_string())
                })?
            }
        };

        tracing::info!("Menu created successfully: {}", menu_id);
        Ok(menu_id)
    }

    pub async fn update_menu(
        &mut self,
        restaurant_id: &str,
        menu_id: &str,
        draft: &MenuDraft,
    ) -> StoreResult<()> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::Validation(
                "Menu name cannot be empty".to_string(),
            ));
        }
        self.require_menu(restaurant_id, menu_id)?;
        let draft = MenuDraft {
            name: draft.name.trim().to_string(),
            welcome_text: draft.welcome_text.clone(),
        };

        self.api
            .update_menu(restaurant_id, menu_id, &draft)
            .await
            .map_err(|e| {
                tracing::warn!("Error updating menu: {}", e);
                StoreError::from(e)
            })?;

        tree::rename_menu(
            &mut self.restaurants,
            restaurant_id,
            menu_id,
            &draft.name,
            draft.welcome_text.as_deref(),
        )?;
        self.refresh_after_write("update menu").await;
        Ok(())
    }

    pub async fn remove_menu(&mut self, restaurant_id: &str, menu_id: &str) -> StoreResult<()> {
        self.require_menu(restaurant_id, menu_id)?;

        self.api
            .delete_menu(restaurant_id, menu_id)
            .await
            .map_err(|e| {
                tracing::warn!("Error removing menu: {}", e);
                StoreError::from(e)
            })?;

        tree::remove_menu(&mut self.restaurants, restaurant_id, menu_id)?;
        self.refresh_after_write("remove menu").await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub async fn add_category(
        &mut self,
        restaurant_id: &str,
        menu_id: &str,
        name: &str,
    ) -> StoreResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation(
                "Please enter a category name.".to_string(),
            ));
        }
        let menu = self.require_menu(restaurant_id, menu_id)?;
        if menu.category_by_name(name).is_some() {
            return Err(StoreError::DuplicateCategory(name.to_string()));
        }

        let draft = CategoryDraft::new(name);
        let response = self
            .api
            .create_category(restaurant_id, menu_id, &draft)
            .await
            .map_err(|e| {
                tracing::warn!("Error adding category: {}", e);
                StoreError::from(e)
            })?;

        let category = merge_created_category(&draft, response);
        tree::append_category(&mut self.restaurants, restaurant_id, menu_id, category.clone())?;
        tracing::info!("Added category '{}'", category.name);
        Ok(category)
    }

    pub async fn update_category(
        &mut self,
        restaurant_id: &str,
        menu_id: &str,
        index: usize,
        name: &str,
    ) -> StoreResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation(
                "Please enter a category name.".to_string(),
            ));
        }
        let menu = self.require_menu(restaurant_id, menu_id)?;
        if index >= menu.categories.len() {
            return Err(StoreError::CategoryIndex(index));
        }
        let clash = menu
            .categories
            .iter()
            .enumerate()
            .any(|(i, c)| i != index && c.name == name);
        if clash {
            return Err(StoreError::DuplicateCategory(name.to_string()));
        }

        let response = self
            .api
            .update_category(restaurant_id, menu_id, index, name)
            .await
            .map_err(|e| {
                tracing::warn!("Error updating category: {}", e);
                StoreError::from(e)
            })?;

        let confirmed = response
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(name);
        tree::rename_category(&mut self.restaurants, restaurant_id, menu_id, index, confirmed)?;
        Ok(())
    }

    /// Removes the category at `index` together with its dishes.
    pub async fn remove_category(
        &mut self,
        restaurant_id: &str,
        menu_id: &str,
        index: usize,
    ) -> StoreResult<Category> {
        let menu = self.require_menu(restaurant_id, menu_id)?;
        if index >= menu.categories.len() {
            return Err(StoreError::CategoryIndex(index));
        }

        self.api
            .delete_category(restaurant_id, menu_id, index)
            .await
            .map_err(|e| {
                tracing::warn!("Error removing category: {}", e);
                StoreError::from(e)
            })?;

        tree::remove_category(&mut self.restaurants, restaurant_id, menu_id, index)
    }

    // ------------------------------------------------------------------
    // Dishes
    // ------------------------------------------------------------------

    /// Adds a dish and returns the backend's copy so the form can reset.
    pub async fn add_dish(
        &mut self,
        restaurant_id: &str,
        menu_id: &str,
        category_name: &str,
        draft: &DishDraft,
    ) -> StoreResult<Dish> {
        let input = draft.parse().map_err(StoreError::Validation)?;
        self.require_category(restaurant_id, menu_id, category_name)?;

        let echoed = self
            .api
            .create_dish(restaurant_id, menu_id, category_name, &input)
            .await
            .map_err(|e| {
                tracing::warn!("Error adding dish: {}", e);
                StoreError::from(e)
            })?;
        // Without an echo the backend stored what was sent.
        let created = echoed.unwrap_or_else(|| Dish::from(input));

        tree::append_dish(
            &mut self.restaurants,
            restaurant_id,
            menu_id,
            category_name,
            created.clone(),
        )?;
        tracing::info!("Added dish '{}' to '{}'", created.name, category_name);
        Ok(created)
    }

    pub async fn update_dish(
        &mut self,
        restaurant_id: &str,
        menu_id: &str,
        category_name: &str,
        index: usize,
        draft: &DishDraft,
    ) -> StoreResult<Dish> {
        let input = draft.parse().map_err(StoreError::Validation)?;
        let category = self.require_category(restaurant_id, menu_id, category_name)?;
        if index >= category.dishes.len() {
            return Err(StoreError::DishIndex {
                category: category_name.to_string(),
                index,
            });
        }

        let response = self
            .api
            .update_dish(restaurant_id, menu_id, category_name, index, &input)
            .await
            .map_err(|e| {
                tracing::warn!("Error updating dish: {}", e);
                StoreError::from(e)
            })?;

        // Prefer what the backend stored when it tells us.
        let dish = serde_json::from_value::<Dish>(response).unwrap_or_else(|_| Dish::from(input));
        tree::replace_dish(
            &mut self.restaurants,
            restaurant_id,
            menu_id,
            category_name,
            index,
            dish,
        )
    }

    pub async fn remove_dish(
        &mut self,
        restaurant_id: &str,
        menu_id: &str,
        category_name: &str,
        index: usize,
    ) -> StoreResult<Dish> {
        let category = self.require_category(restaurant_id, menu_id, category_name)?;
        if index >= category.dishes.len() {
            return Err(StoreError::DishIndex {
                category: category_name.to_string(),
                index,
            });
        }

        self.api
            .delete_dish(restaurant_id, menu_id, category_name, index)
            .await
            .map_err(|e| {
                tracing::warn!("Error removing dish: {}", e);
                StoreError::from(e)
            })?;

        tree::remove_dish(
            &mut self.restaurants,
            restaurant_id,
            menu_id,
            category_name,
            index,
        )
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn require_restaurant(&self, restaurant_id: &str) -> StoreResult<&Restaurant> {
        self.restaurant(restaurant_id)
            .ok_or_else(|| StoreError::RestaurantNotFound(restaurant_id.to_string()))
    }

    fn require_menu(&self, restaurant_id: &str, menu_id: &str) -> StoreResult<&Menu> {
        self.require_restaurant(restaurant_id)?
            .menu(menu_id)
            .ok_or_else(|| StoreError::MenuNotFound(menu_id.to_string()))
    }

    fn require_category(
        &self,
        restaurant_id: &str,
        menu_id: &str,
        category_name: &str,
    ) -> StoreResult<&Category> {
        self.require_menu(restaurant_id, menu_id)?
            .category_by_name(category_name)
            .ok_or_else(|| StoreError::CategoryNotFound(category_name.to_string()))
    }

    /// The id of a menu named `name` that was not in `known` before the write.
    fn new_menu_id(&self, restaurant_id: &str, name: &str, known: &[String]) -> Option<String> {
        self.restaurant(restaurant_id)?
            .menus
            .iter()
            .rev()
            .find(|m| !m.pending && m.name == name && !known.contains(&m.id))
            .map(|m| m.id.clone())
    }

    /// Re-fetches after a write that already succeeded. A failed refresh keeps
    /// the local patch.
    async fn refresh_after_write(&mut self, operation: &str) {
        if let Err(e) = self.fetch_all().await {
            tracing::warn!("Refresh after {} failed, keeping local state: {}", operation, e);
        }
    }
}

/// The created category is the submitted draft overlaid with whatever fields
/// the backend returned.
fn merge_created_category(draft: &CategoryDraft, response: Value) -> Category {
    let mut merged = serde_json::to_value(draft).unwrap_or(Value::Null);
    if let (Value::Object(base), Value::Object(extra)) = (&mut merged, response) {
        for (k, v) in extra {
            base.insert(k, v);
        }
    }
    serde_json::from_value(merged).unwrap_or_else(|_| Category::new(draft.name.clone()))
}
