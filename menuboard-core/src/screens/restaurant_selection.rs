use std::fmt::Write as _;

use super::{Editor, Notice, ScreenResult};
use crate::models::{Restaurant, RestaurantDraft};
use crate::navigation::Route;
use crate::store::MenuStore;

/// Start screen: every restaurant, a form to add one, and rename in place.
#[derive(Debug)]
pub struct RestaurantSelectionScreen {
    new_restaurant: Editor<RestaurantDraft>,
    renaming: Option<(String, Editor<RestaurantDraft>)>,
}

impl Default for RestaurantSelectionScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl RestaurantSelectionScreen {
    pub fn new() -> Self {
        Self {
            new_restaurant: Editor::new_item(RestaurantDraft::default()),
            renaming: None,
        }
    }

    pub async fn load(&mut self, store: &mut MenuStore) -> ScreenResult<()> {
        store
            .fetch_all()
            .await
            .map_err(|e| Notice::from_error(&e, "Failed to load restaurants."))
    }

    pub fn draft(&self) -> &RestaurantDraft {
        self.new_restaurant.draft()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        if let Some(draft) = self.new_restaurant.draft_mut() {
            draft.name = name.into();
        }
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        if let Some(draft) = self.new_restaurant.draft_mut() {
            draft.location = location.into();
        }
    }

    /// "Add New Restaurant/Cafe". Both fields are required.
    pub async fn add_restaurant(&mut self, store: &mut MenuStore) -> ScreenResult<Restaurant> {
        let draft = self.new_restaurant.draft().clone();
        self.new_restaurant.set_busy(true);
        let result = store.add_restaurant(&draft).await;
        self.new_restaurant.set_busy(false);

        let created = result.map_err(|e| Notice::from_error(&e, "Failed to add restaurant."))?;
        self.new_restaurant.commit();
        Ok(created)
    }

    pub fn begin_rename(&mut self, store: &MenuStore, restaurant_id: &str) -> ScreenResult<()> {
        let restaurant = store
            .restaurant(restaurant_id)
            .ok_or_else(|| Notice::Failure(format!("Restaurant not found: {}", restaurant_id)))?;
        let mut editor = Editor::existing(RestaurantDraft::from_restaurant(restaurant));
        editor.begin_edit();
        self.renaming = Some((restaurant_id.to_string(), editor));
        Ok(())
    }

    pub fn renaming(&self) -> Option<&str> {
        self.renaming.as_ref().map(|(id, _)| id.as_str())
    }

    pub fn set_rename(&mut self, name: impl Into<String>) -> bool {
        match self
            .renaming
            .as_mut()
            .and_then(|(_, editor)| editor.draft_mut())
        {
            Some(draft) => {
                draft.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn cancel_rename(&mut self) {
        self.renaming = None;
    }

    pub async fn save_rename(&mut self, store: &mut MenuStore) -> ScreenResult<()> {
        let (id, draft) = match &self.renaming {
            Some((id, editor)) => (id.clone(), editor.draft().clone()),
            None => return Ok(()),
        };
        store
            .update_restaurant(&id, &draft)
            .await
            .map_err(|e| Notice::from_error(&e, "Failed to rename restaurant."))?;
        self.renaming = None;
        Ok(())
    }

    /// "Manage Menus" for one restaurant.
    pub fn select(&self, store: &mut MenuStore, restaurant_id: &str) -> ScreenResult<Route> {
        if store.restaurant(restaurant_id).is_none() {
            return Err(Notice::Failure(format!(
                "Restaurant not found: {}",
                restaurant_id
            )));
        }
        store.select_restaurant(Some(restaurant_id.to_string()));
        Ok(Route::MenuManagement {
            restaurant_id: restaurant_id.to_string(),
        })
    }

    pub fn render(&self, store: &MenuStore) -> String {
        if store.is_loading() {
            return "Loading...\n".to_string();
        }
        let mut out = String::new();
        if store.restaurants().is_empty() {
            let _ = writeln!(out, "No restaurants yet");
        }
        for restaurant in store.restaurants() {
            let name = match &self.renaming {
                Some((id, editor)) if *id == restaurant.id => {
                    format!("{} (renaming to '{}')", restaurant.name, editor.draft().name)
                }
                _ => restaurant.name.clone(),
            };
            let _ = writeln!(out, "  {} [{}] {}", name, restaurant.id, restaurant.location);
        }
        out
    }
}
