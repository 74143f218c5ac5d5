use std::collections::HashMap;
use std::fmt::Write as _;

use super::{DishForm, Editor, Notice, ScreenResult};
use crate::models::{Category, EntityKey};
use crate::store::{MenuStore, StoreError};

/// The "Add Category" panel of the menu editor: new category input, one
/// rename editor at a time, and the dish forms under each category.
#[derive(Debug)]
pub struct CategoryEditor {
    restaurant_id: String,
    menu_id: String,
    new_category: Editor<String>,
    renaming: Option<(EntityKey, Editor<String>)>,
    new_dishes: HashMap<EntityKey, DishForm>,
    dishes: HashMap<EntityKey, DishForm>,
}

impl CategoryEditor {
    pub fn new(restaurant_id: impl Into<String>, menu_id: impl Into<String>) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            menu_id: menu_id.into(),
            new_category: Editor::new_item(String::new()),
            renaming: None,
            new_dishes: HashMap::new(),
            dishes: HashMap::new(),
        }
    }

    pub fn new_category_name(&self) -> &str {
        self.new_category.draft()
    }

    pub fn set_new_category_name(&mut self, name: impl Into<String>) {
        if let Some(draft) = self.new_category.draft_mut() {
            *draft = name.into();
        }
    }

    pub async fn add_category(&mut self, store: &mut MenuStore) -> ScreenResult<Category> {
        let name = self.new_category.draft().clone();
        self.new_category.set_busy(true);
        let result = store
            .add_category(&self.restaurant_id, &self.menu_id, &name)
            .await;
        self.new_category.set_busy(false);

        let category = result.map_err(|e| Notice::from_error(&e, "Failed to add category."))?;
        self.new_category.commit();
        Ok(category)
    }

    // ------------------------------------------------------------------
    // Rename
    // ------------------------------------------------------------------

    /// Opens the rename editor for one category, closing any other.
    pub fn begin_rename(&mut self, store: &MenuStore, key: EntityKey) -> ScreenResult<()> {
        let category = self.category(store, key)?;
        let mut editor = Editor::existing(category.name.clone());
        editor.begin_edit();
        self.renaming = Some((key, editor));
        Ok(())
    }

    pub fn renaming(&self) -> Option<EntityKey> {
        self.renaming.as_ref().map(|(key, _)| *key)
    }

    pub fn set_rename(&mut self, name: impl Into<String>) -> bool {
        match self
            .renaming
            .as_mut()
            .and_then(|(_, editor)| editor.draft_mut())
        {
            Some(draft) => {
                *draft = name.into();
                true
            }
            None => false,
        }
    }

    pub fn cancel_rename(&mut self) {
        self.renaming = None;
    }

    pub async fn save_rename(&mut self, store: &mut MenuStore) -> ScreenResult<()> {
        let (key, name) = match &self.renaming {
            Some((key, editor)) => (*key, editor.draft().clone()),
            None => return Ok(()),
        };
        let index = store
            .locate_category(&self.restaurant_id, &self.menu_id, key)
            .ok_or_else(|| Notice::Failure("Failed to update category.".to_string()))?;

        store
            .update_category(&self.restaurant_id, &self.menu_id, index, &name)
            .await
            .map_err(|e| Notice::from_error(&e, "Failed to update category."))?;

        let renamed = self.category(store, key)?.name.clone();
        if let Some(form) = self.new_dishes.get_mut(&key) {
            form.retarget(renamed.clone());
        }
        for form in self.dishes.values_mut() {
            if let Some(dish) = form.dish_key() {
                if store
                    .locate_dish(&self.restaurant_id, &self.menu_id, dish)
                    .is_some_and(|(category, _)| category == renamed)
                {
                    form.retarget(renamed.clone());
                }
            }
        }
        self.renaming = None;
        Ok(())
    }

    /// Deletes a category together with its dishes.
    pub async fn remove_category(
        &mut self,
        store: &mut MenuStore,
        key: EntityKey,
    ) -> ScreenResult<Category> {
        let index = store
            .locate_category(&self.restaurant_id, &self.menu_id, key)
            .ok_or_else(|| Notice::Failure("Failed to remove category.".to_string()))?;

        let removed = store
            .remove_category(&self.restaurant_id, &self.menu_id, index)
            .await
            .map_err(|e| Notice::from_error(&e, "Failed to remove category."))?;

        if self.renaming() == Some(key) {
            self.renaming = None;
        }
        self.sync(store);
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Dish forms
    // ------------------------------------------------------------------

    /// The blank "add dish" form of a category.
    pub fn new_dish_form(&mut self, store: &MenuStore, key: EntityKey) -> ScreenResult<&mut DishForm> {
        let name = self.category(store, key)?.name.clone();
        let (restaurant_id, menu_id) = (&self.restaurant_id, &self.menu_id);
        Ok(self
            .new_dishes
            .entry(key)
            .or_insert_with(|| DishForm::new_dish(restaurant_id.clone(), menu_id.clone(), name)))
    }

    /// The form of an existing dish, created on first use.
    pub fn dish_form(&mut self, store: &MenuStore, dish: EntityKey) -> ScreenResult<&mut DishForm> {
        let (category_name, index) = store
            .locate_dish(&self.restaurant_id, &self.menu_id, dish)
            .ok_or_else(|| Notice::Failure("Dish not found.".to_string()))?;
        let current = store
            .menu(&self.restaurant_id, &self.menu_id)
            .and_then(|m| m.category_by_name(&category_name))
            .and_then(|c| c.dishes.get(index))
            .ok_or_else(|| Notice::Failure("Dish not found.".to_string()))?;
        let (restaurant_id, menu_id) = (&self.restaurant_id, &self.menu_id);
        Ok(self.dishes.entry(dish).or_insert_with(|| {
            DishForm::existing(restaurant_id.clone(), menu_id.clone(), category_name, current)
        }))
    }

    /// Drops forms whose category or dish no longer exists.
    pub fn sync(&mut self, store: &MenuStore) {
        let (restaurant_id, menu_id) = (self.restaurant_id.as_str(), self.menu_id.as_str());
        self.new_dishes
            .retain(|key, _| store.category(restaurant_id, menu_id, *key).is_some());
        self.dishes
            .retain(|key, _| store.locate_dish(restaurant_id, menu_id, *key).is_some());
    }

    pub fn render(&self, store: &MenuStore) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Add a New Category");
        let _ = writeln!(out, "  > {}", self.new_category.draft());

        let menu = match store.menu(&self.restaurant_id, &self.menu_id) {
            Some(menu) => menu,
            None => {
                let _ = writeln!(out, "\nMenu not found");
                return out;
            }
        };
        if menu.categories.is_empty() {
            let _ = writeln!(out, "\nNo categories yet");
        }
        for (i, category) in menu.categories.iter().enumerate() {
            let title = match &self.renaming {
                Some((key, editor)) if *key == category.key => {
                    format!("{} (renaming to '{}')", category.name, editor.draft())
                }
                _ => category.name.clone(),
            };
            let _ = writeln!(out, "\n{}. {} [{}]", i + 1, title, category.key.short());
            if category.dishes.is_empty() {
                let _ = writeln!(out, "   No dishes yet");
            }
            for (j, dish) in category.dishes.iter().enumerate() {
                let editing = self
                    .dishes
                    .get(&dish.key)
                    .filter(|form| form.editor().is_editing());
                match editing {
                    Some(form) => {
                        let draft = form.editor().draft();
                        let _ = writeln!(out, "   {}. {} / {} (editing)", j + 1, draft.name, draft.price);
                    }
                    None => {
                        let _ = writeln!(out, "   {}. {} [{}]", j + 1, dish, dish.key.short());
                    }
                }
            }
        }
        out
    }

    fn category<'a>(&self, store: &'a MenuStore, key: EntityKey) -> ScreenResult<&'a Category> {
        store
            .category(&self.restaurant_id, &self.menu_id, key)
            .ok_or_else(|| {
                let err = StoreError::CategoryNotFound(key.short());
                Notice::Failure(err.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn loaded(server: &MockServer) -> MenuStore {
        Mock::given(method("GET"))
            .and(path("/restaurants"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "_id": "r1", "name": "Cafe A", "location": "Main St",
                "menus": [{"id": "m1", "name": "Lunch", "categories": [
                    {"name": "Starters", "dishes": [{"name": "Soup", "price": "5"}]},
                    {"name": "Drinks", "dishes": []}
                ]}]
            }])))
            .mount(server)
            .await;
        let mut store = MenuStore::new(ApiClient::new(server.uri()));
        store.fetch_all().await.unwrap();
        store
    }

    fn key_of(store: &MenuStore, name: &str) -> EntityKey {
        store
            .menu("r1", "m1")
            .unwrap()
            .category_by_name(name)
            .unwrap()
            .key
    }

    #[tokio::test]
    async fn test_add_category_clears_input() {
        let server = MockServer::start().await;
        let mut store = loaded(&server).await;
        Mock::given(method("POST"))
            .and(path("/restaurants/r1/menus/m1/categories"))
            .and(body_json(json!({"name": "Desserts", "dishes": []})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let mut editor = CategoryEditor::new("r1", "m1");
        editor.set_new_category_name("Desserts");
        editor.add_category(&mut store).await.unwrap();

        assert_eq!(editor.new_category_name(), "");
        assert!(editor.render(&store).contains("3. Desserts"));
    }

    #[tokio::test]
    async fn test_duplicate_name_is_validation() {
        let server = MockServer::start().await;
        let mut store = loaded(&server).await;

        let mut editor = CategoryEditor::new("r1", "m1");
        editor.set_new_category_name("Drinks");
        let notice = editor.add_category(&mut store).await.unwrap_err();

        assert!(notice.is_validation());
        assert_eq!(editor.new_category_name(), "Drinks");
    }

    #[tokio::test]
    async fn test_rename_uses_current_position() {
        let server = MockServer::start().await;
        let mut store = loaded(&server).await;
        Mock::given(method("PUT"))
            .and(path("/restaurants/r1/menus/m1/categories/1"))
            .and(body_json(json!({"name": "Beverages"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let drinks = key_of(&store, "Drinks");
        let mut editor = CategoryEditor::new("r1", "m1");
        editor.new_dish_form(&store, drinks).unwrap();
        editor.begin_rename(&store, drinks).unwrap();
        assert!(editor.set_rename("Beverages"));
        editor.save_rename(&mut store).await.unwrap();

        assert_eq!(editor.renaming(), None);
        assert_eq!(store.category("r1", "m1", drinks).unwrap().name, "Beverages");
        let form = editor.new_dish_form(&store, drinks).unwrap();
        assert_eq!(form.category_name(), "Beverages");
    }

    #[tokio::test]
    async fn test_remove_category_drops_its_forms() {
        let server = MockServer::start().await;
        let mut store = loaded(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/restaurants/r1/menus/m1/categories/0"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let starters = key_of(&store, "Starters");
        let soup = store.category("r1", "m1", starters).unwrap().dishes[0].key;
        let mut editor = CategoryEditor::new("r1", "m1");
        editor.dish_form(&store, soup).unwrap();

        let removed = editor.remove_category(&mut store, starters).await.unwrap();

        assert_eq!(removed.name, "Starters");
        assert!(editor.dish_form(&store, soup).is_err());
        assert_eq!(store.locate_category("r1", "m1", key_of(&store, "Drinks")), Some(0));
    }

    #[tokio::test]
    async fn test_dish_forms_drive_the_category() {
        let server = MockServer::start().await;
        let mut store = loaded(&server).await;
        Mock::given(method("POST"))
            .and(path("/restaurants/r1/menus/m1/categories/Drinks/dishes"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"name": "Tea", "price": "3"})),
            )
            .mount(&server)
            .await;

        let drinks = key_of(&store, "Drinks");
        let mut editor = CategoryEditor::new("r1", "m1");
        let form = editor.new_dish_form(&store, drinks).unwrap();
        form.set_name("Tea");
        form.set_price("3");
        form.add(&mut store).await.unwrap();

        let rendered = editor.render(&store);
        assert!(rendered.contains("Tea - $3.00"));
    }
}
