use super::{Editor, Notice, ScreenResult};
use crate::models::{Dish, DishDraft, EntityKey};
use crate::store::MenuStore;

/// Form for one dish: either the blank "add" row of a category or an existing
/// dish addressed by its local key.
#[derive(Debug, Clone)]
pub struct DishForm {
    restaurant_id: String,
    menu_id: String,
    category_name: String,
    dish: Option<EntityKey>,
    editor: Editor<DishDraft>,
}

impl DishForm {
    pub fn new_dish(
        restaurant_id: impl Into<String>,
        menu_id: impl Into<String>,
        category_name: impl Into<String>,
    ) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            menu_id: menu_id.into(),
            category_name: category_name.into(),
            dish: None,
            editor: Editor::new_item(DishDraft::default()),
        }
    }

    pub fn existing(
        restaurant_id: impl Into<String>,
        menu_id: impl Into<String>,
        category_name: impl Into<String>,
        dish: &Dish,
    ) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            menu_id: menu_id.into(),
            category_name: category_name.into(),
            dish: Some(dish.key),
            editor: Editor::existing(DishDraft::from_dish(dish)),
        }
    }

    pub fn dish_key(&self) -> Option<EntityKey> {
        self.dish
    }

    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    /// Points the form at a renamed category.
    pub(crate) fn retarget(&mut self, category_name: impl Into<String>) {
        self.category_name = category_name.into();
    }

    pub fn editor(&self) -> &Editor<DishDraft> {
        &self.editor
    }

    pub fn is_new_dish(&self) -> bool {
        self.dish.is_none()
    }

    /// Returns false when the fields are read-only.
    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        match self.editor.draft_mut() {
            Some(draft) => {
                draft.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn set_price(&mut self, price: impl Into<String>) -> bool {
        match self.editor.draft_mut() {
            Some(draft) => {
                draft.price = price.into();
                true
            }
            None => false,
        }
    }

    pub fn begin_edit(&mut self) {
        self.editor.begin_edit();
    }

    pub fn cancel(&mut self) {
        self.editor.cancel();
    }

    /// Add for the blank row, Save for an existing dish.
    pub async fn submit(&mut self, store: &mut MenuStore) -> ScreenResult<Dish> {
        if self.is_new_dish() {
            self.add(store).await
        } else {
            self.save(store).await
        }
    }

    /// On success the inputs clear and stay open for the next dish.
    pub async fn add(&mut self, store: &mut MenuStore) -> ScreenResult<Dish> {
        let draft = self.editor.draft().clone();
        if let Err(message) = draft.parse() {
            return Err(Notice::Validation(message));
        }

        self.editor.set_busy(true);
        let result = store
            .add_dish(&self.restaurant_id, &self.menu_id, &self.category_name, &draft)
            .await;
        self.editor.set_busy(false);

        let dish = result.map_err(|e| Notice::from_error(&e, "Failed to add dish."))?;
        self.editor.commit();
        Ok(dish)
    }

    /// On success the fields freeze with the saved values.
    pub async fn save(&mut self, store: &mut MenuStore) -> ScreenResult<Dish> {
        let draft = self.editor.draft().clone();
        if let Err(message) = draft.parse() {
            return Err(Notice::Validation(message));
        }
        let (category, index) = self.locate(store, "Failed to save dish.")?;

        self.editor.set_busy(true);
        let result = store
            .update_dish(&self.restaurant_id, &self.menu_id, &category, index, &draft)
            .await;
        self.editor.set_busy(false);

        let dish = result.map_err(|e| Notice::from_error(&e, "Failed to save dish."))?;
        self.category_name = category;
        self.editor.commit_with(DishDraft::from_dish(&dish));
        Ok(dish)
    }

    pub async fn delete(&mut self, store: &mut MenuStore) -> ScreenResult<Dish> {
        let (category, index) = self.locate(store, "Failed to remove dish.")?;

        self.editor.set_busy(true);
        let result = store
            .remove_dish(&self.restaurant_id, &self.menu_id, &category, index)
            .await;
        self.editor.set_busy(false);

        result.map_err(|e| Notice::from_error(&e, "Failed to remove dish."))
    }

    /// Current category and position of the dish this form edits.
    fn locate(&self, store: &MenuStore, failure: &str) -> ScreenResult<(String, usize)> {
        let key = self
            .dish
            .ok_or_else(|| Notice::Failure(failure.to_string()))?;
        store
            .locate_dish(&self.restaurant_id, &self.menu_id, key)
            .ok_or_else(|| {
                tracing::warn!(
                    "Dish {} no longer exists in '{}'",
                    key.short(),
                    self.category_name
                );
                Notice::Failure(failure.to_string())
            })
    }
}
