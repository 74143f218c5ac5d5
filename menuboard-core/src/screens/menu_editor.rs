use std::fmt::Write as _;

use super::{CategoryEditor, Editor, Notice, PreviewScreen, ScreenResult};
use crate::models::MenuDraft;
use crate::navigation::Route;
use crate::store::{MenuStore, StoreError};

/// The "Add/Edit Menu" screen: menu details, the category panel and the
/// live preview side by side.
#[derive(Debug)]
pub struct MenuEditorScreen {
    restaurant_id: String,
    menu_id: String,
    details: Editor<MenuDraft>,
    categories: CategoryEditor,
    preview: PreviewScreen,
    loading: bool,
    missing: bool,
}

impl MenuEditorScreen {
    pub fn new(restaurant_id: impl Into<String>, menu_id: impl Into<String>) -> Self {
        let restaurant_id = restaurant_id.into();
        let menu_id = menu_id.into();
        Self {
            details: Editor::existing(MenuDraft::default()),
            categories: CategoryEditor::new(restaurant_id.clone(), menu_id.clone()),
            preview: PreviewScreen::new(restaurant_id.clone(), menu_id.clone()),
            restaurant_id,
            menu_id,
            loading: false,
            missing: false,
        }
    }

    pub fn restaurant_id(&self) -> &str {
        &self.restaurant_id
    }

    pub fn menu_id(&self) -> &str {
        &self.menu_id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_missing(&self) -> bool {
        self.missing
    }

    /// Checks the menu against a fresh copy of its restaurant and brings the
    /// shared list up to date when it lags behind.
    pub async fn load(&mut self, store: &mut MenuStore) -> ScreenResult<()> {
        self.loading = true;
        let fetched = store.fetch_one(&self.restaurant_id).await;
        self.loading = false;

        let restaurant = match fetched {
            Ok(restaurant) => restaurant,
            Err(StoreError::Api(e)) if e.is_not_found() => {
                self.missing = true;
                return Ok(());
            }
            Err(e) => return Err(Notice::from_error(&e, "Failed to load menu.")),
        };

        let menu = match restaurant.menu(&self.menu_id) {
            Some(menu) => menu,
            None => {
                tracing::debug!("Menu {} not found, offering the way back", self.menu_id);
                self.missing = true;
                return Ok(());
            }
        };
        self.missing = false;
        self.details = Editor::existing(MenuDraft::from_menu(menu));

        if store.menu(&self.restaurant_id, &self.menu_id).is_none() {
            store
                .fetch_all()
                .await
                .map_err(|e| Notice::from_error(&e, "Failed to load menu."))?;
        }
        self.categories.sync(store);
        Ok(())
    }

    /// Where "Back to Menu Management" leads.
    pub fn back_route(&self) -> Route {
        Route::MenuManagement {
            restaurant_id: self.restaurant_id.clone(),
        }
    }

    pub fn details(&self) -> &Editor<MenuDraft> {
        &self.details
    }

    pub fn begin_edit_details(&mut self) {
        self.details.begin_edit();
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        match self.details.draft_mut() {
            Some(draft) => {
                draft.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Blank text clears the welcome line.
    pub fn set_welcome_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        match self.details.draft_mut() {
            Some(draft) => {
                draft.welcome_text = if text.trim().is_empty() { None } else { Some(text) };
                true
            }
            None => false,
        }
    }

    pub fn cancel_details(&mut self) {
        self.details.cancel();
    }

    pub async fn save_details(&mut self, store: &mut MenuStore) -> ScreenResult<()> {
        let draft = self.details.draft().clone();
        self.details.set_busy(true);
        let result = store
            .update_menu(&self.restaurant_id, &self.menu_id, &draft)
            .await;
        self.details.set_busy(false);
        result.map_err(|e| Notice::from_error(&e, "Failed to update menu."))?;

        let saved = store
            .menu(&self.restaurant_id, &self.menu_id)
            .map(MenuDraft::from_menu)
            .unwrap_or(draft);
        self.details.commit_with(saved);
        Ok(())
    }

    pub fn categories(&self) -> &CategoryEditor {
        &self.categories
    }

    pub fn categories_mut(&mut self) -> &mut CategoryEditor {
        &mut self.categories
    }

    pub fn preview(&self) -> &PreviewScreen {
        &self.preview
    }

    pub fn preview_mut(&mut self) -> &mut PreviewScreen {
        &mut self.preview
    }

    pub fn render(&self, store: &MenuStore) -> String {
        if self.loading {
            return "Loading...\n".to_string();
        }
        if self.missing {
            return "Menu Not Found\n\
                    It looks like the menu you're trying to access doesn't exist.\n\
                    Use 'back' to return to Menu Management.\n"
                .to_string();
        }

        let mut out = String::new();
        let draft = self.details.draft();
        let _ = writeln!(out, "Menu: {}", draft.name);
        if let Some(welcome) = &draft.welcome_text {
            let _ = writeln!(out, "Welcome text: {}", welcome);
        }
        if self.details.is_editing() {
            let _ = writeln!(out, "(editing details)");
        }
        let _ = writeln!(out);
        out.push_str(&self.categories.render(store));
        let _ = writeln!(out, "\n--- Preview ---");
        out.push_str(&self.preview.render(store));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn restaurant_json() -> Value {
        json!({
            "_id": "r1", "name": "Cafe A", "location": "Main St",
            "menus": [{"id": "m1", "name": "Lunch", "welcome_text": "Hi", "categories": []}]
        })
    }

    async fn mounted(server: &MockServer) -> MenuStore {
        Mock::given(method("GET"))
            .and(path("/restaurants"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([restaurant_json()])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/restaurants/r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(restaurant_json()))
            .mount(server)
            .await;
        MenuStore::new(ApiClient::new(server.uri()))
    }

    #[tokio::test]
    async fn test_load_fills_shared_list() {
        let server = MockServer::start().await;
        let mut store = mounted(&server).await;

        let mut screen = MenuEditorScreen::new("r1", "m1");
        screen.load(&mut store).await.unwrap();

        assert!(!screen.is_missing());
        assert_eq!(screen.details().saved().name, "Lunch");
        assert!(store.menu("r1", "m1").is_some());
        assert!(screen.render(&store).contains("Lunch Menu"));
    }

    #[tokio::test]
    async fn test_unknown_menu_offers_way_back() {
        let server = MockServer::start().await;
        let mut store = mounted(&server).await;

        let mut screen = MenuEditorScreen::new("r1", "nope");
        screen.load(&mut store).await.unwrap();

        assert!(screen.is_missing());
        assert!(screen.render(&store).starts_with("Menu Not Found"));
        assert_eq!(
            screen.back_route(),
            Route::MenuManagement {
                restaurant_id: "r1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_edit_details_round() {
        let server = MockServer::start().await;
        let mut store = mounted(&server).await;
        Mock::given(method("PUT"))
            .and(path("/restaurants/r1/menus/m1"))
            .and(body_json(json!({"name": "Brunch"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut screen = MenuEditorScreen::new("r1", "m1");
        screen.load(&mut store).await.unwrap();
        assert!(!screen.set_name("Brunch"));

        screen.begin_edit_details();
        screen.set_name("Brunch");
        screen.set_welcome_text("  ");
        screen.save_details(&mut store).await.unwrap();

        assert!(!screen.details().is_editing());
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let server = MockServer::start().await;
        let mut store = mounted(&server).await;

        let mut screen = MenuEditorScreen::new("r1", "m1");
        screen.load(&mut store).await.unwrap();
        screen.begin_edit_details();
        screen.set_name(" ");
        let notice = screen.save_details(&mut store).await.unwrap_err();

        assert!(notice.is_validation());
        assert!(screen.details().is_editing());
    }
}
