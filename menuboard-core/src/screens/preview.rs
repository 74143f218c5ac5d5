use std::fmt::Write as _;

use tokio::sync::oneshot;

use super::{Notice, ScreenResult};
use crate::api::{ApiClient, ApiResult};
use crate::models::QrCode;
use crate::scope::ScreenScope;
use crate::store::MenuStore;

const QR_FAILED: &str = "Failed to generate QR code.";

/// Customer-facing view of one menu plus the QR/PDF links for it.
///
/// QR generation goes straight to the backend. The last result is kept in the
/// screen and replaced by the next request.
#[derive(Debug)]
pub struct PreviewScreen {
    restaurant_id: String,
    menu_id: String,
    qr: Option<QrCode>,
    pending: Option<oneshot::Receiver<ApiResult<QrCode>>>,
    scope: ScreenScope,
}

impl PreviewScreen {
    pub fn new(restaurant_id: impl Into<String>, menu_id: impl Into<String>) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            menu_id: menu_id.into(),
            qr: None,
            pending: None,
            scope: ScreenScope::new("preview"),
        }
    }

    pub fn qr(&self) -> Option<&QrCode> {
        self.qr.as_ref()
    }

    pub fn pdf_url(&self) -> Option<&str> {
        self.qr.as_ref().and_then(|qr| qr.pdf_url.as_deref())
    }

    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    /// Requests a QR code and waits for it.
    pub async fn generate_qr(&mut self, api: &ApiClient) -> ScreenResult<&QrCode> {
        let result = api.generate_qr(&self.restaurant_id, &self.menu_id).await;
        self.accept(result)
    }

    /// Starts a QR request in the background. A request already running is
    /// superseded.
    pub fn request_qr(&mut self, api: &ApiClient) {
        let api = api.clone();
        let (restaurant_id, menu_id) = (self.restaurant_id.clone(), self.menu_id.clone());
        let rx = self
            .scope
            .spawn(async move { api.generate_qr(&restaurant_id, &menu_id).await });
        self.pending = Some(rx);
    }

    /// Picks up a finished background request, if any.
    pub fn poll_qr(&mut self) -> Option<ScreenResult<&QrCode>> {
        let rx = self.pending.as_mut()?;
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                Some(self.accept(result))
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.pending = None;
                Some(Err(Notice::Failure(QR_FAILED.to_string())))
            }
        }
    }

    /// Waits for the background request started by [`request_qr`](Self::request_qr).
    pub async fn wait_qr(&mut self) -> ScreenResult<&QrCode> {
        let rx = self
            .pending
            .take()
            .ok_or_else(|| Notice::Info("No QR code requested.".to_string()))?;
        match crate::scope::join(rx).await {
            Ok(result) => self.accept(result),
            Err(e) => {
                tracing::debug!("QR request did not finish: {}", e);
                Err(Notice::Failure(QR_FAILED.to_string()))
            }
        }
    }

    /// Abandons any request still in flight.
    pub fn close(&mut self) {
        self.scope.close();
        self.pending = None;
    }

    fn accept(&mut self, result: ApiResult<QrCode>) -> ScreenResult<&QrCode> {
        match result {
            Ok(qr) => Ok(&*self.qr.insert(qr)),
            Err(e) => {
                tracing::warn!("Error generating QR code: {}", e);
                Err(Notice::Failure(QR_FAILED.to_string()))
            }
        }
    }

    pub fn render(&self, store: &MenuStore) -> String {
        if store.is_loading() {
            return "Loading...\n".to_string();
        }
        let restaurant = store.restaurant(&self.restaurant_id);
        let menu = restaurant.and_then(|r| r.menu(&self.menu_id));
        let (restaurant, menu) = match (restaurant, menu) {
            (Some(r), Some(m)) => (r, m),
            _ => return "Menu not found\n".to_string(),
        };

        let mut out = String::new();
        let _ = writeln!(out, "{}", restaurant.name);
        if !restaurant.location.is_empty() {
            let _ = writeln!(out, "{}", restaurant.location);
        }
        let _ = writeln!(out, "{} Menu", menu.name);
        if let Some(welcome) = &menu.welcome_text {
            let _ = writeln!(out, "{}", welcome);
        }

        if menu.categories.is_empty() {
            let _ = writeln!(out, "\nNo categories available");
        }
        for category in &menu.categories {
            let _ = writeln!(out, "\n{}", category.name);
            let _ = writeln!(out, "{}", "-".repeat(category.name.chars().count()));
            for dish in &category.dishes {
                let _ = writeln!(out, "{} ... {}", dish.name, dish.price);
            }
        }

        if self.is_generating() {
            let _ = writeln!(out, "\nGenerating QR code...");
        }
        if let Some(qr) = &self.qr {
            let _ = writeln!(out, "\nScan to View the PDF: {}", qr.qr_code_url);
            if let Some(pdf) = &qr.pdf_url {
                let _ = writeln!(out, "View PDF of the Menu: {}", pdf);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const QR_PATH: &str = "/restaurants/r1/menus/m1/generate_qr";

    async fn loaded(server: &MockServer, categories: serde_json::Value) -> MenuStore {
        Mock::given(method("GET"))
            .and(path("/restaurants"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "_id": "r1", "name": "Cafe A", "location": "Main St",
                "menus": [{"id": "m1", "name": "Lunch", "categories": categories}]
            }])))
            .mount(server)
            .await;
        let mut store = MenuStore::new(ApiClient::new(server.uri()));
        store.fetch_all().await.unwrap();
        store
    }

    fn qr_body() -> serde_json::Value {
        json!({"qr_code_url": "http://cdn/qr.png", "pdf_url": "http://cdn/menu.pdf"})
    }

    #[tokio::test]
    async fn test_render_sections() {
        let server = MockServer::start().await;
        let store = loaded(
            &server,
            json!([{"name": "Drinks", "dishes": [{"name": "Tea", "price": "3"}]}]),
        )
        .await;

        let output = PreviewScreen::new("r1", "m1").render(&store);

        assert!(output.starts_with("Cafe A\nMain St\nLunch Menu\n"));
        assert!(output.contains("Drinks\n------"));
        assert!(output.contains("Tea ... $3.00"));
    }

    #[tokio::test]
    async fn test_render_empty_and_missing() {
        let server = MockServer::start().await;
        let store = loaded(&server, json!([])).await;

        assert!(PreviewScreen::new("r1", "m1")
            .render(&store)
            .contains("No categories available"));
        assert_eq!(PreviewScreen::new("r1", "m9").render(&store), "Menu not found\n");
    }

    #[tokio::test]
    async fn test_generate_qr_stores_links() {
        let server = MockServer::start().await;
        let store = loaded(&server, json!([])).await;
        Mock::given(method("GET"))
            .and(path(QR_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(qr_body()))
            .expect(1)
            .mount(&server)
            .await;

        let mut preview = PreviewScreen::new("r1", "m1");
        preview.generate_qr(store.api()).await.unwrap();

        assert_eq!(preview.pdf_url(), Some("http://cdn/menu.pdf"));
        assert!(preview.render(&store).contains("Scan to View the PDF: http://cdn/qr.png"));
    }

    #[tokio::test]
    async fn test_background_request_delivers() {
        let server = MockServer::start().await;
        let store = loaded(&server, json!([])).await;
        Mock::given(method("GET"))
            .and(path(QR_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(qr_body()))
            .mount(&server)
            .await;

        let mut preview = PreviewScreen::new("r1", "m1");
        preview.request_qr(store.api());
        assert!(preview.is_generating());

        let qr = preview.wait_qr().await.unwrap();
        assert_eq!(qr.qr_code_url, "http://cdn/qr.png");
        assert!(!preview.is_generating());
    }

    #[tokio::test]
    async fn test_close_abandons_request() {
        let server = MockServer::start().await;
        let store = loaded(&server, json!([])).await;
        Mock::given(method("GET"))
            .and(path(QR_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(qr_body())
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let mut preview = PreviewScreen::new("r1", "m1");
        preview.request_qr(store.api());
        preview.close();

        assert!(!preview.is_generating());
        assert!(preview.poll_qr().is_none());
        assert!(preview.qr().is_none());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_code() {
        let server = MockServer::start().await;
        let store = loaded(&server, json!([])).await;
        Mock::given(method("GET"))
            .and(path(QR_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(qr_body()))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(QR_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut preview = PreviewScreen::new("r1", "m1");
        preview.generate_qr(store.api()).await.unwrap();
        let notice = preview.generate_qr(store.api()).await.unwrap_err();

        assert_eq!(notice, Notice::Failure(QR_FAILED.to_string()));
        assert!(preview.qr().is_some());
    }
}
