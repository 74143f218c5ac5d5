//! HTTP client for the menu backend.
//!
//! Thin wrapper over `reqwest`: every call goes to `{base_url}{path}` with a
//! JSON body, non-2xx answers become [`ApiError::Status`]. There is no retry
//! and no timeout unless one is configured.

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::error::{ApiError, ApiResult};
use crate::models::{
    Ad, AdDraft, Brand, BrandDraft, CategoryDraft, CategoryRename, CreatedMenu, Dish, DishInput,
    MenuDraft, QrCode, Restaurant, RestaurantDraft,
};

/// Client for the restaurant/menu REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base(base_url.into()),
            http: reqwest::Client::new(),
        }
    }

    /// Builds a client with an optional overall request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: normalize_base(base_url.into()),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ------------------------------------------------------------------
    // Verbs
    // ------------------------------------------------------------------

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let request = self.http.get(self.url(path));
        let body = self.send(Method::GET, path, request).await?;
        decode(&body)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.url(path)).json(body);
        let body = self.send(Method::POST, path, request).await?;
        decode(&body)
    }

    /// POST returning whatever the backend answered; an empty body is `Null`.
    pub async fn post_value<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        let request = self.http.post(self.url(path)).json(body);
        let body = self.send(Method::POST, path, request).await?;
        Ok(lenient_json(&body))
    }

    /// PUT returning whatever the backend answered; an empty body is `Null`.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        let request = self.http.put(self.url(path)).json(body);
        let body = self.send(Method::PUT, path, request).await?;
        Ok(lenient_json(&body))
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let request = self.http.delete(self.url(path));
        self.send(Method::DELETE, path, request).await?;
        Ok(())
    }

    async fn send(&self, method: Method, path: &str, request: RequestBuilder) -> ApiResult<String> {
        tracing::debug!("{} {}", method, path);

        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} {} failed: {}", method, path, e);
            ApiError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::from)?;

        if !status.is_success() {
            tracing::warn!("{} {} returned {}", method, path, status);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    // ------------------------------------------------------------------
    // Restaurants
    // ------------------------------------------------------------------

    pub async fn list_restaurants(&self) -> ApiResult<Vec<Restaurant>> {
        self.get(&routes::restaurants()).await
    }

    pub async fn get_restaurant(&self, restaurant_id: &str) -> ApiResult<Restaurant> {
        self.get(&routes::restaurant(restaurant_id)).await
    }

    pub async fn create_restaurant(&self, draft: &RestaurantDraft) -> ApiResult<Restaurant> {
        self.post(&routes::restaurants(), draft).await
    }

    pub async fn update_restaurant(
        &self,
        restaurant_id: &str,
        draft: &RestaurantDraft,
    ) -> ApiResult<Value> {
        self.put(&routes::restaurant(restaurant_id), draft).await
    }

    // ------------------------------------------------------------------
    // Menus
    // ------------------------------------------------------------------

    /// Creates a menu and returns the id the backend assigned, or `None` when
    /// the backend accepted the menu without naming its id.
    pub async fn create_menu(
        &self,
        restaurant_id: &str,
        draft: &MenuDraft,
    ) -> ApiResult<Option<String>> {
        let body = self.post_value(&routes::menus(restaurant_id), draft).await?;
        Ok(serde_json::from_value::<CreatedMenu>(body).ok().map(|c| c.id))
    }

    pub async fn update_menu(
        &self,
        restaurant_id: &str,
        menu_id: &str,
        draft: &MenuDraft,
    ) -> ApiResult<Value> {
        self.put(&routes::menu(restaurant_id, menu_id), draft).await
    }

    pub async fn delete_menu(&self, restaurant_id: &str, menu_id: &str) -> ApiResult<()> {
        self.delete(&routes::menu(restaurant_id, menu_id)).await
    }

    // ------------------------------------------------------------------
    // Categories (addressed by position)
    // ------------------------------------------------------------------

    pub async fn create_category(
        &self,
        restaurant_id: &str,
        menu_id: &str,
        draft: &CategoryDraft,
    ) -> ApiResult<Value> {
        self.post_value(&routes::categories(restaurant_id, menu_id), draft)
            .await
    }

    pub async fn update_category(
        &self,
        restaurant_id: &str,
        menu_id: &str,
        index: usize,
        name: &str,
    ) -> ApiResult<Value> {
        self.put(
            &routes::category(restaurant_id, menu_id, index),
            &CategoryRename { name },
        )
        .await
    }

    pub async fn delete_category(
        &self,
        restaurant_id: &str,
        menu_id: &str,
        index: usize,
    ) -> ApiResult<()> {
        self.delete(&routes::category(restaurant_id, menu_id, index))
            .await
    }

    // ------------------------------------------------------------------
    // Dishes (category by name, dish by position)
    // ------------------------------------------------------------------

    /// Adds a dish. `None` means the backend stored it but did not echo it.
    pub async fn create_dish(
        &self,
        restaurant_id: &str,
        menu_id: &str,
        category_name: &str,
        dish: &DishInput,
    ) -> ApiResult<Option<Dish>> {
        let body = self
            .post_value(&routes::dishes(restaurant_id, menu_id, category_name), dish)
            .await?;
        Ok(serde_json::from_value(body).ok())
    }

    pub async fn update_dish(
        &self,
        restaurant_id: &str,
        menu_id: &str,
        category_name: &str,
        index: usize,
        dish: &DishInput,
    ) -> ApiResult<Value> {
        self.put(
            &routes::dish(restaurant_id, menu_id, category_name, index),
            dish,
        )
        .await
    }

    pub async fn delete_dish(
        &self,
        restaurant_id: &str,
        menu_id: &str,
        category_name: &str,
        index: usize,
    ) -> ApiResult<()> {
        self.delete(&routes::dish(restaurant_id, menu_id, category_name, index))
            .await
    }

    // ------------------------------------------------------------------
    // QR / PDF
    // ------------------------------------------------------------------

    pub async fn generate_qr(&self, restaurant_id: &str, menu_id: &str) -> ApiResult<QrCode> {
        self.get(&routes::generate_qr(restaurant_id, menu_id)).await
    }

    // ------------------------------------------------------------------
    // Brands and ads
    // ------------------------------------------------------------------

    pub async fn list_brands(&self) -> ApiResult<Vec<Brand>> {
        self.get(routes::ALL_BRANDS).await
    }

    pub async fn onboard_brand(&self, draft: &BrandDraft) -> ApiResult<Brand> {
        self.post(routes::ONBOARD_BRAND, draft).await
    }

    pub async fn create_ad(&self, brand_id: &str, draft: &AdDraft) -> ApiResult<Ad> {
        self.post(&routes::ads(brand_id), draft).await
    }
}

fn normalize_base(base: String) -> String {
    base.trim().trim_end_matches('/').to_string()
}

fn decode<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn lenient_json(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// Path builders for every backend route.
pub mod routes {
    use urlencoding::encode;

    pub const ALL_BRANDS: &str = "/brands/getAllBrands";
    pub const ONBOARD_BRAND: &str = "/brands/onBoardBrand";

    pub fn restaurants() -> String {
        "/restaurants".to_string()
    }

    pub fn restaurant(id: &str) -> String {
        format!("/restaurants/{}", encode(id))
    }

    pub fn menus(restaurant_id: &str) -> String {
        format!("{}/menus", restaurant(restaurant_id))
    }

    pub fn menu(restaurant_id: &str, menu_id: &str) -> String {
        format!("{}/{}", menus(restaurant_id), encode(menu_id))
    }

    pub fn categories(restaurant_id: &str, menu_id: &str) -> String {
        format!("{}/categories", menu(restaurant_id, menu_id))
    }

    pub fn category(restaurant_id: &str, menu_id: &str, index: usize) -> String {
        format!("{}/{}", categories(restaurant_id, menu_id), index)
    }

    pub fn dishes(restaurant_id: &str, menu_id: &str, category_name: &str) -> String {
        format!(
            "{}/{}/dishes",
            categories(restaurant_id, menu_id),
            encode(category_name)
        )
    }

    pub fn dish(restaurant_id: &str, menu_id: &str, category_name: &str, index: usize) -> String {
        format!("{}/{}", dishes(restaurant_id, menu_id, category_name), index)
    }

    pub fn generate_qr(restaurant_id: &str, menu_id: &str) -> String {
        format!("{}/generate_qr", menu(restaurant_id, menu_id))
    }

    pub fn ads(brand_id: &str) -> String {
        format!("/brands/{}/ads", encode(brand_id))
    }
}
