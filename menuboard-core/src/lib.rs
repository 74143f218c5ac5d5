//! Menuboard Core Library
//!
//! Restaurant menu models, the backend client, the shared menu store and the
//! headless screens driven by the terminal front-end.

pub mod api;
pub mod models;
pub mod navigation;
pub mod scope;
pub mod screens;
pub mod store;

pub use api::{ApiClient, ApiError, ApiResult};
pub use models::{
    Ad, AdDraft, Brand, BrandDraft, Category, CategoryDraft, Dish, DishDraft, DishInput,
    EntityKey, Menu, MenuDraft, Price, PriceError, QrCode, Restaurant, RestaurantDraft,
};
pub use navigation::{Navigator, Route};
pub use scope::{ScopeError, ScreenScope};
pub use store::{MenuStore, StoreError, StoreResult};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
