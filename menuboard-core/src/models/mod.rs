mod brand;
mod category;
mod dish;
mod key;
mod menu;
mod price;
mod restaurant;

use serde::{Deserialize, Serialize};

pub use brand::{Ad, AdDraft, Brand, BrandDraft};
pub use category::{Category, CategoryDraft};
pub(crate) use category::CategoryRename;
pub use dish::{Dish, DishDraft, DishInput, DISH_FIELDS_REQUIRED};
pub use key::EntityKey;
pub(crate) use menu::CreatedMenu;
pub use menu::{Menu, MenuDraft};
pub use price::{Price, PriceError};
pub use restaurant::{Restaurant, RestaurantDraft};

/// Links returned by the QR generation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrCode {
    pub qr_code_url: String,
    #[serde(default)]
    pub pdf_url: Option<String>,
}
