//! Headless screens. Each owns its form state and drives the store.

mod brands;
mod category_editor;
mod dish_form;
mod edit_state;
mod menu_editor;
mod menu_management;
mod preview;
mod restaurant_selection;

use std::fmt;

use crate::store::StoreError;

pub use brands::{AdForm, AdFormFields, OnboardBrandForm, AD_FIELDS_REQUIRED};
pub use category_editor::CategoryEditor;
pub use dish_form::DishForm;
pub use edit_state::{Editor, Mode};
pub use menu_editor::MenuEditorScreen;
pub use menu_management::MenuManagementScreen;
pub use preview::PreviewScreen;
pub use restaurant_selection::RestaurantSelectionScreen;

/// A message for the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The input needs fixing; nothing was sent.
    Validation(String),
    /// The backend call failed.
    Failure(String),
    Info(String),
}

impl Notice {
    /// Maps a store error to what the user sees. Validation problems keep
    /// their message; everything else becomes the action's generic failure.
    pub fn from_error(err: &StoreError, failure: &str) -> Self {
        if err.is_validation() {
            Notice::Validation(err.to_string())
        } else {
            Notice::Failure(failure.to_string())
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Validation(m) | Notice::Failure(m) | Notice::Info(m) => m,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Notice::Validation(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Validation(m) => write!(f, "Validation: {}", m),
            Notice::Failure(m) => write!(f, "Error: {}", m),
            Notice::Info(m) => write!(f, "{}", m),
        }
    }
}

impl std::error::Error for Notice {}

pub type ScreenResult<T> = Result<T, Notice>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    #[test]
    fn test_validation_keeps_message() {
        let err = StoreError::Validation("Please enter both dish name and price.".to_string());
        let notice = Notice::from_error(&err, "Failed to add dish.");
        assert!(notice.is_validation());
        assert_eq!(notice.message(), "Please enter both dish name and price.");
    }

    #[test]
    fn test_backend_error_becomes_generic_failure() {
        let err = StoreError::Api(ApiError::Status {
            status: 500,
            body: "boom".to_string(),
        });
        let notice = Notice::from_error(&err, "Failed to add dish.");
        assert_eq!(notice, Notice::Failure("Failed to add dish.".to_string()));
        assert_eq!(notice.to_string(), "Error: Failed to add dish.");
    }
}
