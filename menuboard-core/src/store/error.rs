use thiserror::Error;

use crate::api::ApiError;

/// Errors returned by [`MenuStore`](super::MenuStore) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Input rejected before any request was made
    #[error("{0}")]
    Validation(String),

    #[error("A category named '{0}' already exists in this menu")]
    DuplicateCategory(String),

    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(String),

    #[error("Menu not found: {0}")]
    MenuNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("No category at position {0}")]
    CategoryIndex(usize),

    #[error("No dish at position {index} in '{category}'")]
    DishIndex { category: String, index: usize },
}

impl StoreError {
    /// Problems the user can fix by changing the form input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StoreError::Validation(_) | StoreError::DuplicateCategory(_)
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
