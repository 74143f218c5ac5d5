//! Backend REST client.

mod client;
mod error;

pub use client::{routes, ApiClient};
pub use error::{ApiError, ApiResult};
