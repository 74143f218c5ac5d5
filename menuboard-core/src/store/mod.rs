mod error;
mod provider;
pub(crate) mod tree;

pub use error::{StoreError, StoreResult};
pub use provider::MenuStore;
