//! Error types for the scouting data store.

pub mod error_code;
pub mod store_error;

pub use error_code::ScoutErrorCode;
pub use store_error::{StoreError, StoreResult};
