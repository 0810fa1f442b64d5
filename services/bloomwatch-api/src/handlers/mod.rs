//! HTTP request handlers.

pub mod error;
pub mod health;
pub mod process;
pub mod search;

pub use error::ApiError;
