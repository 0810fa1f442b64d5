//! Common types and utilities shared across the BloomWatch crates.

pub mod aoi;
pub mod error;
pub mod time;

pub use aoi::{Aoi, AoiError};
pub use error::{BloomError, BloomResult, ErrorBody};
pub use time::SearchWindow;
