//! Shared test utilities for the BloomWatch workspace.
//!
//! - Synthetic band generators and in-memory TIFF encoders
//! - STAC item and AOI fixtures
//! - [`MemoryCatalog`], a scripted [`stac_client::Catalog`]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! ```ignore
//! use test_utils::{fixtures, encode_gray16_tiff, MemoryCatalog};
//! ```

pub mod catalog;
pub mod fixtures;
pub mod generators;

pub use catalog::MemoryCatalog;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0 / 3.0, 0.3333, 1e-3); // passes
/// assert_approx_eq!(0.5, 0.4, 1e-3);          // panics
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0 / 3.0, 0.33333, 1e-4);
        assert_approx_eq!(0.0, 0.0, 0.0);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_rejects_nan() {
        assert_approx_eq!(f64::NAN, 0.0, 1.0);
    }
}
