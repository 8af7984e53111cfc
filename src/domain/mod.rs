//! Domain types and DTOs
//!
//! Wire types for estimates, reference listings and project studies. The
//! pricing model itself lives in `crate::estimator`.

pub mod estimates;
pub mod reference;
pub mod study;

pub use estimates::*;
pub use study::*;
