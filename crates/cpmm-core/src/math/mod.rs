//! # Mathematical Functions
//!
//! Pure functions for share accounting and constant-product pricing. None of
//! them touch state; callers pass a single reserve snapshot.

pub mod liquidity_math;
pub mod safe_math;
pub mod share_policy;
pub mod swap_math;

// Re-export commonly used functions
pub use liquidity_math::*;
pub use safe_math::*;
pub use share_policy::*;
pub use swap_math::*;
