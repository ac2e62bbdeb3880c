//! # CPMM Core - Shared Pool Logic
//!
//! This crate contains the pool-state and curve-math engine shared between
//! the on-chain program and off-chain tooling. It provides:
//!
//! - Registry, pool and share-ledger types
//! - Pure liquidity and swap math over checked `u64`/`u128` arithmetic
//! - Deterministic pool authority derivation
//! - A [`Custody`](custody::Custody) seam for the external token-transfer service
//! - An instruction [`engine`] that runs the five operations atomically
//!
//! ## Feature Flags
//!
//! - `client`: Enables serde serialization for off-chain use

pub mod authority;
pub mod constants;
pub mod custody;
pub mod engine;
pub mod errors;
pub mod math;
pub mod types;

// Re-export commonly used items
pub use constants::*;
pub use errors::{CoreResult, CpmmCoreError, ErrorKind};
pub use types::*;
