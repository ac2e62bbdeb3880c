//! # Type Definitions
//!
//! Registry, pool and share-ledger records plus the quote values produced by
//! the math modules.

pub mod ledger;
pub mod pool;
pub mod quotes;
pub mod registry;

pub use ledger::*;
pub use pool::*;
pub use quotes::*;
pub use registry::*;

pub use solana_program::pubkey::Pubkey;
