pub mod amm;
pub mod pool;

pub use amm::*;
pub use pool::*;
