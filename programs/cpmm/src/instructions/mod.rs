pub mod create_amm;
pub mod create_pool;
pub mod deposit_liquidity;
pub mod swap_exact_tokens_for_tokens;
pub mod update_fee;
pub mod withdraw_liquidity;

pub use create_amm::*;
pub use create_pool::*;
pub use deposit_liquidity::*;
pub use swap_exact_tokens_for_tokens::*;
pub use update_fee::*;
pub use withdraw_liquidity::*;
