pub mod seeds;
pub mod transfers;

pub use seeds::*;
pub use transfers::*;
