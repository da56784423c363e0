pub mod fees;
pub mod pda;

pub use fees::*;
pub use pda::*;
