/// Instruction builders for the Yield Market program
pub mod builder;
pub mod lp_deal;
pub mod protocol;
pub mod token;
pub mod yield_deal;

pub use builder::*;
pub use lp_deal::*;
pub use protocol::*;
pub use token::*;
pub use yield_deal::*;
