pub mod amount;
pub mod classifier;
pub mod constants;
pub mod error;
pub mod types;

pub use amount::*;
pub use classifier::*;
pub use constants::*;
pub use error::*;
pub use types::*;
