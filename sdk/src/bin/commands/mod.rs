pub mod deals;
pub mod protocol;
pub mod utils;
