pub mod raw;
pub mod transform;

pub use raw::*;
pub use transform::*;
