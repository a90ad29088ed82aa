pub mod error;
pub mod math;
pub mod mesh;
pub mod operations;

pub use error::{Result, UvkitError};
