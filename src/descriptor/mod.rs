pub mod catalog;
pub mod registry;
pub mod types;

pub use catalog::catalog;
pub use registry::Registry;
pub use types::*;
