pub mod types;
pub mod queries;
pub mod import;

pub use types::*;
pub use queries::*;
