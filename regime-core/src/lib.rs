pub mod calculations;
pub mod models;
pub mod suggestions;
pub mod utils;

pub use calculations::{TaxEngine, evaluate};
pub use models::*;
