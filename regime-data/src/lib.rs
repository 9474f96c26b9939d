//! CSV loaders for tax inputs and bank statements.

pub mod input_loader;
pub mod statement_loader;

mod amount;

pub use input_loader::InputLoadError;
pub use statement_loader::StatementLoadError;
