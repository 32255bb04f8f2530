//! Schema model: raw input types and the resolved, immutable entity model.

pub mod reader;
pub mod types;

pub use reader::*;
pub use types::*;
