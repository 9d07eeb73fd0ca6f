//! Report module - console tables and written artifacts

pub mod model_export;
pub mod narrative;
pub mod summary;

pub use model_export::*;
pub use narrative::*;
pub use summary::*;
