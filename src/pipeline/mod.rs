//! Pipeline module - the table transformations behind each stage

pub mod cleaning;
pub mod config;
pub mod correlation;
pub mod encoding;
pub mod error;
pub mod frequency;
pub mod loader;
pub mod metrics;
pub mod missing;
pub mod model;
pub mod scaling;
pub mod split;
pub mod workbook;

pub use cleaning::*;
pub use config::*;
pub use correlation::*;
pub use encoding::*;
pub use error::PipelineError;
pub use frequency::*;
pub use loader::*;
pub use metrics::*;
pub use missing::*;
pub use model::*;
pub use scaling::StandardScaler;
pub use split::*;
pub use workbook::read_workbook;
