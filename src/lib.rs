pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::cli::LocalSpecSource;

#[cfg(feature = "lambda")]
pub use config::lambda::{ApiGatewayNameResolver, S3SpecSource};

pub use config::settings::{AlarmSettings, TransformConfig};
pub use core::{GeneratedAlarms, MacroHandler, MacroRequest, MacroResponse, SegmentationEngine};
pub use domain::model::Action;
pub use utils::error::{AlarmError, Result};
