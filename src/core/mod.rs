pub mod composite;
pub mod engine;
pub mod extract;
pub mod macro_handler;
pub mod naming;
pub mod oncall;
pub mod outputs;
pub mod standard;

pub use crate::utils::error::Result;
pub use engine::{GeneratedAlarms, SegmentationEngine};
pub use macro_handler::{MacroHandler, MacroRequest, MacroResponse, MacroStatus};
