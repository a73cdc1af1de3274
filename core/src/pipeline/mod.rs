// stagehand/src/pipeline/mod.rs

//! Defines the `Pipeline` struct, its construction, modification, and execution logic.

pub mod definition;
pub mod execution;
pub mod presets;

pub use definition::Pipeline;
