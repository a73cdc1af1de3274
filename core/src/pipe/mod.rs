// stagehand/src/pipe/mod.rs

//! The stages that belong to the execution core itself. Everything else
//! (building, archiving, publishing) plugs in as collaborator stages.

pub mod manifest;
pub mod merge;
pub mod partial;
pub mod split;

pub use manifest::ManifestStage;
pub use merge::MergeStage;
pub use partial::PartialStage;
pub use split::{SplitArtifactsStage, SplitStage};
