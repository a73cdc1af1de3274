// stagehand/src/pipeline/presets.rs

//! The two stage orders the command layer actually runs.

use crate::core::Stage;
use crate::pipe::{ManifestStage, MergeStage, PartialStage, SplitArtifactsStage, SplitStage};
use crate::pipeline::definition::Pipeline;

impl Pipeline {
  /// `partial → split → <build stages> → split-artifacts → manifest`.
  ///
  /// Partial and split stages skip themselves unless their mode is on, so the
  /// same order serves full, partial, and split builds.
  pub fn build_pipeline(build_stages: Vec<Box<dyn Stage>>) -> Self {
    let mut pipeline = Pipeline::new().with_stage(PartialStage).with_stage(SplitStage);
    pipeline.extend(build_stages);
    pipeline.with_stage(SplitArtifactsStage).with_stage(ManifestStage)
  }

  /// `merge → <publish stages> → manifest`, for the invocation that picks up
  /// split builds. The final manifest describes the unified output root.
  pub fn continue_pipeline(publish_stages: Vec<Box<dyn Stage>>) -> Self {
    let mut pipeline = Pipeline::new().with_stage(MergeStage);
    pipeline.extend(publish_stages);
    pipeline.with_stage(ManifestStage)
  }
}
