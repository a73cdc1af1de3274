// stagehand/src/lib.rs

//! Stagehand: the execution core of a release-build orchestrator.
//!
//! A release is an ordered list of stages run one by one over a single
//! [`Context`]. Each stage is wrapped in skip, logging and error-handling
//! middleware. The core also owns the split/merge protocol:
//!  - a split run narrows the build to one OS and writes its outputs plus an
//!    `artifacts.json` manifest into `<dist>/<os>/`;
//!  - a later merge run moves every partition's artifacts back up into
//!    `<dist>/` and rebuilds one artifact registry from the manifests.
//!
//! Concrete build, packaging and publishing stages are collaborators: they
//! implement [`Stage`] and are slotted into [`Pipeline::build_pipeline`] or
//! [`Pipeline::continue_pipeline`].

pub mod artifact;
pub mod config;
pub mod core;
pub mod error;
pub mod middleware;
pub mod pipe;
pub mod pipeline;
pub mod run;
pub mod skips;
pub mod targets;

// --- Re-exports for the Public API ---

pub use crate::artifact::{Artifact, ArtifactKind, Artifacts};
pub use crate::config::Project;
pub use crate::core::{Cancellation, Context, Stage};
pub use crate::error::{CancelReason, ReleaseError, ReleaseResult};
pub use crate::pipe::{ManifestStage, MergeStage, PartialStage, SplitArtifactsStage, SplitStage};
pub use crate::pipeline::Pipeline;
pub use crate::run::{release, ReleaseOptions};
pub use crate::skips::Skips;
