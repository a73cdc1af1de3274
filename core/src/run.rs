// stagehand/src/run.rs

//! Turns run options into a ready [`Context`] and drives a pipeline with it.

use crate::config::Project;
use crate::core::Context;
use crate::error::ReleaseResult;
use crate::pipeline::Pipeline;
use crate::skips;
use std::time::Duration;
use tracing::{event, Level};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Flags the command layer collects for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOptions {
  pub split: bool,
  pub merge: bool,
  pub snapshot: bool,
  pub fail_fast: bool,
  /// 0 means one per available CPU.
  pub parallelism: usize,
  pub timeout: Duration,
  /// Stage names to skip. Must all be stages of the pipeline being run.
  pub skips: Vec<String>,
  pub partial: bool,
  /// Explicit partial-build target; empty means resolve from the environment.
  pub partial_target: String,
}

impl Default for ReleaseOptions {
  fn default() -> Self {
    Self {
      split: false,
      merge: false,
      snapshot: false,
      fail_fast: false,
      parallelism: 0,
      timeout: DEFAULT_TIMEOUT,
      skips: Vec::new(),
      partial: false,
      partial_target: String::new(),
    }
  }
}

/// Creates the context for running `pipeline` with `options`.
pub fn new_context(project: Project, options: &ReleaseOptions, pipeline: &Pipeline) -> ReleaseResult<Context> {
  let mut ctx = Context::with_timeout(project, options.timeout);
  setup_context(&mut ctx, options, pipeline)?;
  Ok(ctx)
}

/// Applies `options` to `ctx`.
///
/// User skips are checked against the pipeline's stage names before anything
/// runs. Snapshots imply skipping publish, announce and validate; skipping
/// publish implies skipping announce.
pub fn setup_context(ctx: &mut Context, options: &ReleaseOptions, pipeline: &Pipeline) -> ReleaseResult<()> {
  if options.parallelism > 0 {
    ctx.parallelism = options.parallelism;
  }
  event!(Level::DEBUG, parallelism = ctx.parallelism, "Parallelism set.");
  ctx.split = options.split;
  ctx.merge = options.merge;
  ctx.snapshot = options.snapshot;
  ctx.fail_fast = options.fail_fast;
  ctx.partial = options.partial;
  ctx.partial_target = options.partial_target.clone();

  ctx.skips.set_requested(&options.skips, &pipeline.stage_names())?;
  if ctx.snapshot {
    ctx.skips.set(&[skips::PUBLISH, skips::ANNOUNCE, skips::VALIDATE]);
  }
  if ctx.skips.contains(skips::PUBLISH) {
    ctx.skips.set(&[skips::ANNOUNCE]);
  }
  if !ctx.skips.is_empty() {
    event!(Level::WARN, skips = %ctx.skips, "Skipping stages.");
  }
  Ok(())
}

/// Builds a context and runs `pipeline` to completion, first error, or
/// cancellation.
pub async fn release(project: Project, options: &ReleaseOptions, pipeline: &Pipeline) -> ReleaseResult<Context> {
  let mut ctx = new_context(project, options, pipeline)?;
  pipeline.run(&mut ctx).await?;
  Ok(ctx)
}
