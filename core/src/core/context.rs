// stagehand/src/core/context.rs

//! Defines the `Context` every stage of a run receives.

use crate::artifact::Artifacts;
use crate::config::Project;
use crate::core::cancel::Cancellation;
use crate::error::{ReleaseError, ReleaseResult};
use crate::skips::Skips;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// State for exactly one invocation, handed to each stage by `&mut`.
///
/// Nothing here is global: two contexts in one process never see each other,
/// which is what lets tests run several releases side by side.
#[derive(Debug)]
pub struct Context {
  pub config: Project,
  pub artifacts: Artifacts,
  pub skips: Skips,
  pub snapshot: bool,
  /// Only affects work inside a single stage; see [`Context::for_each_target`].
  pub fail_fast: bool,
  /// Upper bound for a stage's internal concurrency.
  pub parallelism: usize,
  pub split: bool,
  pub merge: bool,
  pub partial: bool,
  /// OS the current split invocation builds for. Set by the split stage.
  pub split_target: String,
  /// `<os>_<arch>` prefix a partial build is restricted to.
  pub partial_target: String,
  cancellation: Cancellation,
}

impl Context {
  /// A context with no deadline.
  pub fn new(config: Project) -> Self {
    Self::with_cancellation(config, Cancellation::new())
  }

  pub fn with_timeout(config: Project, timeout: Duration) -> Self {
    Self::with_cancellation(config, Cancellation::with_timeout(timeout))
  }

  pub fn with_cancellation(config: Project, cancellation: Cancellation) -> Self {
    Self {
      config,
      artifacts: Artifacts::new(),
      skips: Skips::new(),
      snapshot: false,
      fail_fast: false,
      parallelism: default_parallelism(),
      split: false,
      merge: false,
      partial: false,
      split_target: String::new(),
      partial_target: String::new(),
      cancellation,
    }
  }

  /// Handle to give to whatever should be able to stop this run.
  pub fn cancellation(&self) -> &Cancellation {
    &self.cancellation
  }

  /// Current output root.
  pub fn dist(&self) -> &Path {
    &self.config.dist
  }

  pub fn set_dist(&mut self, dist: impl Into<PathBuf>) {
    self.config.dist = dist.into();
  }

  /// Runs `f` over independent units of work inside one stage.
  ///
  /// With `fail_fast` the first error is returned immediately. Otherwise every
  /// item runs and the failures come back together: a lone error as itself,
  /// several as [`ReleaseError::Multiple`].
  pub fn for_each_target<T, I, F>(&self, items: I, mut f: F) -> ReleaseResult<()>
  where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> ReleaseResult<()>,
  {
    let mut errors = Vec::new();
    for item in items {
      if let Err(err) = f(item) {
        if self.fail_fast {
          return Err(err);
        }
        tracing::warn!(error = %err, "Target failed, continuing because fail-fast is off.");
        errors.push(err);
      }
    }
    match errors.len() {
      0 => Ok(()),
      1 => Err(errors.remove(0)),
      _ => Err(ReleaseError::Multiple(errors)),
    }
  }
}

fn default_parallelism() -> usize {
  std::thread::available_parallelism().map_or(1, |n| n.get())
}
