// stagehand/src/middleware/errhandler.rs

use crate::core::{Context, Stage};
use crate::error::{ReleaseError, ReleaseResult};
use async_trait::async_trait;
use tracing::{event, Level};

/// Normalizes whatever error the wrapped stage returns.
///
/// - `Skipped` means the stage found nothing to do: logged, turned into success.
/// - `Stage` errors carrying a known error type are unwrapped into it.
/// - `Aborted` without a stage name gets this stage's name.
///
/// Every other error is passed through as is; this layer never swallows a
/// real failure.
pub struct ErrorHandler<S> {
  inner: S,
}

impl<S: Stage> ErrorHandler<S> {
  pub fn new(inner: S) -> Self {
    Self { inner }
  }

  pub fn into_inner(self) -> S {
    self.inner
  }
}

#[async_trait]
impl<S: Stage> Stage for ErrorHandler<S> {
  fn name(&self) -> &str {
    self.inner.name()
  }

  fn should_skip(&self, ctx: &Context) -> bool {
    self.inner.should_skip(ctx)
  }

  async fn execute(&self, ctx: &mut Context) -> ReleaseResult<()> {
    let err = match self.inner.execute(ctx).await {
      Ok(()) => return Ok(()),
      Err(ReleaseError::Stage { source }) => ReleaseError::from(source),
      Err(err) => err,
    };
    match err {
      ReleaseError::Skipped { reason } => {
        event!(Level::WARN, stage = self.name(), %reason, "Stage skipped itself.");
        Ok(())
      }
      err => Err(normalize(self.name(), err)),
    }
  }
}

fn normalize(stage: &str, err: ReleaseError) -> ReleaseError {
  match err {
    ReleaseError::Aborted { stage: aborted } if aborted.is_empty() => ReleaseError::Aborted {
      stage: stage.to_string(),
    },
    other => other,
  }
}
