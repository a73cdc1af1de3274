// stagehand/src/middleware/logging.rs

use crate::core::{Context, Stage};
use crate::error::ReleaseResult;
use async_trait::async_trait;
use std::time::Instant;
use tracing::{event, span, Instrument, Level};

/// Logs start, outcome and duration of the wrapped stage. Changes nothing else.
pub struct Logging<S> {
  inner: S,
}

impl<S: Stage> Logging<S> {
  pub fn new(inner: S) -> Self {
    Self { inner }
  }
}

#[async_trait]
impl<S: Stage> Stage for Logging<S> {
  fn name(&self) -> &str {
    self.inner.name()
  }

  fn should_skip(&self, ctx: &Context) -> bool {
    self.inner.should_skip(ctx)
  }

  async fn execute(&self, ctx: &mut Context) -> ReleaseResult<()> {
    let stage_span = span!(Level::INFO, "stage", stage = self.name());
    async move {
      event!(Level::INFO, "Stage starting.");
      let started = Instant::now();
      let result = self.inner.execute(ctx).await;
      let elapsed_ms = started.elapsed().as_millis() as u64;
      match &result {
        Ok(()) => event!(Level::INFO, elapsed_ms, "Stage finished."),
        Err(err) => event!(Level::ERROR, elapsed_ms, error = %err, "Stage failed."),
      }
      result
    }
    .instrument(stage_span)
    .await
  }
}
