// stagehand/src/middleware/skip.rs

use crate::core::{Context, Stage};
use crate::error::ReleaseResult;
use async_trait::async_trait;
use tracing::{event, Level};

/// Bypasses the wrapped stage when the user asked to skip it by name or when
/// the stage's own `should_skip` says so. A bypassed stage counts as success.
pub struct Skip<S> {
  inner: S,
}

impl<S: Stage> Skip<S> {
  pub fn new(inner: S) -> Self {
    Self { inner }
  }

  fn skip_reason(&self, ctx: &Context) -> Option<&'static str> {
    if ctx.skips.contains(self.inner.name()) {
      Some("requested")
    } else if self.inner.should_skip(ctx) {
      Some("not applicable to this run")
    } else {
      None
    }
  }
}

#[async_trait]
impl<S: Stage> Stage for Skip<S> {
  fn name(&self) -> &str {
    self.inner.name()
  }

  fn should_skip(&self, ctx: &Context) -> bool {
    self.skip_reason(ctx).is_some()
  }

  async fn execute(&self, ctx: &mut Context) -> ReleaseResult<()> {
    if let Some(reason) = self.skip_reason(ctx) {
      event!(Level::INFO, stage = self.name(), reason, "Stage skipped.");
      return Ok(());
    }
    self.inner.execute(ctx).await
  }
}
