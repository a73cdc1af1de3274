// stagehand/src/core/stage.rs

//! Defines the `Stage` trait every pipeline element implements.

use crate::core::context::Context;
use crate::error::ReleaseResult;
use async_trait::async_trait;

/// One unit of pipeline work.
///
/// `name` is used for logs and is what users put in the skip set.
/// `should_skip` is asked again on every run and must not change the context.
/// `execute` may read and mutate anything on the context; returning an error
/// stops the pipeline.
#[async_trait]
pub trait Stage: Send + Sync {
  fn name(&self) -> &str;

  fn should_skip(&self, _ctx: &Context) -> bool {
    false
  }

  async fn execute(&self, ctx: &mut Context) -> ReleaseResult<()>;
}

#[async_trait]
impl<S: Stage + ?Sized> Stage for Box<S> {
  fn name(&self) -> &str {
    (**self).name()
  }

  fn should_skip(&self, ctx: &Context) -> bool {
    (**self).should_skip(ctx)
  }

  async fn execute(&self, ctx: &mut Context) -> ReleaseResult<()> {
    (**self).execute(ctx).await
  }
}
