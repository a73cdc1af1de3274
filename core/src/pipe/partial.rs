// stagehand/src/pipe/partial.rs

use crate::core::{Context, Stage};
use crate::error::ReleaseResult;
use crate::targets;
use async_trait::async_trait;
use tracing::{event, Level};

/// Fills in the partial-build target as `<os>_<arch>` from the environment
/// (falling back to the running platform) unless one was given explicitly.
pub struct PartialStage;

#[async_trait]
impl Stage for PartialStage {
  fn name(&self) -> &str {
    "partial"
  }

  fn should_skip(&self, ctx: &Context) -> bool {
    !ctx.partial
  }

  async fn execute(&self, ctx: &mut Context) -> ReleaseResult<()> {
    if ctx.partial_target.is_empty() {
      ctx.partial_target = format!("{}_{}", targets::resolve_os(), targets::resolve_arch());
    }
    event!(Level::INFO, target = %ctx.partial_target, "Building only for one target.");
    Ok(())
  }
}
