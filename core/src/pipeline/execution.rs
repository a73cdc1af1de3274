// stagehand/src/pipeline/execution.rs

//! Contains `Pipeline::run()`, the sequential stage driver.

use crate::core::Context;
use crate::error::{ReleaseError, ReleaseResult};
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, Level};

impl Pipeline {
  /// Runs every stage in order against `ctx`.
  ///
  /// Stages never overlap. Before each stage the context's cancellation is
  /// checked; a cancelled or expired run returns [`ReleaseError::Cancelled`]
  /// without starting the next stage. A stage already running is not
  /// interrupted. The first stage error stops the run and is returned as is;
  /// work done by earlier stages is not rolled back.
  #[instrument(
        name = "Pipeline::run",
        skip_all,
        fields(num_stages = self.stages.len()),
        err(Display)
    )]
  pub async fn run(&self, ctx: &mut Context) -> ReleaseResult<()> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (stage_idx, stage) in self.stages.iter().enumerate() {
      if let Err(reason) = ctx.cancellation().check() {
        event!(
          Level::WARN,
          stage = stage.name(),
          stage_index = stage_idx,
          %reason,
          "Run cancelled before stage."
        );
        return Err(ReleaseError::Cancelled(reason));
      }

      stage.execute(ctx).await?;
    }

    event!(Level::DEBUG, "Pipeline execution completed successfully.");
    Ok(())
  }
}
