// stagehand/src/middleware/mod.rs

//! Decorators that wrap a [`Stage`](crate::core::Stage) with cross-cutting behavior.
//!
//! The pipeline composes them as `Skip(Logging(ErrorHandler(stage)))`, so a
//! skipped stage produces no start/finish logs and the logged outcome is the
//! already-normalized error.

pub mod errhandler;
pub mod logging;
pub mod skip;

pub use errhandler::ErrorHandler;
pub use logging::Logging;
pub use skip::Skip;

use crate::core::Stage;

/// The full middleware stack the pipeline puts around every stage.
pub type Wrapped<S> = Skip<Logging<ErrorHandler<S>>>;

pub fn wrap<S: Stage>(stage: S) -> Wrapped<S> {
  Skip::new(Logging::new(ErrorHandler::new(stage)))
}
