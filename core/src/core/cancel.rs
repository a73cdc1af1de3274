// stagehand/src/core/cancel.rs

//! Cooperative cancellation shared between a run and whoever may stop it.

use crate::error::CancelReason;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cloneable cancellation handle with an optional deadline.
///
/// Clones share the same flag, so a signal bridge can hold one clone and call
/// [`Cancellation::cancel`] while the pipeline driver polls another between
/// stages. Nothing here preempts a stage that is already running.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
  cancelled: Arc<AtomicBool>,
  deadline: Option<Instant>,
}

impl Cancellation {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_timeout(timeout: Duration) -> Self {
    Self {
      cancelled: Arc::default(),
      // An absurd timeout overflows Instant; treat it as no deadline.
      deadline: Instant::now().checked_add(timeout),
    }
  }

  pub fn cancel(&self) {
    self.cancelled.store(true, Ordering::SeqCst);
  }

  pub fn is_cancelled(&self) -> bool {
    self.check().is_err()
  }

  pub fn deadline(&self) -> Option<Instant> {
    self.deadline
  }

  /// Explicit cancellation wins over an expired deadline.
  pub fn check(&self) -> Result<(), CancelReason> {
    if self.cancelled.load(Ordering::SeqCst) {
      return Err(CancelReason::Interrupted);
    }
    match self.deadline {
      Some(deadline) if Instant::now() >= deadline => Err(CancelReason::DeadlineExceeded),
      _ => Ok(()),
    }
  }
}
