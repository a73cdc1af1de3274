// stagehand/src/error.rs
use anyhow::Error as AnyhowError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a run stopped before reaching its last stage without a stage failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
  /// An external interrupt (e.g. a signal bridge) cancelled the run.
  Interrupted,
  /// The run's deadline passed.
  DeadlineExceeded,
}

impl fmt::Display for CancelReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Interrupted => write!(f, "interrupted"),
      Self::DeadlineExceeded => write!(f, "deadline exceeded"),
    }
  }
}

#[derive(Debug, Error)]
pub enum ReleaseError {
  #[error("{}: not found: {source}", .path.display())]
  NotFound {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("{}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("malformed artifact manifest {}: {source}", .path.display())]
  MalformedManifest {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// A manifest entry whose path does not stay inside its partition.
  #[error("artifact path '{path}' in {} must be relative to the partition", .partition.display())]
  InvalidArtifactPath { partition: PathBuf, path: String },

  #[error("cannot make {} relative to {}", .path.display(), .base.display())]
  RelativePath { base: PathBuf, path: PathBuf },

  #[error("release cancelled: {0}")]
  Cancelled(CancelReason),

  #[error("aborted by user during stage '{stage}'")]
  Aborted { stage: String },

  #[error("invalid skip '{name}', valid options are: {}", .valid.join(", "))]
  InvalidSkip { name: String, valid: Vec<String> },

  #[error("invalid configuration {}: {message}", .path.display())]
  InvalidConfig { path: PathBuf, message: String },

  /// Raised by a stage that decided at runtime it has nothing to do.
  /// The error middleware turns it into a success.
  #[error("skipped: {reason}")]
  Skipped { reason: String },

  #[error("{} errors occurred: {}", .0.len(), join_errors(.0))]
  Multiple(Vec<ReleaseError>),

  #[error(transparent)]
  Stage { source: AnyhowError },
}

fn join_errors(errors: &[ReleaseError]) -> String {
  errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

impl ReleaseError {
  /// Wraps an I/O failure on `path`, keeping missing files distinguishable.
  pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
    let path = path.as_ref().to_path_buf();
    if source.kind() == io::ErrorKind::NotFound {
      ReleaseError::NotFound { path, source }
    } else {
      ReleaseError::Io { path, source }
    }
  }

  pub fn skipped(reason: impl Into<String>) -> Self {
    ReleaseError::Skipped { reason: reason.into() }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, ReleaseError::NotFound { .. })
  }

  pub fn is_cancelled(&self) -> bool {
    matches!(self, ReleaseError::Cancelled(_))
  }

  pub fn is_skip(&self) -> bool {
    matches!(self, ReleaseError::Skipped { .. })
  }
}

// Collaborator stages usually fail with anyhow errors. Unwrap anything we
// already know how to classify so callers never see ReleaseError(Stage(ReleaseError)).
// A bare io::Error carries no path, so it is labelled as such.
impl From<AnyhowError> for ReleaseError {
  fn from(err: AnyhowError) -> Self {
    let err = match err.downcast::<ReleaseError>() {
      Ok(release_err) => return release_err,
      Err(other) => other,
    };
    match err.downcast::<io::Error>() {
      Ok(io_err) if io_err.kind() == io::ErrorKind::NotFound => ReleaseError::NotFound {
        path: PathBuf::from(UNKNOWN_PATH),
        source: io_err,
      },
      Ok(io_err) => ReleaseError::Io {
        path: PathBuf::from(UNKNOWN_PATH),
        source: io_err,
      },
      Err(other) => ReleaseError::Stage { source: other },
    }
  }
}

const UNKNOWN_PATH: &str = "<unknown path>";

pub type ReleaseResult<T, E = ReleaseError> = std::result::Result<T, E>;
