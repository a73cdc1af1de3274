// stagehand/src/config.rs

//! The slice of project configuration the execution core depends on.

use crate::error::{ReleaseError, ReleaseResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DIST: &str = "dist";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
  pub project_name: String,
  /// Output root. Split narrows it for the rest of the run, so always read
  /// the current value from the context rather than caching it.
  pub dist: PathBuf,
}

impl Default for Project {
  fn default() -> Self {
    Self {
      project_name: String::new(),
      dist: PathBuf::from(DEFAULT_DIST),
    }
  }
}

impl Project {
  pub fn load(path: impl AsRef<Path>) -> ReleaseResult<Self> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| ReleaseError::io(path, e))?;
    Self::parse(path, &raw)
  }

  pub fn from_toml_str(raw: &str) -> ReleaseResult<Self> {
    Self::parse(Path::new("<inline>"), raw)
  }

  fn parse(path: &Path, raw: &str) -> ReleaseResult<Self> {
    let project: Project = toml::from_str(raw).map_err(|e| ReleaseError::InvalidConfig {
      path: path.to_path_buf(),
      message: e.to_string(),
    })?;
    if project.dist.as_os_str().is_empty() {
      return Err(ReleaseError::InvalidConfig {
        path: path.to_path_buf(),
        message: "dist must not be empty".to_string(),
      });
    }
    Ok(project)
  }
}
