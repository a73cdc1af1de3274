// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use stagehand::{Artifact, ArtifactKind, Context, Project, ReleaseError, ReleaseResult, Stage};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::Level;

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// Shared log of which stages actually executed, in order.
pub type ExecLog = Arc<Mutex<Vec<String>>>;

pub fn exec_log() -> ExecLog {
  Arc::new(Mutex::new(Vec::new()))
}

#[derive(Clone)]
pub enum Outcome {
  Succeed,
  Fail(&'static str),
  SkipItself(&'static str),
  CancelRun,
}

/// A stage that records its execution and then does what `outcome` says.
pub struct RecordingStage {
  pub name: &'static str,
  pub skip: bool,
  pub outcome: Outcome,
  pub log: ExecLog,
}

impl RecordingStage {
  pub fn new(name: &'static str, log: &ExecLog) -> Self {
    Self {
      name,
      skip: false,
      outcome: Outcome::Succeed,
      log: log.clone(),
    }
  }

  pub fn skipping(mut self) -> Self {
    self.skip = true;
    self
  }

  pub fn with_outcome(mut self, outcome: Outcome) -> Self {
    self.outcome = outcome;
    self
  }
}

#[async_trait]
impl Stage for RecordingStage {
  fn name(&self) -> &str {
    self.name
  }

  fn should_skip(&self, _ctx: &Context) -> bool {
    self.skip
  }

  async fn execute(&self, ctx: &mut Context) -> ReleaseResult<()> {
    self.log.lock().push(self.name.to_string());
    match self.outcome.clone() {
      Outcome::Succeed => Ok(()),
      Outcome::Fail(msg) => Err(anyhow::anyhow!(msg).into()),
      Outcome::SkipItself(reason) => Err(ReleaseError::skipped(reason)),
      Outcome::CancelRun => {
        ctx.cancellation().cancel();
        Ok(())
      }
    }
  }
}

/// Stand-in for a build collaborator: writes one file per name under the
/// current output root and registers it as a binary.
pub struct FakeBuildStage {
  pub files: Vec<&'static str>,
}

#[async_trait]
impl Stage for FakeBuildStage {
  fn name(&self) -> &str {
    "build"
  }

  async fn execute(&self, ctx: &mut Context) -> ReleaseResult<()> {
    let dist = ctx.dist().to_path_buf();
    let os = if ctx.split_target.is_empty() {
      "linux".to_string()
    } else {
      ctx.split_target.clone()
    };
    for file in &self.files {
      let path = dist.join(file);
      write_file(&path, file);
      ctx.artifacts.add(
        Artifact::new(*file, path.to_string_lossy().into_owned(), ArtifactKind::Binary)
          .with_platform(os.as_str(), "amd64", "v1")
          .with_extra("foo", "bar"),
      );
    }
    Ok(())
  }
}

pub fn project_with_dist(dist: &Path) -> Project {
  Project {
    project_name: "name".to_string(),
    dist: dist.to_path_buf(),
  }
}

pub fn context_with_dist(dist: &Path) -> Context {
  Context::new(project_with_dist(dist))
}

pub fn write_file(path: &Path, contents: &str) {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(path, contents).unwrap();
}

/// Sets or clears the variables split resolution reads. Callers must be #[serial].
pub fn set_os_env(override_os: Option<&str>, os: Option<&str>) {
  for (var, value) in [(stagehand::targets::OS_OVERRIDE_ENV, override_os), (stagehand::targets::OS_ENV, os)] {
    match value {
      Some(v) => std::env::set_var(var, v),
      None => std::env::remove_var(var),
    }
  }
}
