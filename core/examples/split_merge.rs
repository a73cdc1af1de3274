// stagehand/examples/split_merge.rs

use async_trait::async_trait;
use stagehand::run::{new_context, ReleaseOptions};
use stagehand::{Artifact, ArtifactKind, Context, Pipeline, Project, ReleaseError, ReleaseResult, Stage};
use tracing::{info, Level};

// 1. A stand-in for a real build stage: writes one binary per split target.
struct HelloBuild;

#[async_trait]
impl Stage for HelloBuild {
  fn name(&self) -> &str {
    "build"
  }

  async fn execute(&self, ctx: &mut Context) -> ReleaseResult<()> {
    let path = ctx.dist().join("hello");
    std::fs::create_dir_all(ctx.dist()).map_err(|e| ReleaseError::io(ctx.dist(), e))?;
    std::fs::write(&path, ctx.split_target.as_bytes()).map_err(|e| ReleaseError::io(&path, e))?;
    ctx.artifacts.add(
      Artifact::new("hello", path.to_string_lossy(), ArtifactKind::Binary).with_platform(
        ctx.split_target.as_str(),
        "amd64",
        "",
      ),
    );
    Ok(())
  }
}

#[tokio::main]
async fn main() -> Result<(), ReleaseError> {
  tracing_subscriber::fmt().with_max_level(Level::INFO).init();

  let tmp = tempfile::tempdir().map_err(|e| ReleaseError::io(std::env::temp_dir(), e))?;
  let project = Project {
    project_name: "hello".to_string(),
    dist: tmp.path().to_path_buf(),
  };

  // 2. Two split invocations, as two CI machines would run them.
  for os in ["linux", "darwin"] {
    std::env::set_var(stagehand::targets::OS_OVERRIDE_ENV, os);
    let pipeline = Pipeline::build_pipeline(vec![Box::new(HelloBuild)]);
    let options = ReleaseOptions {
      split: true,
      ..Default::default()
    };
    let mut ctx = new_context(project.clone(), &options, &pipeline)?;
    pipeline.run(&mut ctx).await?;
    info!(partition = %ctx.dist().display(), "Split invocation done.");
  }
  std::env::remove_var(stagehand::targets::OS_OVERRIDE_ENV);

  // 3. One merge invocation to bring them back together.
  let pipeline = Pipeline::continue_pipeline(Vec::new());
  let options = ReleaseOptions {
    merge: true,
    ..Default::default()
  };
  let mut ctx = new_context(project, &options, &pipeline)?;
  pipeline.run(&mut ctx).await?;

  for artifact in ctx.artifacts.list().into_iter().filter(|a| !a.is_metadata()) {
    info!(name = %artifact.name, os = %artifact.os, path = %artifact.path, "Merged artifact.");
  }
  Ok(())
}
