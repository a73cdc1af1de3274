// stagehand/src/pipe/split.rs

//! Narrows a run to one OS so its outputs land in their own partition.

use crate::core::{Context, Stage};
use crate::error::{ReleaseError, ReleaseResult};
use crate::targets;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::{event, Level};

/// Resolves the split target and moves the output root to `<dist>/<target>`.
pub struct SplitStage;

#[async_trait]
impl Stage for SplitStage {
  fn name(&self) -> &str {
    "split"
  }

  fn should_skip(&self, ctx: &Context) -> bool {
    !ctx.split
  }

  async fn execute(&self, ctx: &mut Context) -> ReleaseResult<()> {
    let target = targets::resolve_os();
    let dist = ctx.dist().join(&target);
    event!(Level::INFO, %target, dist = %dist.display(), "Split build.");
    ctx.split_target = target;
    ctx.set_dist(dist);
    Ok(())
  }
}

/// Rewrites every artifact path relative to the (already narrowed) output
/// root, in forward-slash form, so the partition manifest is self-contained.
pub struct SplitArtifactsStage;

#[async_trait]
impl Stage for SplitArtifactsStage {
  fn name(&self) -> &str {
    "split-artifacts"
  }

  fn should_skip(&self, ctx: &Context) -> bool {
    !ctx.split
  }

  async fn execute(&self, ctx: &mut Context) -> ReleaseResult<()> {
    let dist = ctx.dist().to_path_buf();
    ctx.artifacts.visit(|artifact| {
      let relative = relative_path(&dist, Path::new(&artifact.path))?;
      artifact.path = to_slash(&relative);
      Ok(())
    })
  }
}

/// Lexical equivalent of "the path that leads from `base` to `path`".
/// Neither path has to exist. Fails when only one of them is absolute or when
/// `base` climbs above its starting point with `..` in a way `path` can't follow.
pub fn relative_path(base: &Path, path: &Path) -> ReleaseResult<PathBuf> {
  let err = || ReleaseError::RelativePath {
    base: base.to_path_buf(),
    path: path.to_path_buf(),
  };
  if base.has_root() != path.has_root() {
    return Err(err());
  }
  let base_parts = clean(base);
  let path_parts = clean(path);

  let common = base_parts
    .iter()
    .zip(path_parts.iter())
    .take_while(|(a, b)| a == b)
    .count();

  let mut relative = PathBuf::new();
  for part in &base_parts[common..] {
    if part == ".." {
      return Err(err());
    }
    relative.push("..");
  }
  for part in &path_parts[common..] {
    relative.push(part);
  }
  if relative.as_os_str().is_empty() {
    relative.push(".");
  }
  Ok(relative)
}

// Normal components after resolving `.` and `..` textually. Leading `..`s
// that can't be resolved are kept.
fn clean(path: &Path) -> Vec<String> {
  let mut parts: Vec<String> = Vec::new();
  for component in path.components() {
    match component {
      Component::Prefix(p) => parts.push(p.as_os_str().to_string_lossy().into_owned()),
      Component::RootDir | Component::CurDir => {}
      Component::ParentDir => {
        if matches!(parts.last(), Some(last) if last != "..") {
          parts.pop();
        } else if !path.has_root() {
          parts.push("..".to_string());
        }
      }
      Component::Normal(p) => parts.push(p.to_string_lossy().into_owned()),
    }
  }
  parts
}

fn to_slash(path: &Path) -> String {
  path
    .components()
    .map(|c| c.as_os_str().to_string_lossy().into_owned())
    .collect::<Vec<_>>()
    .join("/")
}
