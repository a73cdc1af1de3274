// stagehand/src/pipe/merge.rs

//! Reconciles split partitions back into one output root and registry.

use crate::core::{Context, Stage};
use crate::error::{ReleaseError, ReleaseResult};
use crate::pipe::manifest::{read_manifest, MANIFEST_FILE};
use async_trait::async_trait;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{event, Level};

/// Moves every partition's artifacts up into the output root.
///
/// Each immediate subdirectory of the output root is a partition and must
/// hold an `artifacts.json`. Non-metadata artifacts are moved to the same
/// relative path under the output root and registered with that path; the
/// partition directory is then deleted with whatever is left in it. Entries
/// with absolute paths fail the partition before anything in it is moved.
///
/// The first failure aborts the whole merge and nothing already moved is put
/// back, so a failed merge needs a look by hand before rerunning. Rerunning
/// after a successful merge finds no partitions and does nothing.
pub struct MergeStage;

#[async_trait]
impl Stage for MergeStage {
  fn name(&self) -> &str {
    "merge"
  }

  fn should_skip(&self, ctx: &Context) -> bool {
    !ctx.merge
  }

  async fn execute(&self, ctx: &mut Context) -> ReleaseResult<()> {
    let dist = ctx.dist().to_path_buf();
    for partition in partitions(&dist)? {
      merge_partition(ctx, &dist, &partition)?;
    }
    Ok(())
  }
}

/// Immediate subdirectories of `dist`, sorted by name.
fn partitions(dist: &Path) -> ReleaseResult<Vec<PathBuf>> {
  let entries = fs::read_dir(dist).map_err(|e| ReleaseError::io(dist, e))?;
  let mut dirs = Vec::new();
  for entry in entries {
    let entry = entry.map_err(|e| ReleaseError::io(dist, e))?;
    let file_type = entry.file_type().map_err(|e| ReleaseError::io(entry.path(), e))?;
    if file_type.is_dir() {
      dirs.push(entry.path());
    }
  }
  dirs.sort();
  Ok(dirs)
}

fn merge_partition(ctx: &Context, dist: &Path, partition: &Path) -> ReleaseResult<()> {
  let artifacts = read_manifest(&partition.join(MANIFEST_FILE))?;
  event!(
    Level::INFO,
    partition = %partition.display(),
    count = artifacts.len(),
    "Merging partition."
  );

  // Checked up front so a bad entry fails the partition before anything moves.
  if let Some(bad) = artifacts.iter().find(|a| !a.is_metadata() && !is_partition_relative(&a.path)) {
    return Err(ReleaseError::InvalidArtifactPath {
      partition: partition.to_path_buf(),
      path: bad.path.clone(),
    });
  }

  for mut artifact in artifacts {
    if artifact.is_metadata() {
      continue;
    }
    let old_path = partition.join(&artifact.path);
    let new_path = dist.join(&artifact.path);
    artifact.path = new_path.to_string_lossy().into_owned();
    ctx.artifacts.add(artifact);

    if let Some(parent) = new_path.parent() {
      fs::create_dir_all(parent).map_err(|e| ReleaseError::io(parent, e))?;
    }
    fs::rename(&old_path, &new_path).map_err(|e| ReleaseError::io(&old_path, e))?;
    event!(Level::DEBUG, from = %old_path.display(), to = %new_path.display(), "Moved artifact.");
  }

  fs::remove_dir_all(partition).map_err(|e| ReleaseError::io(partition, e))
}

/// `Path::join` discards its base for rooted or prefixed paths, which would make
/// the move a no-op and the partition cleanup delete the file.
fn is_partition_relative(path: &str) -> bool {
  let path = Path::new(path);
  !path.has_root() && !path.components().any(|c| matches!(c, Component::Prefix(_)))
}
