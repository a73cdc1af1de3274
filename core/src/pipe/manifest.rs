// stagehand/src/pipe/manifest.rs

//! `artifacts.json`: the registry written to disk at the end of a run.

use crate::artifact::{Artifact, ArtifactKind};
use crate::core::{Context, Stage};
use crate::error::{ReleaseError, ReleaseResult};
use async_trait::async_trait;
use std::fs;
use std::path::Path;
use tracing::{event, Level};

pub const MANIFEST_FILE: &str = "artifacts.json";

pub fn read_manifest(path: &Path) -> ReleaseResult<Vec<Artifact>> {
  let raw = fs::read(path).map_err(|e| ReleaseError::io(path, e))?;
  serde_json::from_slice(&raw).map_err(|source| ReleaseError::MalformedManifest {
    path: path.to_path_buf(),
    source,
  })
}

pub fn write_manifest(path: &Path, artifacts: &[Artifact]) -> ReleaseResult<()> {
  let json = serde_json::to_vec_pretty(artifacts).map_err(|e| ReleaseError::Stage { source: e.into() })?;
  fs::write(path, json).map_err(|e| ReleaseError::io(path, e))
}

/// Writes the registry to `<current dist>/artifacts.json` and registers the
/// file as a metadata artifact.
///
/// In a split run the output root is the partition, so this is what merge
/// later reads back.
pub struct ManifestStage;

#[async_trait]
impl Stage for ManifestStage {
  fn name(&self) -> &str {
    "manifest"
  }

  async fn execute(&self, ctx: &mut Context) -> ReleaseResult<()> {
    let dist = ctx.dist().to_path_buf();
    fs::create_dir_all(&dist).map_err(|e| ReleaseError::io(&dist, e))?;
    let path = dist.join(MANIFEST_FILE);
    let artifacts = ctx.artifacts.list();
    write_manifest(&path, &artifacts)?;
    event!(Level::INFO, path = %path.display(), count = artifacts.len(), "Wrote artifact manifest.");

    // Split runs have partition-relative paths by now; stay consistent.
    let registered_path = if ctx.split {
      MANIFEST_FILE.to_string()
    } else {
      path.to_string_lossy().into_owned()
    };
    ctx
      .artifacts
      .add(Artifact::new(MANIFEST_FILE, registered_path, ArtifactKind::Metadata));
    Ok(())
  }
}
