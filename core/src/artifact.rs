// stagehand/src/artifact.rs

//! Produced build outputs and the registry every stage reads and writes.

use crate::error::ReleaseResult;
use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Role of an artifact in the release.
///
/// Each kind has a stable numeric code, which is what manifests store in
/// `internal_type`. Codes not known to this version decode as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ArtifactKind {
  #[default]
  Unknown,
  Archive,
  UploadableBinary,
  UploadableFile,
  Binary,
  UniversalBinary,
  SourceArchive,
  LinuxPackage,
  DockerImage,
  Checksum,
  Signature,
  Certificate,
  Sbom,
  /// Run-scoped records such as the manifest itself. Never merged.
  Metadata,
}

impl ArtifactKind {
  pub const ALL: [ArtifactKind; 14] = [
    Self::Unknown,
    Self::Archive,
    Self::UploadableBinary,
    Self::UploadableFile,
    Self::Binary,
    Self::UniversalBinary,
    Self::SourceArchive,
    Self::LinuxPackage,
    Self::DockerImage,
    Self::Checksum,
    Self::Signature,
    Self::Certificate,
    Self::Sbom,
    Self::Metadata,
  ];

  pub fn code(self) -> u8 {
    match self {
      Self::Unknown => 0,
      Self::Archive => 1,
      Self::UploadableBinary => 2,
      Self::UploadableFile => 3,
      Self::Binary => 4,
      Self::UniversalBinary => 5,
      Self::SourceArchive => 6,
      Self::LinuxPackage => 7,
      Self::DockerImage => 8,
      Self::Checksum => 9,
      Self::Signature => 10,
      Self::Certificate => 11,
      Self::Sbom => 12,
      Self::Metadata => 13,
    }
  }

  pub fn from_code(code: u64) -> Self {
    Self::ALL
      .iter()
      .copied()
      .find(|kind| u64::from(kind.code()) == code)
      .unwrap_or(Self::Unknown)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Unknown => "Unknown",
      Self::Archive => "Archive",
      Self::UploadableBinary => "Binary",
      Self::UploadableFile => "File",
      Self::Binary => "Binary",
      Self::UniversalBinary => "Universal Binary",
      Self::SourceArchive => "Source",
      Self::LinuxPackage => "Linux Package",
      Self::DockerImage => "Docker Image",
      Self::Checksum => "Checksum",
      Self::Signature => "Signature",
      Self::Certificate => "Certificate",
      Self::Sbom => "SBOM",
      Self::Metadata => "Metadata",
    }
  }
}

impl fmt::Display for ArtifactKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for ArtifactKind {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(self.code())
  }
}

impl<'de> Deserialize<'de> for ArtifactKind {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let code = u64::deserialize(deserializer)?;
    Ok(Self::from_code(code))
  }
}

/// One produced file plus its platform and role metadata.
///
/// `path` is relative to whatever output root is current: absolute-ish
/// (`<dist>/...`) during a normal run, partition-relative in a split manifest,
/// and rewritten again by merge.
///
/// Manifests also carry a `type` field with the display name of `kind`. It is
/// written from `kind` and ignored when reading, so the two never disagree.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Artifact {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub path: String,
  #[serde(default, alias = "goos")]
  pub os: String,
  #[serde(default, alias = "goarch")]
  pub arch: String,
  #[serde(default, rename = "arch-variant", alias = "goarm")]
  pub arch_variant: String,
  #[serde(default, rename = "internal_type")]
  pub kind: ArtifactKind,
  #[serde(default)]
  pub extra: BTreeMap<String, serde_json::Value>,
}

impl Artifact {
  pub fn new(name: impl Into<String>, path: impl Into<String>, kind: ArtifactKind) -> Self {
    Self {
      name: name.into(),
      path: path.into(),
      kind,
      ..Default::default()
    }
  }

  pub fn with_platform(mut self, os: impl Into<String>, arch: impl Into<String>, arch_variant: impl Into<String>) -> Self {
    self.os = os.into();
    self.arch = arch.into();
    self.arch_variant = arch_variant.into();
    self
  }

  pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
    self.extra.insert(key.into(), value.into());
    self
  }

  pub fn is_metadata(&self) -> bool {
    self.kind == ArtifactKind::Metadata
  }
}

#[derive(Serialize)]
struct ArtifactRecord<'a> {
  name: &'a str,
  path: &'a str,
  os: &'a str,
  arch: &'a str,
  #[serde(rename = "arch-variant")]
  arch_variant: &'a str,
  internal_type: ArtifactKind,
  #[serde(rename = "type")]
  kind_name: &'static str,
  extra: &'a BTreeMap<String, serde_json::Value>,
}

impl Serialize for Artifact {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    ArtifactRecord {
      name: &self.name,
      path: &self.path,
      os: &self.os,
      arch: &self.arch,
      arch_variant: &self.arch_variant,
      internal_type: self.kind,
      kind_name: self.kind.as_str(),
      extra: &self.extra,
    }
    .serialize(serializer)
  }
}

/// Ordered, append-only collection of artifacts.
///
/// Insertion order is kept for listing. Duplicate names and paths are legal.
/// The inner lock lets a stage's own parallel work register outputs through a
/// shared reference; the pipeline itself never runs two stages at once.
#[derive(Debug, Default)]
pub struct Artifacts {
  items: RwLock<Vec<Artifact>>,
}

impl Artifacts {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&self, artifact: Artifact) {
    tracing::trace!(name = %artifact.name, path = %artifact.path, kind = %artifact.kind, "Artifact added.");
    self.items.write().push(artifact);
  }

  /// Snapshot of every artifact, in insertion order.
  pub fn list(&self) -> Vec<Artifact> {
    self.items.read().clone()
  }

  pub fn filter(&self, kind: ArtifactKind) -> Vec<Artifact> {
    self.by_kinds(&[kind])
  }

  pub fn by_kinds(&self, kinds: &[ArtifactKind]) -> Vec<Artifact> {
    self
      .items
      .read()
      .iter()
      .filter(|a| kinds.contains(&a.kind))
      .cloned()
      .collect()
  }

  /// Calls `f` on each artifact in order, allowing in-place edits.
  /// Stops at and returns the first error; earlier edits are kept.
  pub fn visit<F>(&self, mut f: F) -> ReleaseResult<()>
  where
    F: FnMut(&mut Artifact) -> ReleaseResult<()>,
  {
    let mut items = self.items.write();
    for artifact in items.iter_mut() {
      f(artifact)?;
    }
    Ok(())
  }

  pub fn len(&self) -> usize {
    self.items.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.read().is_empty()
  }
}
