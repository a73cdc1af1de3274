// tests/merge_tests.rs
mod common;

use common::*;
use pretty_assertions::assert_eq;
use serial_test::serial;
use stagehand::pipe::manifest::write_manifest;
use stagehand::{Artifact, ArtifactKind, Context, MergeStage, Project, ReleaseError, Stage};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

const LINUX_MANIFEST: &str = r#"[{"name":"otherfoo","path":"other/foo.txt","os":"linux","arch":"arm64","arch-variant":"7","internal_type":4,"type":"Binary","extra":{"foo":"bar"}}]"#;
const DARWIN_MANIFEST: &str = r#"[{"name":"foo","path":"foo.txt","os":"darwin","arch":"amd64","arch-variant":"7","internal_type":4,"type":"Binary","extra":{"foo":"bar"}}]"#;

fn merge_ctx(dist: &Path) -> Context {
  let mut ctx = context_with_dist(dist);
  ctx.merge = true;
  ctx
}

fn seed_two_partitions(dist: &Path) {
  write_file(&dist.join("linux/other/foo.txt"), "foo");
  write_file(&dist.join("linux/artifacts.json"), LINUX_MANIFEST);
  write_file(&dist.join("darwin/foo.txt"), "foo");
  write_file(&dist.join("darwin/artifacts.json"), DARWIN_MANIFEST);
}

#[test]
fn test_name_and_skip() {
  assert_eq!(MergeStage.name(), "merge");
  assert!(MergeStage.should_skip(&Context::new(Project::default())));
  let mut ctx = Context::new(Project::default());
  ctx.merge = true;
  assert!(!MergeStage.should_skip(&ctx));
}

#[tokio::test]
#[serial]
async fn test_missing_dist_is_not_found() {
  setup_tracing();
  let tmp = tempfile::tempdir().unwrap();
  let mut ctx = merge_ctx(&tmp.path().join("nope"));
  assert!(MergeStage.execute(&mut ctx).await.unwrap_err().is_not_found());
}

#[tokio::test]
#[serial]
async fn test_missing_manifest_is_not_found() {
  setup_tracing();
  let tmp = tempfile::tempdir().unwrap();
  fs::create_dir(tmp.path().join("linux")).unwrap();
  let mut ctx = merge_ctx(tmp.path());
  assert!(MergeStage.execute(&mut ctx).await.unwrap_err().is_not_found());
}

#[tokio::test]
#[serial]
async fn test_missing_manifest_among_valid_partitions_fails_merge() {
  setup_tracing();
  let tmp = tempfile::tempdir().unwrap();
  write_file(&tmp.path().join("linux/other/foo.txt"), "foo");
  write_file(&tmp.path().join("linux/artifacts.json"), LINUX_MANIFEST);
  fs::create_dir(tmp.path().join("windows")).unwrap();

  let mut ctx = merge_ctx(tmp.path());
  let err = MergeStage.execute(&mut ctx).await.unwrap_err();
  assert!(err.is_not_found());
  // The broken partition is left for inspection.
  assert!(tmp.path().join("windows").is_dir());
}

#[tokio::test]
#[serial]
async fn test_missing_binary_is_not_found() {
  setup_tracing();
  let tmp = tempfile::tempdir().unwrap();
  write_file(&tmp.path().join("linux/artifacts.json"), r#"[{"path":"foo.txt"}]"#);
  let mut ctx = merge_ctx(tmp.path());
  assert!(MergeStage.execute(&mut ctx).await.unwrap_err().is_not_found());
}

#[tokio::test]
#[serial]
async fn test_malformed_manifest() {
  setup_tracing();
  let tmp = tempfile::tempdir().unwrap();
  write_file(&tmp.path().join("linux/artifacts.json"), "{not json");
  let mut ctx = merge_ctx(tmp.path());
  let err = MergeStage.execute(&mut ctx).await.unwrap_err();
  assert!(matches!(err, ReleaseError::MalformedManifest { .. }));
  assert!(ctx.artifacts.is_empty());
}

#[tokio::test]
#[serial]
async fn test_merge_relocates_artifacts() {
  setup_tracing();
  let tmp = tempfile::tempdir().unwrap();
  let dist = tmp.path().join("dist");
  fs::create_dir(&dist).unwrap();
  seed_two_partitions(&dist);
  // Loose files in the output root are not partitions.
  write_file(&dist.join("config.yaml"), "x");

  let mut ctx = merge_ctx(&dist);
  MergeStage.execute(&mut ctx).await.unwrap();

  assert!(!dist.join("linux").exists());
  assert!(!dist.join("darwin").exists());
  assert!(dist.join("foo.txt").is_file());
  assert!(dist.join("other/foo.txt").is_file());
  assert!(dist.join("config.yaml").is_file());

  assert_eq!(
    ctx.artifacts.list(),
    vec![
      Artifact::new("foo", dist.join("foo.txt").to_string_lossy(), ArtifactKind::Binary)
        .with_platform("darwin", "amd64", "7")
        .with_extra("foo", "bar"),
      Artifact::new("otherfoo", dist.join("other/foo.txt").to_string_lossy(), ArtifactKind::Binary)
        .with_platform("linux", "arm64", "7")
        .with_extra("foo", "bar"),
    ]
  );
}

#[tokio::test]
#[serial]
async fn test_merge_drops_metadata_artifacts() {
  setup_tracing();
  let tmp = tempfile::tempdir().unwrap();
  write_file(&tmp.path().join("linux/app"), "bin");
  write_file(&tmp.path().join("linux/metadata.json"), "{}");
  write_file(
    &tmp.path().join("linux/artifacts.json"),
    r#"[
      {"name":"app","path":"app","internal_type":4,"type":"Binary"},
      {"name":"metadata.json","path":"metadata.json","internal_type":13,"type":"Metadata"}
    ]"#,
  );

  let mut ctx = merge_ctx(tmp.path());
  MergeStage.execute(&mut ctx).await.unwrap();

  let names: Vec<_> = ctx.artifacts.list().into_iter().map(|a| a.name).collect();
  assert_eq!(names, vec!["app"]);
  assert!(tmp.path().join("app").is_file());
  assert!(!tmp.path().join("metadata.json").exists());
  assert!(!tmp.path().join("linux").exists());
}

#[tokio::test]
#[serial]
async fn test_absolute_manifest_path_is_rejected_and_file_kept() {
  setup_tracing();
  let tmp = tempfile::tempdir().unwrap();
  let dist = tmp.path().join("dist");
  let app = dist.join("linux/app");
  write_file(&app, "bin");
  write_file(&dist.join("linux/other.txt"), "x");
  write_manifest(
    &dist.join("linux/artifacts.json"),
    &[
      Artifact::new("other", "other.txt", ArtifactKind::UploadableFile),
      Artifact::new("app", app.to_string_lossy(), ArtifactKind::Binary),
    ],
  )
  .unwrap();

  let mut ctx = merge_ctx(&dist);
  match MergeStage.execute(&mut ctx).await.unwrap_err() {
    ReleaseError::InvalidArtifactPath { partition, path } => {
      assert_eq!(partition, dist.join("linux"));
      assert_eq!(path, app.to_string_lossy());
    }
    other => panic!("Expected InvalidArtifactPath, got {:?}", other),
  }
  // Nothing moved, nothing registered, partition untouched.
  assert!(app.is_file());
  assert!(dist.join("linux/other.txt").is_file());
  assert!(!dist.join("other.txt").exists());
  assert!(ctx.artifacts.is_empty());
}

#[tokio::test]
#[serial]
async fn test_merge_is_order_independent() {
  setup_tracing();
  // Same content under partition names that sort the other way round.
  let first = tempfile::tempdir().unwrap();
  seed_two_partitions(first.path());

  let second = tempfile::tempdir().unwrap();
  write_file(&second.path().join("a-linux/other/foo.txt"), "foo");
  write_file(&second.path().join("a-linux/artifacts.json"), LINUX_MANIFEST);
  write_file(&second.path().join("z-darwin/foo.txt"), "foo");
  write_file(&second.path().join("z-darwin/artifacts.json"), DARWIN_MANIFEST);

  let mut first_ctx = merge_ctx(first.path());
  MergeStage.execute(&mut first_ctx).await.unwrap();
  let mut second_ctx = merge_ctx(second.path());
  MergeStage.execute(&mut second_ctx).await.unwrap();

  let relative = |ctx: &Context, root: &Path| -> BTreeSet<(String, String)> {
    ctx
      .artifacts
      .list()
      .into_iter()
      .map(|a| {
        let rel = Path::new(&a.path).strip_prefix(root).unwrap().to_string_lossy().into_owned();
        (a.name, rel)
      })
      .collect()
  };
  assert_eq!(relative(&first_ctx, first.path()), relative(&second_ctx, second.path()));
  for root in [first.path(), second.path()] {
    assert!(root.join("foo.txt").is_file());
    assert!(root.join("other/foo.txt").is_file());
    assert_eq!(fs::read_dir(root).unwrap().count(), 2);
  }
}

#[tokio::test]
#[serial]
async fn test_rerun_after_success_is_noop() {
  setup_tracing();
  let tmp = tempfile::tempdir().unwrap();
  seed_two_partitions(tmp.path());

  let mut ctx = merge_ctx(tmp.path());
  MergeStage.execute(&mut ctx).await.unwrap();

  let mut again = merge_ctx(tmp.path());
  MergeStage.execute(&mut again).await.unwrap();
  assert!(again.artifacts.is_empty());
  assert!(tmp.path().join("foo.txt").is_file());
}
