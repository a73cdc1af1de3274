// stagehand/src/targets.rs

//! Build target resolution and narrowing for split and partial builds.
//!
//! Target identifiers look like `<os>_<arch>[_<variant>]`, e.g.
//! `darwin_amd64_v1`. Only the OS axis is resolved for splits; the arch axis
//! only matters to partial builds.

use crate::core::Context;
use tracing::{event, Level};

/// Checked before [`OS_ENV`] when resolving the split OS.
pub const OS_OVERRIDE_ENV: &str = "GGOOS";
pub const OS_ENV: &str = "GOOS";
pub const ARCH_OVERRIDE_ENV: &str = "GGOARCH";
pub const ARCH_ENV: &str = "GOARCH";

/// The running platform's OS in target vocabulary.
pub fn runtime_os() -> &'static str {
  match std::env::consts::OS {
    "macos" => "darwin",
    other => other,
  }
}

/// The running platform's arch in target vocabulary.
pub fn runtime_arch() -> &'static str {
  match std::env::consts::ARCH {
    "x86_64" => "amd64",
    "aarch64" => "arm64",
    "x86" => "386",
    "powerpc64" => "ppc64",
    other => other,
  }
}

/// OS to build for: override variable, then the standard one, then runtime.
/// Empty variables count as unset.
pub fn resolve_os() -> String {
  first_set(&[OS_OVERRIDE_ENV, OS_ENV]).unwrap_or_else(|| runtime_os().to_string())
}

pub fn resolve_arch() -> String {
  first_set(&[ARCH_OVERRIDE_ENV, ARCH_ENV]).unwrap_or_else(|| runtime_arch().to_string())
}

fn first_set(vars: &[&str]) -> Option<String> {
  vars
    .iter()
    .filter_map(|var| std::env::var(var).ok())
    .find(|value| !value.is_empty())
}

/// Narrows the build matrix for the current run.
///
/// Without split or partial mode the list comes back unchanged. Otherwise the
/// result holds at most one target: the first whose identifier starts with the
/// split target (split wins) or the partial target.
pub fn filter(ctx: &Context, targets: &[String]) -> Vec<String> {
  if !ctx.partial && !ctx.split {
    return targets.to_vec();
  }

  let wanted = if ctx.split {
    ctx.split_target.as_str()
  } else {
    ctx.partial_target.as_str()
  };

  event!(Level::INFO, target = wanted, "Partial build.");
  first_match(targets, wanted)
}

/// First target starting with `prefix`, as a list of zero or one element.
pub fn first_match(targets: &[String], prefix: &str) -> Vec<String> {
  targets
    .iter()
    .find(|t| t.starts_with(prefix))
    .cloned()
    .into_iter()
    .collect()
}
