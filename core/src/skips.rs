// stagehand/src/skips.rs

//! The set of stage names a run was asked to skip.

use crate::error::{ReleaseError, ReleaseResult};
use std::collections::BTreeSet;
use std::fmt;

pub const PUBLISH: &str = "publish";
pub const ANNOUNCE: &str = "announce";
pub const VALIDATE: &str = "validate";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Skips(BTreeSet<String>);

impl Skips {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds user-requested skips, rejecting any name outside `valid`.
  /// Nothing is added unless every name is valid.
  pub fn set_requested<I, S>(&mut self, names: I, valid: &[&str]) -> ReleaseResult<()>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let names: Vec<String> = names
      .into_iter()
      .map(|n| n.as_ref().trim().to_string())
      .filter(|n| !n.is_empty())
      .collect();
    if let Some(bad) = names.iter().find(|n| !valid.contains(&n.as_str())) {
      let mut valid: Vec<String> = valid.iter().map(|v| v.to_string()).collect();
      valid.sort();
      return Err(ReleaseError::InvalidSkip {
        name: bad.clone(),
        valid,
      });
    }
    self.0.extend(names);
    Ok(())
  }

  /// Adds skips implied by other flags. These are not validated.
  pub fn set(&mut self, names: &[&str]) {
    self.0.extend(names.iter().map(|n| n.to_string()));
  }

  pub fn contains(&self, name: &str) -> bool {
    self.0.contains(name)
  }

  pub fn any(&self, names: &[&str]) -> bool {
    names.iter().any(|n| self.contains(n))
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }
}

impl fmt::Display for Skips {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.iter().collect::<Vec<_>>().join(", "))
  }
}
