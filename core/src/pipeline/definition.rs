// stagehand/src/pipeline/definition.rs

//! Contains the `Pipeline` struct definition and methods for its
//! construction and structural modification.

use crate::core::Stage;
use crate::middleware;

/// An ordered list of stages run one after another against one context.
///
/// Every stage is wrapped in the middleware stack
/// ([`middleware::wrap`]) when it is added. Stage names must be unique
/// within a pipeline since the skip set addresses stages by name.
#[derive(Default)]
pub struct Pipeline {
  pub(crate) stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends `stage` and returns the pipeline, for chained construction.
  pub fn with_stage<S: Stage + 'static>(mut self, stage: S) -> Self {
    self.push(stage);
    self
  }

  pub fn push<S: Stage + 'static>(&mut self, stage: S) {
    let idx = self.stages.len();
    self.insert_at(idx, Box::new(stage));
  }

  /// Appends already boxed stages, e.g. collaborator stages chosen at runtime.
  pub fn extend(&mut self, stages: Vec<Box<dyn Stage>>) {
    for stage in stages {
      let idx = self.stages.len();
      self.insert_at(idx, stage);
    }
  }

  pub fn insert_before<S: Stage + 'static>(&mut self, existing_stage: &str, stage: S) {
    let idx = self.position_of(existing_stage);
    self.insert_at(idx, Box::new(stage));
  }

  pub fn insert_after<S: Stage + 'static>(&mut self, existing_stage: &str, stage: S) {
    let idx = self.position_of(existing_stage);
    self.insert_at(idx + 1, Box::new(stage));
  }

  /// Removes the stage named `name`. Returns false if there was none.
  pub fn remove(&mut self, name: &str) -> bool {
    match self.stages.iter().position(|s| s.name() == name) {
      Some(idx) => {
        self.stages.remove(idx);
        true
      }
      None => false,
    }
  }

  pub fn contains(&self, name: &str) -> bool {
    self.stages.iter().any(|s| s.name() == name)
  }

  pub fn stage_names(&self) -> Vec<&str> {
    self.stages.iter().map(|s| s.name()).collect()
  }

  pub fn len(&self) -> usize {
    self.stages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.stages.is_empty()
  }

  fn insert_at(&mut self, idx: usize, stage: Box<dyn Stage>) {
    // A duplicate or missing name is a programming error in how the pipeline
    // was assembled, not a runtime condition.
    if self.contains(stage.name()) {
      panic!("Pipeline setup error: stage '{}' already exists.", stage.name());
    }
    self.stages.insert(idx, Box::new(middleware::wrap(stage)));
  }

  fn position_of(&self, name: &str) -> usize {
    self
      .stages
      .iter()
      .position(|s| s.name() == name)
      .unwrap_or_else(|| panic!("Pipeline setup error: stage '{}' not found.", name))
  }
}

impl std::fmt::Debug for Pipeline {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline").field("stages", &self.stage_names()).finish()
  }
}
