use tracing::debug;

use crate::error::EditError;
use crate::processed_string::ProcessedString;

/// A pipeline stage turning one snapshot into its successor
///
/// Stages usually open an editor on the snapshot they receive, queue edits
/// in that snapshot's coordinates and commit. They never see edits made by
/// earlier stages except through the offset map.
pub trait TextProcessor {
    /// Stage name used in logs
    fn name(&self) -> &str;

    fn process(&self, string: ProcessedString) -> Result<ProcessedString, EditError>;
}

/// Ordered chain of stages applied one after the other
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn TextProcessor>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage to the end of the chain
    pub fn with_stage(mut self, stage: impl TextProcessor + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Wrap raw text and run it through every stage
    pub fn run(&self, text: &str) -> Result<ProcessedString, EditError> {
        self.process(ProcessedString::wrap(text))
    }

    /// Run an existing snapshot through every stage; stops at the first error
    pub fn process(&self, mut string: ProcessedString) -> Result<ProcessedString, EditError> {
        for stage in &self.stages {
            let before = string.char_len();
            string = stage.process(string)?;
            debug!(
                stage = stage.name(),
                version = string.version(),
                before,
                after = string.char_len(),
                "stage complete"
            );
        }
        Ok(string)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}
