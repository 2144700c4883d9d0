//! Agent state management

use std::path::PathBuf;

use super::memory::ConversationMemory;

/// Upper bound on model calls per run
pub const MAX_STEPS: usize = 15;

/// Configuration for the agent
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Model to use
    pub model: String,
    /// Maximum steps before giving up
    pub max_steps: usize,
    /// Directory final answers are written to
    pub output_dir: PathBuf,
    /// Show a spinner while waiting for the model
    pub verbose: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_steps: MAX_STEPS,
            output_dir: PathBuf::from("output"),
            verbose: false,
        }
    }
}

impl AgentConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    #[cfg(test)]
    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// State of a single run
#[derive(Debug)]
pub struct AgentState {
    /// Message history
    pub memory: ConversationMemory,
    /// Current step (1-based once the loop starts)
    pub step: usize,
    final_answer: Option<String>,
}

impl AgentState {
    pub fn new(memory: ConversationMemory) -> Self {
        Self {
            memory,
            step: 0,
            final_answer: None,
        }
    }

    /// Record the terminal answer; the first non-empty answer wins
    ///
    /// Returns whether the answer was recorded.
    pub fn record_final_answer(&mut self, answer: String) -> bool {
        if self.final_answer.is_some() || answer.is_empty() {
            return false;
        }
        self.final_answer = Some(answer);
        true
    }

    pub fn final_answer(&self) -> Option<&str> {
        self.final_answer.as_deref()
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.final_answer.is_some()
    }

    pub fn increment_step(&mut self) {
        self.step += 1;
    }
}

/// Transient suffix on the system prompt
///
/// Snapshots the pristine system content the first time it is applied and
/// restores it exactly. Applying again while pending replaces the suffix
/// rather than stacking it.
#[derive(Debug, Default)]
pub struct SystemPromptOverlay {
    pristine: Option<String>,
    pending_restore: bool,
}

impl SystemPromptOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `suffix` to the system message and schedule its restore
    pub fn apply(&mut self, memory: &mut ConversationMemory, suffix: &str) {
        let Some(content) = memory.system_content_mut() else {
            return;
        };
        let pristine = self.pristine.get_or_insert_with(|| content.clone());
        *content = format!("{pristine}{suffix}");
        self.pending_restore = true;
    }

    /// Restore the pristine system message if a restore is pending
    ///
    /// Returns whether anything was restored.
    pub fn restore(&mut self, memory: &mut ConversationMemory) -> bool {
        if !self.pending_restore {
            return false;
        }
        self.pending_restore = false;

        match (self.pristine.as_ref(), memory.system_content_mut()) {
            (Some(pristine), Some(content)) => {
                content.clone_from(pristine);
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending_restore
    }

    #[cfg(test)]
    pub fn pristine(&self) -> Option<&str> {
        self.pristine.as_deref()
    }
}
