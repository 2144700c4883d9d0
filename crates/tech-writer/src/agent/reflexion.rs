//! Reflexion strategy
//!
//! Runs the same loop as ReAct but, after a step that produced no final
//! answer, asks the model to reflect on its previous actions. The reflection
//! is a suffix on the system prompt that is visible to the next model call
//! only; the pristine prompt is restored as soon as that call returns.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::tools::ToolExecutor;

use super::agent_loop::{AgentError, AgentLoop, StepOutcome};
use super::client::ModelClient;
use super::prompts::{reflexion_system_prompt, REFLECTION_INSTRUCTION};
use super::state::{AgentConfig, AgentState, SystemPromptOverlay};
use super::RunStrategy;

pub struct ReflexionAgent {
    inner: AgentLoop,
}

impl ReflexionAgent {
    pub fn new(client: Arc<dyn ModelClient>, config: AgentConfig) -> Self {
        Self {
            inner: AgentLoop::new(client, config),
        }
    }

    #[instrument(skip(self, prompt, directory), fields(dir = %directory.display()))]
    pub async fn analyze(&self, prompt: &str, directory: &Path) -> Result<AgentState, AgentError> {
        let executor = ToolExecutor::new(directory);
        let mut state = self.inner.start(reflexion_system_prompt(), prompt);
        let mut overlay = SystemPromptOverlay::new();
        let max_steps = self.inner.max_steps();

        while state.step < max_steps {
            state.increment_step();
            info!(step = state.step, max_steps, "Starting step");

            let called = self.inner.await_model(&mut state).await;
            if overlay.restore(&mut state.memory) {
                debug!(step = state.step, "Restored system prompt");
            }
            called?;

            match self.inner.execute_tools(&mut state, &executor)? {
                StepOutcome::Finished => return Ok(state),
                StepOutcome::NoToolCalls => continue,
                StepOutcome::Continue => {}
            }

            // A reflection after the last step would never be seen
            if state.step < max_steps {
                overlay.apply(&mut state.memory, REFLECTION_INSTRUCTION);
                info!(step = state.step, "Added reflection");
            }
            debug!(messages = state.memory.len(), "Memory size");
        }

        Err(AgentError::StepLimit(max_steps))
    }
}

#[async_trait]
impl RunStrategy for ReflexionAgent {
    fn name(&self) -> &'static str {
        "reflexion"
    }

    async fn run(&self, prompt: &str, directory: &Path) -> Result<PathBuf, AgentError> {
        let state = self.analyze(prompt, directory).await?;
        self.inner.finish(&state, self.name())
    }
}
