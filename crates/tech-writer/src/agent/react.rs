//! ReAct strategy: reason, act, observe, repeat

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::tools::ToolExecutor;

use super::agent_loop::{AgentError, AgentLoop, StepOutcome};
use super::client::ModelClient;
use super::prompts::react_system_prompt;
use super::state::{AgentConfig, AgentState};
use super::RunStrategy;

pub struct ReActAgent {
    inner: AgentLoop,
}

impl ReActAgent {
    pub fn new(client: Arc<dyn ModelClient>, config: AgentConfig) -> Self {
        Self {
            inner: AgentLoop::new(client, config),
        }
    }

    /// Run the loop until a final answer or the step bound
    #[instrument(skip(self, prompt, directory), fields(dir = %directory.display()))]
    pub async fn analyze(&self, prompt: &str, directory: &Path) -> Result<AgentState, AgentError> {
        let executor = ToolExecutor::new(directory);
        let mut state = self.inner.start(react_system_prompt(), prompt);
        let max_steps = self.inner.max_steps();

        while state.step < max_steps {
            state.increment_step();
            info!(step = state.step, max_steps, "Starting step");

            self.inner.await_model(&mut state).await?;
            if self.inner.execute_tools(&mut state, &executor)? == StepOutcome::Finished {
                return Ok(state);
            }
        }

        Err(AgentError::StepLimit(max_steps))
    }
}

#[async_trait]
impl RunStrategy for ReActAgent {
    fn name(&self) -> &'static str {
        "react"
    }

    async fn run(&self, prompt: &str, directory: &Path) -> Result<PathBuf, AgentError> {
        let state = self.analyze(prompt, directory).await?;
        self.inner.finish(&state, self.name())
    }
}
