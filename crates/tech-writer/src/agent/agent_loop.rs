//! Shared agent loop building blocks
//!
//! Both strategies drive the same cycle: seed memory, call the model, run the
//! requested tools in order, and persist the final answer. They differ only in
//! what happens between steps.

use std::path::PathBuf;
use std::sync::Arc;

use llm_core::{ChatMessage, ToolDefinition};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::output::{ResultSink, SinkError};
use crate::progress::Spinner;
use crate::tools::{tool_definitions, ToolError, ToolExecutor};

use super::client::ModelClient;
use super::memory::ConversationMemory;
use super::state::{AgentConfig, AgentState};

/// Errors that terminate a run
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("error calling model in step {step}")]
    ModelCall {
        step: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("error executing tool {tool} in step {step}: {source}")]
    Tool {
        step: usize,
        tool: String,
        #[source]
        source: ToolError,
    },

    #[error("no final answer after maximum steps ({0})")]
    StepLimit(usize),

    #[error("error saving final answer: {0}")]
    Persist(#[from] SinkError),
}

/// What the tool phase of a step produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The assistant turn requested no tools
    NoToolCalls,
    /// Tools ran, no final answer yet
    Continue,
    /// A `final_answer` call recorded the terminal answer
    Finished,
}

/// The agent loop orchestrator
pub struct AgentLoop {
    client: Arc<dyn ModelClient>,
    config: AgentConfig,
    sink: ResultSink,
    tools: Vec<ToolDefinition>,
}

impl AgentLoop {
    pub fn new(client: Arc<dyn ModelClient>, config: AgentConfig) -> Self {
        let sink = ResultSink::new(config.output_dir.clone());
        Self {
            client,
            config,
            sink,
            tools: tool_definitions(),
        }
    }

    pub fn max_steps(&self) -> usize {
        self.config.max_steps
    }

    /// Fresh state holding exactly the system prompt and the task
    pub fn start(&self, system_prompt: String, task: &str) -> AgentState {
        AgentState::new(ConversationMemory::seeded(system_prompt, task))
    }

    /// Call the model with the full memory and append its reply
    pub async fn await_model(&self, state: &mut AgentState) -> Result<(), AgentError> {
        debug!(step = state.step, messages = state.memory.len(), "Calling model");

        let mut spinner = if self.config.verbose {
            Spinner::start_if_terminal(format!("Step {}: waiting for {}...", state.step, self.config.model))
        } else {
            None
        };

        let result = self.client.complete(state.memory.messages(), &self.tools).await;

        if let Some(ref mut s) = spinner {
            s.stop().await;
        }

        let reply = result.map_err(|source| {
            let message = format!("{:#}", source);
            warn!(step = state.step, error = %message, "Model call failed");
            AgentError::ModelCall {
                step: state.step,
                source,
            }
        })?;

        state.memory.append(normalize_reply(reply));
        Ok(())
    }

    /// Execute the tool calls of the last assistant turn, in issue order
    ///
    /// Each result is appended immediately so later calls in the batch see
    /// earlier ones. Stops at the first call that records a final answer.
    pub fn execute_tools(
        &self,
        state: &mut AgentState,
        executor: &ToolExecutor,
    ) -> Result<StepOutcome, AgentError> {
        let tool_calls = match state.memory.last_message() {
            Some(msg) if msg.has_tool_calls() => msg.tool_calls.clone(),
            _ => {
                info!(step = state.step, "No tool calls received");
                return Ok(StepOutcome::NoToolCalls);
            }
        };

        debug!(tool_count = tool_calls.len(), "Processing tool calls");
        for call in &tool_calls {
            let outcome = executor.execute(call).map_err(|source| AgentError::Tool {
                step: state.step,
                tool: call.function.name.clone(),
                source,
            })?;
            debug!(tool = %outcome.kind, bytes = outcome.output.len(), "Recording tool result");

            state.memory.append(ChatMessage::tool_result(
                call.id.clone(),
                call.function.name.clone(),
                outcome.output,
            ));

            if let Some(answer) = outcome.final_answer {
                if state.record_final_answer(answer) {
                    info!(step = state.step, "Final answer received");
                    return Ok(StepOutcome::Finished);
                }
                warn!(step = state.step, "Ignoring empty final answer");
            }
        }

        Ok(StepOutcome::Continue)
    }

    /// Persist the final answer of a finished run
    pub fn finish(&self, state: &AgentState, strategy: &str) -> Result<PathBuf, AgentError> {
        let answer = state.final_answer().unwrap_or_default();
        let path = self.sink.save(answer, strategy, &self.config.model)?;
        info!(path = %path.display(), steps = state.step, "Analysis complete");
        Ok(path)
    }
}

/// Assistant replies are always recorded under the assistant role
fn normalize_reply(mut reply: ChatMessage) -> ChatMessage {
    reply.role = llm_core::Role::Assistant;
    reply.tool_call_id = None;
    reply.name = None;
    reply
}

impl std::fmt::Debug for AgentLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentLoop")
            .field("config", &self.config)
            .field("sink", &self.sink)
            .finish()
    }
}
