//! Model client seam used by the agent loop

use anyhow::Result;
use async_trait::async_trait;
use llm_core::{ChatMessage, OpenAiClient, ToolDefinition};

/// Produces one assistant turn for the given conversation
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], tools: &[ToolDefinition]) -> Result<ChatMessage>;
}

/// A chat completions client bound to a single model
#[derive(Debug, Clone)]
pub struct ChatModel {
    client: OpenAiClient,
    model: String,
}

impl ChatModel {
    pub fn new(client: OpenAiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl ModelClient for ChatModel {
    async fn complete(&self, messages: &[ChatMessage], tools: &[ToolDefinition]) -> Result<ChatMessage> {
        self.client.chat_with_tools(&self.model, messages, tools).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use anyhow::anyhow;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned assistant turns and records every request
    #[derive(Default)]
    pub struct ScriptedClient {
        turns: Mutex<VecDeque<Result<ChatMessage, String>>>,
        requests: Mutex<Vec<Vec<ChatMessage>>>,
        repeat_last: Option<ChatMessage>,
    }

    impl ScriptedClient {
        pub fn new(turns: Vec<ChatMessage>) -> Self {
            Self {
                turns: Mutex::new(turns.into_iter().map(Ok).collect()),
                ..Default::default()
            }
        }

        /// Answer every call with the same turn
        pub fn repeating(turn: ChatMessage) -> Self {
            Self {
                repeat_last: Some(turn),
                ..Default::default()
            }
        }

        pub fn failing(message: &str) -> Self {
            let client = Self::default();
            client.turns.lock().unwrap().push_back(Err(message.to_string()));
            client
        }

        pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
            self.requests.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedClient {
        async fn complete(&self, messages: &[ChatMessage], tools: &[ToolDefinition]) -> Result<ChatMessage> {
            assert_eq!(tools.len(), 4, "tool schema must be sent with every call");
            self.requests.lock().unwrap().push(messages.to_vec());

            match self.turns.lock().unwrap().pop_front() {
                Some(Ok(turn)) => Ok(turn),
                Some(Err(message)) => Err(anyhow!(message)),
                None => self
                    .repeat_last
                    .clone()
                    .ok_or_else(|| anyhow!("script exhausted")),
            }
        }
    }
}
