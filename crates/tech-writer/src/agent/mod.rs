//! Agent framework for autonomous codebase analysis
//!
//! Implements an observe-think-act loop over a fixed set of read-only tools,
//! with two strategies: plain ReAct and ReAct with reflection.

mod agent_loop;
pub mod client;
mod memory;
mod prompts;
mod react;
mod reflexion;
mod state;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use clap::ValueEnum;

pub use agent_loop::AgentError;
pub use client::{ChatModel, ModelClient};
pub use state::AgentConfig;

use react::ReActAgent;
use reflexion::ReflexionAgent;

/// A complete analysis run
#[async_trait]
pub trait RunStrategy: Send + Sync {
    /// Name used in output file names
    fn name(&self) -> &'static str;

    /// Analyze `directory` for `prompt` and return the path of the saved answer
    async fn run(&self, prompt: &str, directory: &Path) -> Result<PathBuf, AgentError>;
}

/// Selectable agent strategy
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    #[default]
    React,
    Reflexion,
}

impl Strategy {
    pub fn build(self, client: Arc<dyn ModelClient>, config: AgentConfig) -> Box<dyn RunStrategy> {
        match self {
            Strategy::React => Box::new(ReActAgent::new(client, config)),
            Strategy::Reflexion => Box::new(ReflexionAgent::new(client, config)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::client::testing::ScriptedClient;

    #[test]
    fn test_strategy_names() {
        let client: Arc<dyn ModelClient> = Arc::new(ScriptedClient::default());
        assert_eq!(Strategy::React.build(client.clone(), AgentConfig::default()).name(), "react");
        assert_eq!(Strategy::Reflexion.build(client, AgentConfig::default()).name(), "reflexion");
    }

    #[test]
    fn test_strategy_parses_from_cli_value() {
        assert_eq!(Strategy::from_str("react", false).unwrap(), Strategy::React);
        assert_eq!(Strategy::from_str("reflexion", false).unwrap(), Strategy::Reflexion);
        assert!(Strategy::from_str("chain", false).is_err());
    }
}
