//! llm-core: shared library for the tech-writer agent
//!
//! Provides:
//! - Configuration loading (tech-writer.toml)
//! - OpenAI-compatible chat completions client and its wire types

pub mod config;
pub mod openai;

pub use config::Config;
pub use openai::{
    ChatMessage, FunctionCall, FunctionDefinition, OpenAiClient, Role, ToolCall, ToolDefinition,
};
