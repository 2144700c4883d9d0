//! Codebase inspection tools exposed to the model
//!
//! The tool set is closed: four tools, each with a typed argument struct that
//! is decoded from the model's raw JSON in a single step at dispatch time.

pub mod executor;
pub mod fs;
pub mod search;

pub use executor::ToolExecutor;

use llm_core::ToolDefinition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while dispatching a tool call
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid file pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to load .gitignore: {0}")]
    Ignore(#[from] ignore::Error),

    #[error("failed to serialize tool result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The fixed set of tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    ListFiles,
    ReadFile,
    SearchCode,
    FinalAnswer,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::ListFiles,
        ToolKind::ReadFile,
        ToolKind::SearchCode,
        ToolKind::FinalAnswer,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::ListFiles => "list_files",
            ToolKind::ReadFile => "read_file",
            ToolKind::SearchCode => "search_code",
            ToolKind::FinalAnswer => "final_answer",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::ListFiles => "Lists files in the codebase, respecting .gitignore patterns",
            ToolKind::ReadFile => "Reads the content of a file",
            ToolKind::SearchCode => "Searches for patterns in the codebase",
            ToolKind::FinalAnswer => "Submits your final documentation",
        }
    }

    pub fn parameters_schema(&self) -> ParameterSchema {
        match self {
            ToolKind::ListFiles => ParameterSchema::new().with_property(
                "path",
                ParameterProperty::string("The directory path to list files from"),
            ),
            ToolKind::ReadFile => ParameterSchema::new().with_required(
                "path",
                ParameterProperty::string("The path to the file to read"),
            ),
            ToolKind::SearchCode => ParameterSchema::new()
                .with_required("query", ParameterProperty::string("The pattern to search for"))
                .with_property(
                    "file_pattern",
                    ParameterProperty::string("A pattern to filter files (e.g., \"*.rs\")"),
                ),
            ToolKind::FinalAnswer => ParameterSchema::new().with_required(
                "answer",
                ParameterProperty::string("Your final documentation in markdown format"),
            ),
        }
    }

    /// Convert to a tool definition for the LLM
    pub fn to_definition(&self) -> ToolDefinition {
        let parameters = serde_json::to_value(self.parameters_schema()).unwrap_or_default();
        ToolDefinition::function(self.name(), self.description(), parameters)
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Tool definitions sent with every model call
pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolKind::ALL.iter().map(ToolKind::to_definition).collect()
}

/// Schema for a tool parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterProperty {
    /// Parameter type (string, number, boolean, array, object)
    #[serde(rename = "type")]
    pub param_type: String,
    pub description: String,
}

impl ParameterProperty {
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            param_type: "string".to_string(),
            description: description.into(),
        }
    }
}

/// Schema describing tool parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Type is always "object"
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: BTreeMap<String, ParameterProperty>,
    /// Required parameter names
    #[serde(default)]
    pub required: Vec<String>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, prop: ParameterProperty) -> Self {
        self.properties.insert(name.into(), prop);
        self
    }

    pub fn with_required(mut self, name: impl Into<String>, prop: ParameterProperty) -> Self {
        let name = name.into();
        self.properties.insert(name.clone(), prop);
        self.required.push(name);
        self
    }
}

impl Default for ParameterSchema {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListFilesArgs {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReadFileArgs {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchCodeArgs {
    pub query: String,
    #[serde(default)]
    pub file_pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FinalAnswerArgs {
    pub answer: String,
}

/// A decoded tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocation {
    ListFiles(ListFilesArgs),
    ReadFile(ReadFileArgs),
    SearchCode(SearchCodeArgs),
    FinalAnswer(FinalAnswerArgs),
}

impl ToolInvocation {
    /// Decode a tool name and its raw JSON arguments
    ///
    /// Unknown fields are ignored and an empty argument string is treated as
    /// an empty object.
    pub fn decode(name: &str, arguments: &str) -> Result<Self, ToolError> {
        let kind = ToolKind::from_name(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let raw = if arguments.trim().is_empty() { "{}" } else { arguments };
        let invalid = |source| ToolError::InvalidArguments {
            tool: kind.name(),
            source,
        };

        Ok(match kind {
            ToolKind::ListFiles => Self::ListFiles(serde_json::from_str(raw).map_err(invalid)?),
            ToolKind::ReadFile => Self::ReadFile(serde_json::from_str(raw).map_err(invalid)?),
            ToolKind::SearchCode => Self::SearchCode(serde_json::from_str(raw).map_err(invalid)?),
            ToolKind::FinalAnswer => Self::FinalAnswer(serde_json::from_str(raw).map_err(invalid)?),
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::ListFiles(_) => ToolKind::ListFiles,
            Self::ReadFile(_) => ToolKind::ReadFile,
            Self::SearchCode(_) => ToolKind::SearchCode,
            Self::FinalAnswer(_) => ToolKind::FinalAnswer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_list_files_without_path() {
        let call = ToolInvocation::decode("list_files", "{}").unwrap();
        assert_eq!(call, ToolInvocation::ListFiles(ListFilesArgs { path: None }));

        let call = ToolInvocation::decode("list_files", "").unwrap();
        assert_eq!(call.kind(), ToolKind::ListFiles);
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let call = ToolInvocation::decode("read_file", r#"{"path": "src/main.rs", "encoding": "utf-8"}"#).unwrap();
        assert_eq!(
            call,
            ToolInvocation::ReadFile(ReadFileArgs {
                path: "src/main.rs".to_string()
            })
        );
    }

    #[test]
    fn test_decode_search_code_optional_pattern() {
        let call = ToolInvocation::decode("search_code", r#"{"query": "fn main"}"#).unwrap();
        match call {
            ToolInvocation::SearchCode(args) => {
                assert_eq!(args.query, "fn main");
                assert!(args.file_pattern.is_none());
            }
            other => panic!("unexpected invocation: {:?}", other),
        }
    }

    #[test]
    fn test_decode_missing_required_field() {
        let err = ToolInvocation::decode("final_answer", "{}").unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { tool: "final_answer", .. }));
    }

    #[test]
    fn test_decode_unknown_tool() {
        let err = ToolInvocation::decode("delete_everything", "{}").unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref name) if name == "delete_everything"));
        assert!(err.to_string().contains("delete_everything"));
    }

    #[test]
    fn test_tool_definitions_schema() {
        let defs = tool_definitions();
        let names: Vec<_> = defs.iter().map(|d| d.function.name.as_str()).collect();
        assert_eq!(names, vec!["list_files", "read_file", "search_code", "final_answer"]);

        let search = &defs[2].function.parameters;
        assert_eq!(search["type"], "object");
        assert_eq!(search["required"], serde_json::json!(["query"]));
        assert_eq!(search["properties"]["file_pattern"]["type"], "string");

        let list = &defs[0].function.parameters;
        assert_eq!(list["required"], serde_json::json!([]));
    }
}
