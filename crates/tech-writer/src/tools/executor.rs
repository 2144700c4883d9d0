//! Tool dispatch

use llm_core::ToolCall;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use super::fs::{list_files, read_file};
use super::search::search_code;
use super::{ToolError, ToolInvocation, ToolKind};

/// Confirmation returned to the model after `final_answer`
pub const FINAL_ANSWER_ACK: &str = "Final answer recorded.";

/// Result of a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub kind: ToolKind,
    /// Text appended to memory as the tool-role response
    pub output: String,
    /// Set only by `final_answer`
    pub final_answer: Option<String>,
}

impl ToolOutcome {
    fn output(kind: ToolKind, output: String) -> Self {
        Self {
            kind,
            output,
            final_answer: None,
        }
    }
}

/// Executes tool calls against a single run directory
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    working_dir: PathBuf,
}

impl ToolExecutor {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// Resolve a tool-supplied path relative to the run directory
    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }

    /// Decode and execute a single tool call
    #[instrument(skip(self, call), fields(tool = %call.function.name, call_id = %call.id))]
    pub fn execute(&self, call: &ToolCall) -> Result<ToolOutcome, ToolError> {
        let invocation = match ToolInvocation::decode(&call.function.name, &call.function.arguments) {
            Ok(invocation) => invocation,
            Err(e) => {
                warn!(error = %e, "Rejected tool call");
                return Err(e);
            }
        };

        info!("Executing tool");
        let result = self.dispatch(invocation);
        match &result {
            Ok(outcome) => info!(output_len = outcome.output.len(), "Tool executed successfully"),
            Err(e) => warn!(error = %e, "Tool execution failed"),
        }
        result
    }

    fn dispatch(&self, invocation: ToolInvocation) -> Result<ToolOutcome, ToolError> {
        let kind = invocation.kind();
        match invocation {
            ToolInvocation::ListFiles(args) => {
                let root = match args.path.as_deref().filter(|p| !p.is_empty()) {
                    Some(p) => self.resolve(p),
                    None => self.working_dir.clone(),
                };
                let files: Vec<String> = list_files(&root)?
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect();
                Ok(ToolOutcome::output(kind, serde_json::to_string(&files)?))
            }
            ToolInvocation::ReadFile(args) => {
                let content = read_file(&self.resolve(&args.path))?;
                Ok(ToolOutcome::output(kind, content))
            }
            ToolInvocation::SearchCode(args) => {
                let matches = search_code(&self.working_dir, &args.query, args.file_pattern.as_deref())?;
                Ok(ToolOutcome::output(kind, serde_json::to_string(&matches)?))
            }
            ToolInvocation::FinalAnswer(args) => Ok(ToolOutcome {
                kind,
                output: FINAL_ANSWER_ACK.to_string(),
                final_answer: Some(args.answer),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::TempDir;

    fn call(name: &str, args: Value) -> ToolCall {
        ToolCall::new("call_1", name, args.to_string())
    }

    #[test]
    fn test_read_file_relative_to_working_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.txt"), "hello").unwrap();

        let executor = ToolExecutor::new(temp.path());
        let outcome = executor.execute(&call("read_file", json!({"path": "main.txt"}))).unwrap();
        assert_eq!(outcome.kind, ToolKind::ReadFile);
        assert_eq!(outcome.output, "hello");
        assert!(outcome.final_answer.is_none());
    }

    #[test]
    fn test_list_files_defaults_to_working_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::create_dir_all(temp.path().join(".hidden")).unwrap();
        fs::write(temp.path().join(".hidden/b.txt"), "b").unwrap();

        let executor = ToolExecutor::new(temp.path());
        let outcome = executor.execute(&call("list_files", json!({}))).unwrap();

        let files: Vec<String> = serde_json::from_str(&outcome.output).unwrap();
        let root = fs::canonicalize(temp.path()).unwrap();
        assert_eq!(files, vec![root.join("a.txt").display().to_string()]);
    }

    #[test]
    fn test_list_files_empty_directory() {
        let temp = TempDir::new().unwrap();
        let executor = ToolExecutor::new(temp.path());
        let outcome = executor.execute(&call("list_files", json!({"path": ""}))).unwrap();
        assert_eq!(outcome.output, "[]");
    }

    #[test]
    fn test_search_code_output_shape() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "a\nb\nfoo\n").unwrap();
        fs::write(temp.path().join("notes.txt"), "foo\n").unwrap();

        let executor = ToolExecutor::new(temp.path());
        let outcome = executor
            .execute(&call("search_code", json!({"query": "foo", "file_pattern": "*.md"})))
            .unwrap();

        let matches: Vec<Value> = serde_json::from_str(&outcome.output).unwrap();
        assert_eq!(matches.len(), 1);
        assert!(matches[0]["file"].as_str().unwrap().ends_with("README.md"));
        assert_eq!(matches[0]["line"], 3);
        assert_eq!(matches[0]["content"], "foo");
    }

    #[test]
    fn test_final_answer_records_answer() {
        let executor = ToolExecutor::new(".");
        let outcome = executor
            .execute(&call("final_answer", json!({"answer": "# Docs\nhello"})))
            .unwrap();
        assert_eq!(outcome.output, FINAL_ANSWER_ACK);
        assert_eq!(outcome.final_answer.as_deref(), Some("# Docs\nhello"));
    }

    #[test]
    fn test_unknown_tool_is_error() {
        let executor = ToolExecutor::new(".");
        let err = executor.execute(&call("run_shell", json!({"cmd": "ls"}))).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref name) if name == "run_shell"));
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let executor = ToolExecutor::new(temp.path());
        let err = executor.execute(&call("read_file", json!({"path": "missing.txt"}))).unwrap_err();
        assert!(matches!(err, ToolError::Io { .. }));
    }

    #[test]
    fn test_malformed_arguments_is_error() {
        let executor = ToolExecutor::new(".");
        let err = executor
            .execute(&ToolCall::new("call_1", "read_file", "{not json"))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { tool: "read_file", .. }));
    }
}
