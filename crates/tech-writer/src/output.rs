//! Persistence of final answers

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("no final answer to save")]
    EmptyAnswer,

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes final answers to timestamped markdown files
#[derive(Debug, Clone)]
pub struct ResultSink {
    output_dir: PathBuf,
}

impl ResultSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Save `answer` and return the file path
    pub fn save(&self, answer: &str, strategy: &str, model: &str) -> Result<PathBuf, SinkError> {
        self.save_at(answer, strategy, model, Local::now())
    }

    fn save_at(
        &self,
        answer: &str,
        strategy: &str,
        model: &str,
        now: DateTime<Local>,
    ) -> Result<PathBuf, SinkError> {
        if answer.is_empty() {
            return Err(SinkError::EmptyAnswer);
        }

        let path = self.output_dir.join(file_name(strategy, model, now));
        if !self.output_dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.output_dir).map_err(io_error(&self.output_dir))?;
        }
        fs::write(&path, answer).map_err(io_error(&path))?;

        info!(path = %path.display(), bytes = answer.len(), "Saved final answer");
        Ok(path)
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SinkError + '_ {
    move |source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn file_name(strategy: &str, model: &str, now: DateTime<Local>) -> String {
    let model: String = model
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '-' } else { c })
        .collect();
    format!("{}-{}-{}.md", now.format("%Y-%m-%dT%H%M"), strategy, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 15, 14, 7, 42).unwrap()
    }

    #[test]
    fn test_file_name_format() {
        assert_eq!(
            file_name("react", "gpt-4o-mini", fixed_time()),
            "2025-06-15T1407-react-gpt-4o-mini.md"
        );
    }

    #[test]
    fn test_file_name_sanitizes_model() {
        assert_eq!(
            file_name("reflexion", "ollama/qwen2.5:7b", fixed_time()),
            "2025-06-15T1407-reflexion-ollama-qwen2.5-7b.md"
        );
    }

    #[test]
    fn test_save_writes_exact_content() {
        let temp = TempDir::new().unwrap();
        let sink = ResultSink::new(temp.path().join("output"));

        let path = sink.save_at("# Docs\nhello", "react", "gpt-4o-mini", fixed_time()).unwrap();
        assert_eq!(path, temp.path().join("output/2025-06-15T1407-react-gpt-4o-mini.md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Docs\nhello");
    }

    #[test]
    fn test_save_refuses_empty_answer() {
        let temp = TempDir::new().unwrap();
        let sink = ResultSink::new(temp.path());

        let err = sink.save("", "react", "gpt-4o-mini").unwrap_err();
        assert!(matches!(err, SinkError::EmptyAnswer));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_save_creates_nested_output_dir() {
        let temp = TempDir::new().unwrap();
        let sink = ResultSink::new(temp.path().join("docs/generated"));

        let path = sink.save_at("# Docs", "reflexion", "m", fixed_time()).unwrap();
        assert!(path.starts_with(temp.path().join("docs/generated")));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Docs");
    }

    #[test]
    fn test_save_reports_unwritable_dir() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();
        let sink = ResultSink::new(&blocker);

        let err = sink.save_at("# Docs", "react", "m", fixed_time()).unwrap_err();
        match err {
            SinkError::Io { path, .. } => assert_eq!(path, blocker),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_same_minute_overwrites() {
        let temp = TempDir::new().unwrap();
        let sink = ResultSink::new(temp.path());

        let first = sink.save_at("one", "react", "m", fixed_time()).unwrap();
        let second = sink.save_at("two", "react", "m", fixed_time()).unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&second).unwrap(), "two");
    }
}
