//! Code search across the files returned by `list_files`

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

use super::fs::{is_binary_file, list_files, read_file};
use super::ToolError;

/// A single matching line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMatch {
    pub file: String,
    /// 1-based line number
    pub line: usize,
    pub content: String,
}

enum Matcher<'a> {
    Regex(Regex),
    Literal(&'a str),
}

impl Matcher<'_> {
    fn is_match(&self, line: &str) -> bool {
        match self {
            Matcher::Regex(re) => re.is_match(line),
            Matcher::Literal(needle) => line.contains(needle),
        }
    }
}

/// Search every file under `root` for `query`
///
/// The query is used as a regular expression when it compiles and as a literal
/// substring otherwise. `file_pattern` is a glob matched against base names.
/// Binary files are skipped.
#[instrument(skip(root), fields(dir = %root.display()))]
pub fn search_code(
    root: &Path,
    query: &str,
    file_pattern: Option<&str>,
) -> Result<Vec<CodeMatch>, ToolError> {
    let glob_pattern = file_pattern
        .filter(|p| !p.is_empty())
        .map(|p| {
            glob::Pattern::new(p).map_err(|source| ToolError::InvalidGlob {
                pattern: p.to_string(),
                source,
            })
        })
        .transpose()?;

    let matcher = match Regex::new(query) {
        Ok(re) => Matcher::Regex(re),
        Err(e) => {
            debug!(error = %e, "Query is not a valid regex, using substring match");
            Matcher::Literal(query)
        }
    };

    let mut matches = Vec::new();
    for file in list_files(root)? {
        if let Some(ref glob) = glob_pattern {
            let name = file.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            if !glob.matches(&name) {
                continue;
            }
        }

        if is_binary_file(&file) {
            debug!(file = %file.display(), "Skipping binary file");
            continue;
        }

        let content = match read_file(&file) {
            Ok(c) => c,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable file");
                continue;
            }
        };

        for (i, line) in content.lines().enumerate() {
            if matcher.is_match(line) {
                matches.push(CodeMatch {
                    file: file.display().to_string(),
                    line: i + 1,
                    content: line.to_string(),
                });
            }
        }
    }

    debug!(matches = matches.len(), "Search complete");
    Ok(matches)
}
