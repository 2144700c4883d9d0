//! Filesystem access for the inspection tools

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use super::ToolError;

const BINARY_EXTENSIONS: &[&str] = &[
    "exe", "dll", "so", "dylib", "bin", "obj", "o", "a", "lib", "png", "jpg", "jpeg", "gif", "bmp",
    "ico", "tif", "tiff", "webp", "mp3", "mp4", "avi", "mov", "wmv", "flv", "zip", "tar", "gz", "7z",
    "rar", "jar", "war", "class", "pyc", "pyd", "pyo",
];

const BINARY_SNIFF_LEN: u64 = 512;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ToolError + '_ {
    move |source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Load the root `.gitignore`, or an empty matcher when there is none
fn load_gitignore(root: &Path) -> Result<Gitignore, ToolError> {
    let gitignore_path = root.join(".gitignore");
    if !gitignore_path.is_file() {
        return Ok(Gitignore::empty());
    }

    let mut builder = GitignoreBuilder::new(root);
    if let Some(e) = builder.add(&gitignore_path) {
        return Err(e.into());
    }
    let gitignore = builder.build()?;
    info!(patterns = gitignore.num_ignores(), "Added patterns from .gitignore");
    Ok(gitignore)
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

/// List every file under `root`, honoring its `.gitignore`
///
/// Hidden directories below the root and symlinks are skipped. Returned paths
/// are absolute and stay inside the canonical root.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>, ToolError> {
    let root = fs::canonicalize(root).map_err(io_error(root))?;
    let gitignore = load_gitignore(&root)?;

    let walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            if entry.path_is_symlink() {
                debug!(path = %entry.path().display(), "Skipping symlink");
                return false;
            }
            if is_hidden_dir(entry) {
                return false;
            }
            !gitignore
                .matched(entry.path(), entry.file_type().is_dir())
                .is_ignore()
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_file() && entry.path().starts_with(&root) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Read a file as text, replacing invalid UTF-8 sequences
pub fn read_file(path: &Path) -> Result<String, ToolError> {
    let bytes = fs::read(path).map_err(io_error(path))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Whether a file looks binary and should stay out of text search
///
/// Checks a list of known binary extensions first, then looks for a NUL byte
/// in the first 512 bytes. Files that cannot be opened are not binary.
pub fn is_binary_file(path: &Path) -> bool {
    let known_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| BINARY_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if known_ext {
        return true;
    }

    let mut head = Vec::with_capacity(BINARY_SNIFF_LEN as usize);
    match fs::File::open(path).and_then(|f| f.take(BINARY_SNIFF_LEN).read_to_end(&mut head)) {
        Ok(_) => head.contains(&0),
        Err(_) => false,
    }
}
