// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;
use std::path::{Path, PathBuf};

/// Line written before the full content of a file git doesn't know yet
pub const NEW_FILE_MARKER: &str = "new file\n";

/// A working-tree change offered for selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub path: PathBuf,
    pub selected_for_commit: bool,
}

impl ChangedFile {
    /// Newly discovered files start out selected
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            selected_for_commit: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub diff_text: String,
}

impl FileDiff {
    pub fn new(path: impl Into<PathBuf>, diff_text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            diff_text: diff_text.into(),
        }
    }

    /// Synthesize a diff for an untracked file from its working-copy content
    pub fn new_file(path: impl Into<PathBuf>, content: &str) -> Self {
        Self {
            path: path.into(),
            diff_text: format!("{NEW_FILE_MARKER}{content}"),
        }
    }

    pub fn is_new_file(&self) -> bool {
        self.diff_text.starts_with(NEW_FILE_MARKER)
    }

    /// Count added and removed lines; every line of a new file counts as added
    pub fn line_stats(&self) -> (usize, usize) {
        if let Some(content) = self.diff_text.strip_prefix(NEW_FILE_MARKER) {
            return (content.lines().count(), 0);
        }

        let mut additions = 0;
        let mut deletions = 0;
        for line in self.diff_text.lines() {
            if line.starts_with('+') && !line.starts_with("+++") {
                additions += 1;
            } else if line.starts_with('-') && !line.starts_with("---") {
                deletions += 1;
            }
        }
        (additions, deletions)
    }
}

/// Ordered per-file diffs, rendered as one document for the prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeDiff {
    files: Vec<FileDiff>,
}

impl CompositeDiff {
    pub fn new(files: Vec<FileDiff>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[FileDiff] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path.as_path())
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CompositeDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for file in &self.files {
            write!(
                f,
                "--- {} ---\n{}\n",
                display_path(&file.path),
                file.diff_text
            )?;
        }
        Ok(())
    }
}

/// Repository-relative path with forward slashes on every platform
pub fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
