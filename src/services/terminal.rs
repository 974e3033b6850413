// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use console::style;
use dialoguer::MultiSelect;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::domain::{ChangedFile, CommitMessage, CompositeDiff, display_path};
use crate::error::{Error, Result};
use crate::services::review::{Notice, Notifier, ReviewSurface};

/// Review surface on stderr; stdout is left for the final message
#[derive(Default)]
pub struct TerminalSurface {
    selection: Mutex<Vec<PathBuf>>,
    progress: Mutex<Option<ProgressBar>>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_selection(&self, paths: Vec<PathBuf>) {
        *self.selection.lock().unwrap_or_else(|e| e.into_inner()) = paths;
    }

    /// Show a spinner until `end_progress`; output in between is printed above it
    pub fn begin_progress(&self, msg: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(spinner_style);
        }
        spinner.set_message(msg.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        *self.progress.lock().unwrap_or_else(|e| e.into_inner()) = Some(spinner);
    }

    pub fn end_progress(&self) {
        if let Some(spinner) = self.progress.lock().unwrap_or_else(|e| e.into_inner()).take() {
            spinner.finish_and_clear();
        }
    }

    fn print(&self, f: impl FnOnce()) {
        match self.progress.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
            Some(spinner) => spinner.suspend(f),
            None => f(),
        }
    }

    /// Let the user toggle which changed files go into the diff
    pub fn pick_files(changes: &[ChangedFile]) -> Result<Vec<PathBuf>> {
        let items: Vec<String> = changes.iter().map(|c| display_path(&c.path)).collect();
        let defaults: Vec<bool> = changes.iter().map(|c| c.selected_for_commit).collect();

        let picked = MultiSelect::new()
            .with_prompt("Files to describe (space to toggle, enter to confirm)")
            .items(&items)
            .defaults(&defaults)
            .interact()?;

        if picked.is_empty() {
            return Err(Error::NothingSelected);
        }

        Ok(picked.into_iter().map(|i| changes[i].path.clone()).collect())
    }

    pub fn print_diff(diff: &CompositeDiff) {
        for line in diff.render().lines() {
            let styled = if line.starts_with("--- ") && line.ends_with(" ---") {
                style(line).cyan().bold()
            } else if line.starts_with('+') && !line.starts_with("+++") {
                style(line).green()
            } else if line.starts_with('-') && !line.starts_with("---") {
                style(line).red()
            } else {
                style(line)
            };
            eprintln!("{styled}");
        }
    }

    pub fn print_info(msg: &str) {
        eprintln!("{} {}", style("info:").cyan(), msg);
    }

    pub fn print_success(msg: &str) {
        eprintln!("{} {}", style("✓").green().bold(), msg);
    }
}

impl Notifier for TerminalSurface {
    fn notify(&self, notice: Notice) {
        match &notice {
            Notice::GenerationFailed { kind, detail } => {
                debug!(%kind, %detail, "generation failed");
            }
            other => debug!(notice = %other, "notice"),
        }

        self.print(|| {
            if notice.is_error() {
                eprintln!("{} {}", style("error:").red().bold(), notice);
            } else {
                eprintln!("{} {}", style("warning:").yellow().bold(), notice);
            }
        });
    }
}

impl ReviewSurface for TerminalSurface {
    fn selected_files(&self) -> Vec<PathBuf> {
        self.selection
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn display(&self, message: &CommitMessage, diff: &CompositeDiff) {
        self.end_progress();

        eprintln!();
        eprintln!(
            "{} {} {} in diff",
            style("→").cyan(),
            diff.len(),
            if diff.len() == 1 { "file" } else { "files" }
        );
        for file in diff.files() {
            let (additions, deletions) = file.line_stats();
            let status = if file.is_new_file() { "[+]" } else { "[M]" };
            eprintln!(
                "    {} {} (+{} -{})",
                status,
                display_path(&file.path),
                additions,
                deletions
            );
        }

        eprintln!();
        eprintln!("{}", style("Generated commit message:").bold());
        eprintln!("{}", style(&message.text).green());
        eprintln!();
    }
}
