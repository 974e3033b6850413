// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use commitmoji::domain::{ChangedFile, CommitMessage, CompositeDiff};
use commitmoji::error::{Error, Result};
use commitmoji::services::llm::LlmProvider;
use commitmoji::services::repository::RepositoryAdapter;
use commitmoji::services::review::{Notice, Notifier, ReviewSurface};

// ─── Repository fake ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum FakeFile {
    /// Known to git, diff succeeds
    Tracked(String),
    /// Unknown to git, content readable
    Untracked(String),
    /// Unknown to git, reading the working copy fails
    UnreadableUntracked,
    /// Diff fails with a git error
    Broken(String),
    /// Listed but deleted from the working tree
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FakeEnv {
    #[default]
    Ready,
    NoGit,
    NoRepo,
}

#[derive(Default)]
pub struct FakeRepo {
    files: HashMap<PathBuf, FakeFile>,
    order: Vec<PathBuf>,
    delays: HashMap<PathBuf, Duration>,
    env: FakeEnv,
    pub diff_calls: AtomicUsize,
    pub ready_calls: AtomicUsize,
    pub applied: Mutex<Vec<String>>,
}

impl FakeRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, file: FakeFile) -> Self {
        self.order.push(PathBuf::from(path));
        self.files.insert(PathBuf::from(path), file);
        self
    }

    /// Make the diff for `path` finish after `ms` milliseconds
    pub fn with_delay(mut self, path: &str, ms: u64) -> Self {
        self.delays
            .insert(PathBuf::from(path), Duration::from_millis(ms));
        self
    }

    pub fn with_env(mut self, env: FakeEnv) -> Self {
        self.env = env;
        self
    }

    pub fn diff_calls(&self) -> usize {
        self.diff_calls.load(Ordering::SeqCst)
    }

    pub fn applied(&self) -> Vec<String> {
        self.applied.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositoryAdapter for FakeRepo {
    async fn check_ready(&self) -> Result<()> {
        self.ready_calls.fetch_add(1, Ordering::SeqCst);
        match self.env {
            FakeEnv::Ready => Ok(()),
            FakeEnv::NoGit => Err(Error::GitUnavailable),
            FakeEnv::NoRepo => Err(Error::NotAGitRepo),
        }
    }

    async fn list_changes(&self) -> Result<Vec<ChangedFile>> {
        Ok(self.order.iter().cloned().map(ChangedFile::new).collect())
    }

    async fn file_exists(&self, path: &Path) -> bool {
        !matches!(self.files.get(path), None | Some(FakeFile::Deleted))
    }

    async fn diff_head(&self, path: &Path) -> Result<String> {
        self.diff_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        match self.files.get(path) {
            Some(FakeFile::Tracked(diff)) => Ok(diff.clone()),
            Some(FakeFile::Untracked(_)) | Some(FakeFile::UnreadableUntracked) => {
                Err(Error::NotTracked {
                    path: path.to_path_buf(),
                })
            }
            Some(FakeFile::Broken(msg)) => Err(Error::Git(msg.clone())),
            Some(FakeFile::Deleted) | None => Err(Error::Git("no such path".into())),
        }
    }

    async fn read_working_copy(&self, path: &Path) -> Result<String> {
        match self.files.get(path) {
            Some(FakeFile::Untracked(content)) => Ok(content.clone()),
            _ => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "stream did not contain valid UTF-8",
            ))),
        }
    }

    async fn set_commit_message(&self, text: &str) -> Result<()> {
        self.applied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

// ─── Completion service fake ─────────────────────────────────────────────────

/// Replies are consumed in order; once exhausted, returns an empty completion
#[derive(Clone, Default)]
pub struct FakeProvider {
    replies: Arc<Mutex<VecDeque<Result<String>>>>,
    prompts: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, err: Error) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    /// (system, user) pairs received so far
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn boxed(&self) -> Box<dyn LlmProvider> {
        Box::new(self.clone())
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

// ─── Notifier / surface fakes ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[derive(Default)]
pub struct RecordingSurface {
    selection: Mutex<Vec<PathBuf>>,
    notices: Mutex<Vec<Notice>>,
    displayed: Mutex<Vec<(CommitMessage, CompositeDiff)>>,
}

impl RecordingSurface {
    pub fn selecting(paths: &[&str]) -> Arc<Self> {
        let surface = Self::default();
        *surface.selection.lock().unwrap() = paths.iter().map(PathBuf::from).collect();
        Arc::new(surface)
    }

    pub fn select(&self, paths: &[&str]) {
        *self.selection.lock().unwrap() = paths.iter().map(PathBuf::from).collect();
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn displayed(&self) -> Vec<(CommitMessage, CompositeDiff)> {
        self.displayed.lock().unwrap().clone()
    }
}

impl Notifier for RecordingSurface {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

impl ReviewSurface for RecordingSurface {
    fn selected_files(&self) -> Vec<PathBuf> {
        self.selection.lock().unwrap().clone()
    }

    fn display(&self, message: &CommitMessage, diff: &CompositeDiff) {
        self.displayed
            .lock()
            .unwrap()
            .push((message.clone(), diff.clone()));
    }
}

pub fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}
