// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

//! The review loop: the surface picks files and shows results, the
//! session runs the pipeline and keeps the one message under review.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::{CommitMessage, CompositeDiff};
use crate::error::{Error, Result};
use crate::services::aggregator::DiffAggregator;
use crate::services::generator::{FailureKind, MessageGenerator};
use crate::services::repository::RepositoryAdapter;
use crate::services::safety;

/// A non-blocking, user-visible notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// One file could not be diffed and was left out
    FileSkipped { path: PathBuf, reason: String },
    /// git or the repository is missing; nothing was generated
    RepositoryUnavailable { message: String },
    /// The completion request failed; the default message is shown instead
    GenerationFailed { kind: FailureKind, detail: String },
    /// The diff looks like it contains secrets
    SecretsFound { patterns: Vec<String> },
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::RepositoryUnavailable { .. } | Self::GenerationFailed { .. }
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileSkipped { path, reason } => {
                write!(f, "Skipped {}: {}", path.display(), reason)
            }
            Self::RepositoryUnavailable { message } => write!(f, "{message}"),
            Self::GenerationFailed { kind, .. } => f.write_str(kind.user_message()),
            Self::SecretsFound { patterns } => {
                write!(f, "Possible secrets in the diff: {}", patterns.join(", "))
            }
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Where the user picks files and reviews the draft
pub trait ReviewSurface: Notifier {
    fn selected_files(&self) -> Vec<PathBuf>;

    fn display(&self, message: &CommitMessage, diff: &CompositeDiff);
}

#[derive(Default)]
struct Draft {
    diff: Option<CompositeDiff>,
    message: Option<CommitMessage>,
}

/// Runs generation for one repository, one request at a time
pub struct ReviewSession {
    repo: Arc<dyn RepositoryAdapter>,
    surface: Arc<dyn ReviewSurface>,
    aggregator: DiffAggregator,
    generator: MessageGenerator,
    allow_secrets: bool,
    draft: Mutex<Draft>,
}

impl ReviewSession {
    pub fn new(
        repo: Arc<dyn RepositoryAdapter>,
        surface: Arc<dyn ReviewSurface>,
        aggregator: DiffAggregator,
        generator: MessageGenerator,
    ) -> Self {
        Self {
            repo,
            surface,
            aggregator,
            generator,
            allow_secrets: false,
            draft: Mutex::new(Draft::default()),
        }
    }

    pub fn allow_secrets(mut self, allow: bool) -> Self {
        self.allow_secrets = allow;
        self
    }

    /// Collect diffs for the surface's selection and draft a message
    pub async fn on_generate_requested(&self) -> Result<CommitMessage> {
        let mut draft = self.draft.lock().await;

        let paths = self.surface.selected_files();
        debug!(selected = paths.len(), "generate requested");

        let diff = self.aggregator.collect_diffs(&paths).await?;
        self.check_secrets(&diff)?;

        let message = self.generator.generate(&diff).await;
        self.surface.display(&message, &diff);

        draft.diff = Some(diff);
        draft.message = Some(message.clone());
        Ok(message)
    }

    /// Draft a new message for the last diff without collecting again
    pub async fn on_regenerate_requested(&self) -> Result<CommitMessage> {
        let mut draft = self.draft.lock().await;

        let Some(diff) = draft.diff.clone() else {
            drop(draft);
            debug!("regenerate requested before any diff, generating");
            return self.on_generate_requested().await;
        };

        let message = self.generator.generate(&diff).await;
        self.surface.display(&message, &diff);

        draft.message = Some(message.clone());
        Ok(message)
    }

    pub async fn on_apply_requested(&self, text: &str) -> Result<()> {
        let _draft = self.draft.lock().await;
        self.repo.set_commit_message(text).await
    }

    pub async fn on_edited_by_user(&self, text: &str) {
        let mut draft = self.draft.lock().await;
        draft.message = Some(CommitMessage::new(text));
    }

    pub async fn current_message(&self) -> Option<CommitMessage> {
        self.draft.lock().await.message.clone()
    }

    pub async fn current_diff(&self) -> Option<CompositeDiff> {
        self.draft.lock().await.diff.clone()
    }

    fn check_secrets(&self, diff: &CompositeDiff) -> Result<()> {
        let found = safety::scan_for_secrets(diff);
        if found.is_empty() {
            return Ok(());
        }

        for s in &found {
            debug!(pattern = %s.pattern_name, file = %s.file, line = s.line, "possible secret");
        }

        let mut patterns: Vec<String> = found.iter().map(|s| s.pattern_name.clone()).collect();
        patterns.sort();
        patterns.dedup();
        self.surface.notify(Notice::SecretsFound {
            patterns: patterns.clone(),
        });

        if self.allow_secrets {
            Ok(())
        } else {
            Err(Error::SecretsDetected { patterns })
        }
    }
}
