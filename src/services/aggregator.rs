// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::{CompositeDiff, FileDiff};
use crate::error::{Error, Result};
use crate::services::repository::RepositoryAdapter;
use crate::services::review::{Notice, Notifier};

/// Builds one composite diff out of the selected files
pub struct DiffAggregator {
    repo: Arc<dyn RepositoryAdapter>,
    notifier: Arc<dyn Notifier>,
}

impl DiffAggregator {
    pub fn new(repo: Arc<dyn RepositoryAdapter>, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, notifier }
    }

    /// Fetch every file's diff concurrently and join them in input order.
    ///
    /// A file that fails is reported and left out. Only a missing git
    /// or repository fails the whole call.
    pub async fn collect_diffs(&self, paths: &[PathBuf]) -> Result<CompositeDiff> {
        if paths.is_empty() {
            debug!("no paths selected, nothing to diff");
            return Ok(CompositeDiff::default());
        }

        if let Err(e) = self.repo.check_ready().await {
            return Err(self.fatal(e));
        }

        let results = join_all(paths.iter().map(|p| self.diff_one(p))).await;

        let mut files = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(Some(diff)) => files.push(diff),
                Ok(None) => {}
                Err(e) => return Err(self.fatal(e)),
            }
        }

        debug!(
            requested = paths.len(),
            collected = files.len(),
            "diffs collected"
        );
        Ok(CompositeDiff::new(files))
    }

    /// `Ok(None)` means the file was skipped; `Err` is reserved for
    /// environment failures.
    async fn diff_one(&self, path: &Path) -> Result<Option<FileDiff>> {
        if !self.repo.file_exists(path).await {
            info!(path = %path.display(), "file not in working tree, skipping");
            return Ok(None);
        }

        let err = match self.repo.diff_head(path).await {
            Ok(diff) => return Ok(Some(FileDiff::new(path, diff))),
            Err(e) => e,
        };

        if self.repo.is_not_tracked(&err) {
            debug!(path = %path.display(), "untracked file, using full content");
            return match self.repo.read_working_copy(path).await {
                Ok(content) => Ok(Some(FileDiff::new_file(path, &content))),
                Err(e) if is_environment(&e) => Err(e),
                Err(e) => {
                    self.skip(path, &e);
                    Ok(None)
                }
            };
        }

        if is_environment(&err) {
            return Err(err);
        }
        self.skip(path, &err);
        Ok(None)
    }

    fn skip(&self, path: &Path, err: &Error) {
        warn!(path = %path.display(), error = %err, "skipping file");
        self.notifier.notify(Notice::FileSkipped {
            path: path.to_path_buf(),
            reason: err.to_string(),
        });
    }

    fn fatal(&self, err: Error) -> Error {
        self.notifier.notify(Notice::RepositoryUnavailable {
            message: err.to_string(),
        });
        err
    }
}

fn is_environment(err: &Error) -> bool {
    matches!(err, Error::GitUnavailable | Error::NotAGitRepo)
}
