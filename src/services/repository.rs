// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::ChangedFile;
use crate::error::{Error, Result};

/// Name of the pending message file inside the git directory
pub const PENDING_MESSAGE_FILE: &str = "COMMITMOJI_EDITMSG";

/// What the pipeline needs from version control
#[async_trait]
pub trait RepositoryAdapter: Send + Sync {
    /// Fails with `GitUnavailable` or `NotAGitRepo` when nothing can be diffed
    async fn check_ready(&self) -> Result<()>;

    async fn list_changes(&self) -> Result<Vec<ChangedFile>>;

    async fn file_exists(&self, path: &Path) -> bool;

    /// Diff of `path` against the last commit, read from the working tree
    /// or the index. Fails with `NotTracked` when git doesn't know the file.
    async fn diff_head(&self, path: &Path) -> Result<String>;

    async fn read_working_copy(&self, path: &Path) -> Result<String>;

    async fn set_commit_message(&self, text: &str) -> Result<()>;

    fn is_not_tracked(&self, err: &Error) -> bool {
        is_not_tracked(err)
    }
}

pub fn is_not_tracked(err: &Error) -> bool {
    matches!(err, Error::NotTracked { .. })
}

/// Whether git's stderr says the pathspec is unknown to the index
pub fn is_untracked_stderr(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    lower.contains("did not match any file") || lower.contains("not in the working tree")
}

/// Which side of the index a diff reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiffScope {
    /// Working tree against HEAD, staged or not
    #[default]
    WorkingTree,
    /// Index against HEAD; what `git commit` will record
    Staged,
}

pub struct GitRepository {
    work_dir: PathBuf,
    message_file: PathBuf,
    scope: DiffScope,
}

impl GitRepository {
    pub fn discover(message_file: Option<PathBuf>) -> Result<Self> {
        Self::discover_at(".", message_file)
    }

    pub fn discover_at(dir: impl AsRef<Path>, message_file: Option<PathBuf>) -> Result<Self> {
        let repo = gix::discover(dir.as_ref()).map_err(|_| Error::NotAGitRepo)?;

        let work_dir = repo
            .workdir()
            .ok_or_else(|| Error::Git("Bare repository not supported".into()))?;
        let work_dir = std::fs::canonicalize(work_dir)?;

        let message_file = match message_file {
            Some(path) => path,
            None => std::fs::canonicalize(repo.git_dir())?.join(PENDING_MESSAGE_FILE),
        };

        debug!(
            work_dir = %work_dir.display(),
            message_file = %message_file.display(),
            "repository discovered"
        );

        Ok(Self {
            work_dir,
            message_file,
            scope: DiffScope::default(),
        })
    }

    pub fn with_scope(mut self, scope: DiffScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn scope(&self) -> DiffScope {
        self.scope
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn message_file(&self) -> &Path {
        &self.message_file
    }

    async fn git<I, S>(&self, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        // File names are never patterns: `a[1].txt` must not match `a1.txt`
        Command::new("git")
            .args(args)
            .env("GIT_LITERAL_PATHSPECS", "1")
            .current_dir(&self.work_dir)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => Error::GitUnavailable,
                _ => Error::Io(e),
            })
    }

    async fn git_checked<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.git(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(stderr.trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn has_head(&self) -> Result<bool> {
        let output = self.git(["rev-parse", "--verify", "--quiet", "HEAD"]).await?;
        Ok(output.status.success())
    }

    /// Directory git runs hooks from, honouring core.hooksPath
    pub async fn hooks_dir(&self) -> Result<PathBuf> {
        let out = self
            .git_checked(["rev-parse", "--path-format=absolute", "--git-path", "hooks"])
            .await?;
        Ok(PathBuf::from(out.trim()))
    }

    /// Stage `paths` and commit them with the pending message
    pub async fn commit(&self, paths: &[PathBuf]) -> Result<()> {
        let mut add: Vec<&OsStr> = vec![OsStr::new("add"), OsStr::new("-A"), OsStr::new("--")];
        add.extend(paths.iter().map(|p| p.as_os_str()));
        self.git_checked(add).await?;

        let mut commit: Vec<&OsStr> = vec![
            OsStr::new("commit"),
            OsStr::new("-F"),
            self.message_file.as_os_str(),
            OsStr::new("--"),
        ];
        commit.extend(paths.iter().map(|p| p.as_os_str()));
        self.git_checked(commit).await?;
        Ok(())
    }
}

#[async_trait]
impl RepositoryAdapter for GitRepository {
    async fn check_ready(&self) -> Result<()> {
        self.git_checked(["--version"]).await?;
        let output = self.git(["rev-parse", "--is-inside-work-tree"]).await?;
        if !output.status.success() {
            return Err(Error::NotAGitRepo);
        }
        Ok(())
    }

    async fn list_changes(&self) -> Result<Vec<ChangedFile>> {
        let files = match self.scope {
            DiffScope::WorkingTree => {
                let out = self
                    .git_checked(["status", "--porcelain=v1", "-z", "--untracked-files=all"])
                    .await?;
                parse_porcelain(&out)
            }
            DiffScope::Staged => {
                let out = self
                    .git_checked(["diff", "--cached", "--name-only", "-z"])
                    .await?;
                parse_name_only(&out)
            }
        };
        debug!(count = files.len(), scope = ?self.scope, "changes listed");
        Ok(files)
    }

    async fn file_exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(self.work_dir.join(path))
            .await
            .unwrap_or(false)
    }

    async fn diff_head(&self, path: &Path) -> Result<String> {
        if !self.has_head().await? {
            // Nothing committed yet: every file is new
            return Err(Error::NotTracked {
                path: path.to_path_buf(),
            });
        }

        let tracked = self
            .git([
                OsStr::new("ls-files"),
                OsStr::new("--error-unmatch"),
                OsStr::new("--"),
                path.as_os_str(),
            ])
            .await?;
        if !tracked.status.success() {
            let stderr = String::from_utf8_lossy(&tracked.stderr);
            if is_untracked_stderr(&stderr) {
                return Err(Error::NotTracked {
                    path: path.to_path_buf(),
                });
            }
            return Err(Error::Git(stderr.trim().to_string()));
        }

        let mut args = vec![OsStr::new("diff")];
        if self.scope == DiffScope::Staged {
            args.push(OsStr::new("--cached"));
        }
        args.extend([
            OsStr::new("HEAD"),
            OsStr::new("--no-ext-diff"),
            OsStr::new("--no-color"),
            OsStr::new("--unified=3"),
            OsStr::new("--"),
            path.as_os_str(),
        ]);
        self.git_checked(args).await
    }

    async fn read_working_copy(&self, path: &Path) -> Result<String> {
        Ok(tokio::fs::read_to_string(self.work_dir.join(path)).await?)
    }

    async fn set_commit_message(&self, text: &str) -> Result<()> {
        let mut content = text.trim_end().to_string();
        content.push('\n');
        tokio::fs::write(&self.message_file, content).await?;
        debug!(path = %self.message_file.display(), "commit message written");
        Ok(())
    }
}

/// Parse `git status --porcelain=v1 -z` output. Renames and copies
/// report their new path; the original path field is skipped.
pub fn parse_porcelain(out: &str) -> Vec<ChangedFile> {
    let mut files = Vec::new();
    let mut fields = out.split('\0');

    while let Some(entry) = fields.next() {
        let (Some(status), Some(path)) = (entry.get(..3), entry.get(3..)) else {
            continue;
        };
        if path.is_empty() {
            continue;
        }
        let mut codes = status.chars();
        let x = codes.next().unwrap_or(' ');
        let y = codes.next().unwrap_or(' ');

        if matches!(x, 'R' | 'C') || matches!(y, 'R' | 'C') {
            fields.next();
        }
        // Ignored entries only show up with --ignored
        if x == '!' {
            continue;
        }

        files.push(ChangedFile::new(path));
    }

    files
}

/// Parse `git diff --name-only -z` output
pub fn parse_name_only(out: &str) -> Vec<ChangedFile> {
    out.split('\0')
        .filter(|path| !path.is_empty())
        .map(ChangedFile::new)
        .collect()
}
