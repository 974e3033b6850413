// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::future::Future;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use console::style;
use dialoguer::{Editor, Select};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{Cli, Commands, HookAction};
use crate::config::Config;
use crate::domain::CommitMessage;
use crate::error::{Error, Result};
use crate::services::{
    aggregator::DiffAggregator,
    generator::MessageGenerator,
    llm,
    repository::{DiffScope, GitRepository, RepositoryAdapter},
    review::ReviewSession,
    terminal::TerminalSurface,
};

const HOOK_MARKER: &str = "# commitmoji hook";

const ACTIONS: &[&str] = &[
    "Apply",
    "Edit",
    "Regenerate",
    "Copy to clipboard",
    "Show diff",
    "Quit",
];

pub struct App {
    cli: Cli,
    config: Config,
    cancel_token: CancellationToken,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let config = Config::load(&cli)?;
        debug!(
            model = %config.model,
            base_url = config.base_url(),
            has_key = config.api_key.is_some(),
            "config loaded"
        );
        Ok(Self {
            cli,
            config,
            cancel_token: CancellationToken::new(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let cancel = self.cancel_token.clone();
        tokio::spawn(async move {
            signal::ctrl_c().await.ok();
            cancel.cancel();
        });

        if let Some(ref cmd) = self.cli.command {
            return self.handle_command(cmd).await;
        }

        self.draft_message().await
    }

    async fn draft_message(&self) -> Result<()> {
        let is_interactive = std::io::stdout().is_terminal() && std::io::stdin().is_terminal();

        // From the hook only the index is committed, so only the index is described
        let scope = if self.cli.message_file.is_some() {
            DiffScope::Staged
        } else {
            DiffScope::WorkingTree
        };
        let git = Arc::new(GitRepository::discover(self.cli.message_file.clone())?.with_scope(scope));
        git.check_ready().await?;

        let paths = self.select_paths(&git, is_interactive).await?;
        debug!(selected = paths.len(), "files selected");

        // One surface serves as notifier for every stage
        let surface = Arc::new(TerminalSurface::new());
        surface.set_selection(paths.clone());

        let repo: Arc<dyn RepositoryAdapter> = git.clone();
        let aggregator = DiffAggregator::new(repo.clone(), surface.clone());
        let generator = MessageGenerator::new(llm::create_provider(&self.config), surface.clone())
            .with_emoji(self.config.emoji);
        let session = ReviewSession::new(repo, surface.clone(), aggregator, generator)
            .allow_secrets(self.cli.allow_secrets);

        let message = self
            .with_progress(&surface, session.on_generate_requested())
            .await?;

        if self.cli.show_prompt {
            if let Some(diff) = session.current_diff().await {
                eprintln!("{}", style("--- PROMPT ---").dim());
                eprintln!("{}", MessageGenerator::prompt_for(&diff));
                eprintln!("{}", style("--- END PROMPT ---").dim());
            }
        }

        if self.cli.dry_run {
            println!("{message}");
            return Ok(());
        }

        if !self.cli.yes {
            if !is_interactive {
                eprintln!("{}", style("warning:").yellow().bold());
                eprintln!("  Not a terminal. Use --yes to apply in scripts/hooks.");
                println!("{message}");
                return Ok(());
            }
            return self.review_loop(&git, &session, &surface, &paths).await;
        }

        self.apply(&git, &session, &message, &paths).await
    }

    async fn select_paths(&self, git: &GitRepository, is_interactive: bool) -> Result<Vec<PathBuf>> {
        if !self.cli.paths.is_empty() {
            let cwd = std::fs::canonicalize(std::env::current_dir()?)?;
            return Ok(self
                .cli
                .paths
                .iter()
                .map(|p| repo_relative(git.work_dir(), &cwd, p))
                .collect());
        }

        let exclude = self.config.exclude_set()?;
        let changes: Vec<_> = git
            .list_changes()
            .await?
            .into_iter()
            .filter(|c| !Config::is_excluded(&exclude, &c.path))
            .collect();

        if changes.is_empty() {
            return Err(Error::NoChanges);
        }

        if is_interactive && !self.cli.yes {
            return TerminalSurface::pick_files(&changes);
        }

        Ok(changes
            .into_iter()
            .filter(|c| c.selected_for_commit)
            .map(|c| c.path)
            .collect())
    }

    async fn review_loop(
        &self,
        git: &GitRepository,
        session: &ReviewSession,
        surface: &TerminalSurface,
        paths: &[PathBuf],
    ) -> Result<()> {
        loop {
            let Some(current) = session.current_message().await else {
                return Err(Error::Cancelled);
            };

            let choice = Select::new()
                .with_prompt("What next?")
                .items(ACTIONS)
                .default(0)
                .interact()?;

            match choice {
                0 => return self.apply(git, session, &current, paths).await,
                1 => {
                    if let Some(edited) = Editor::new().edit(&current.text)? {
                        let edited = edited.trim();
                        if edited.is_empty() {
                            TerminalSurface::print_info("Empty message, keeping the previous one");
                            continue;
                        }
                        session.on_edited_by_user(edited).await;
                        eprintln!("{}", style(edited).green());
                        eprintln!();
                    }
                }
                2 => {
                    self.with_progress(surface, session.on_regenerate_requested())
                        .await?;
                }
                3 => {
                    arboard::Clipboard::new()
                        .and_then(|mut clipboard| clipboard.set_text(current.text.clone()))
                        .map_err(|e| Error::Clipboard(e.to_string()))?;
                    TerminalSurface::print_success("Copied to clipboard");
                }
                4 => {
                    if let Some(diff) = session.current_diff().await {
                        TerminalSurface::print_diff(&diff);
                    }
                }
                _ => return Err(Error::Cancelled),
            }
        }
    }

    async fn apply(
        &self,
        git: &GitRepository,
        session: &ReviewSession,
        message: &CommitMessage,
        paths: &[PathBuf],
    ) -> Result<()> {
        session.on_apply_requested(&message.text).await?;

        if self.cli.commit {
            git.commit(paths).await?;
            TerminalSurface::print_success("Committed!");
        } else if self.cli.message_file.is_some() {
            TerminalSurface::print_success(&format!(
                "Message written to {}",
                git.message_file().display()
            ));
        } else {
            TerminalSurface::print_success(&format!(
                "Message saved to {}",
                git.message_file().display()
            ));
            TerminalSurface::print_info(&format!(
                "Commit with: git commit -e -F {}",
                git.message_file().display()
            ));
        }
        Ok(())
    }

    /// Run `fut` under a spinner, giving up on Ctrl+C
    async fn with_progress<T>(
        &self,
        surface: &TerminalSurface,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        if self.cancel_token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        surface.begin_progress(&format!("Asking {} for a commit message...", self.config.model));
        let result = tokio::select! {
            _ = self.cancel_token.cancelled() => Err(Error::Cancelled),
            result = fut => result,
        };
        surface.end_progress();
        result
    }

    async fn handle_command(&self, cmd: &Commands) -> Result<()> {
        match cmd {
            Commands::Init => {
                let path = Config::create_default()?;
                println!("Created config: {}", path.display());
                Ok(())
            }
            Commands::Config => {
                println!("Model: {}", self.config.model);
                println!("Base URL: {}", self.config.base_url());
                println!(
                    "API key: {}",
                    if self.config.credential().is_some() {
                        "configured"
                    } else {
                        "missing"
                    }
                );
                println!("Temperature: {}", self.config.temperature);
                println!("Max tokens: {}", self.config.max_tokens);
                println!("Timeout: {}s", self.config.timeout_secs);
                println!("Exclude: {}", self.config.exclude.join(", "));
                println!("Emoji: {}", self.config.emoji);
                if let Some(path) = Config::config_path() {
                    let status = if path.exists() { "found" } else { "not found" };
                    println!("Config file: {} ({})", path.display(), status);
                }
                Ok(())
            }
            Commands::Completions { shell } => {
                let mut cmd = <Cli as clap::CommandFactory>::command();
                clap_complete::generate(*shell, &mut cmd, "commitmoji", &mut std::io::stdout());
                Ok(())
            }
            Commands::Hook { action } => self.handle_hook(*action).await,
            #[cfg(feature = "secure-storage")]
            Commands::SetKey => self.set_api_key(),
            #[cfg(feature = "secure-storage")]
            Commands::GetKey => self.get_api_key(),
        }
    }

    // ─── Hook Commands ───

    async fn handle_hook(&self, action: HookAction) -> Result<()> {
        let git = GitRepository::discover(None)?;
        let hooks_dir = git.hooks_dir().await?;
        match action {
            HookAction::Install => Self::hook_install(&hooks_dir),
            HookAction::Uninstall => Self::hook_uninstall(&hooks_dir),
            HookAction::Status => Self::hook_status(&hooks_dir),
        }
    }

    fn hook_install(hooks_dir: &Path) -> Result<()> {
        let hook_path = hooks_dir.join("prepare-commit-msg");
        let backup_path = hooks_dir.join("prepare-commit-msg.commitmoji-backup");

        std::fs::create_dir_all(hooks_dir)?;

        if hook_path.exists() {
            let content = std::fs::read_to_string(&hook_path).unwrap_or_default();
            if content.contains(HOOK_MARKER) {
                TerminalSurface::print_success(&format!(
                    "Hook already installed at {}",
                    hook_path.display()
                ));
                return Ok(());
            }
            std::fs::copy(&hook_path, &backup_path)?;
            TerminalSurface::print_info(&format!(
                "Backed up existing hook to {}",
                backup_path.display()
            ));
        }

        let hook_script = r#"#!/bin/sh
# commitmoji hook (auto-generated, do not edit)
# Drafts the commit message when committing interactively.
# Skips merge, squash, amend, and message-provided commits.

COMMIT_MSG_FILE="$1"
COMMIT_SOURCE="$2"

case "$COMMIT_SOURCE" in
    merge|squash|message|commit)
        exit 0
        ;;
esac

if ! command -v commitmoji >/dev/null 2>&1; then
    exit 0
fi

commitmoji --yes --message-file "$COMMIT_MSG_FILE" </dev/null >/dev/null 2>&1 || true
"#;

        // Write to temp file first, then rename (atomic)
        let temp_path = hooks_dir.join(".prepare-commit-msg.tmp");
        std::fs::write(&temp_path, hook_script)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&temp_path)?.permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&temp_path, perms)?;
        }

        std::fs::rename(&temp_path, &hook_path)?;

        TerminalSurface::print_success(&format!("Hook installed at {}", hook_path.display()));
        Ok(())
    }

    fn hook_uninstall(hooks_dir: &Path) -> Result<()> {
        let hook_path = hooks_dir.join("prepare-commit-msg");
        let backup_path = hooks_dir.join("prepare-commit-msg.commitmoji-backup");

        if !hook_path.exists() {
            TerminalSurface::print_info(&format!("No hook found at {}", hook_path.display()));
            return Ok(());
        }

        let content = std::fs::read_to_string(&hook_path).unwrap_or_default();
        if !content.contains(HOOK_MARKER) {
            return Err(Error::Git(format!(
                "Hook at {} was not installed by commitmoji. Remove manually if intended.",
                hook_path.display()
            )));
        }

        std::fs::remove_file(&hook_path)?;

        if backup_path.exists() {
            std::fs::rename(&backup_path, &hook_path)?;
            TerminalSurface::print_info("Restored previous hook from backup");
        }

        TerminalSurface::print_success(&format!("Hook removed from {}", hook_path.display()));
        Ok(())
    }

    fn hook_status(hooks_dir: &Path) -> Result<()> {
        let hook_path = hooks_dir.join("prepare-commit-msg");

        if !hook_path.exists() {
            eprintln!(
                "{} No prepare-commit-msg hook installed",
                style("✗").red().bold()
            );
            eprintln!("  Install with: {}", style("commitmoji hook install").yellow());
            return Ok(());
        }

        let content = std::fs::read_to_string(&hook_path).unwrap_or_default();
        if content.contains(HOOK_MARKER) {
            TerminalSurface::print_success(&format!(
                "commitmoji hook is installed at {}",
                hook_path.display()
            ));
        } else {
            TerminalSurface::print_info(
                "A prepare-commit-msg hook exists but was not installed by commitmoji",
            );
        }

        Ok(())
    }

    // ─── Keyring Commands ───

    #[cfg(feature = "secure-storage")]
    fn set_api_key(&self) -> Result<()> {
        let key = dialoguer::Password::new()
            .with_prompt("API key (input will be hidden)")
            .interact()?;

        if key.trim().is_empty() {
            return Err(Error::Config("API key cannot be empty".into()));
        }

        let entry = keyring::Entry::new("commitmoji", crate::config::KEYRING_USER)
            .map_err(|e| Error::Keyring(e.to_string()))?;
        entry
            .set_password(key.trim())
            .map_err(|e| Error::Keyring(e.to_string()))?;

        TerminalSurface::print_success("API key stored in the system keychain");
        Ok(())
    }

    #[cfg(feature = "secure-storage")]
    fn get_api_key(&self) -> Result<()> {
        let entry = keyring::Entry::new("commitmoji", crate::config::KEYRING_USER)
            .map_err(|e| Error::Keyring(e.to_string()))?;

        match entry.get_password() {
            Ok(_) => TerminalSurface::print_success("API key is stored in the system keychain"),
            Err(keyring::Error::NoEntry) => {
                eprintln!(
                    "{} No API key found in the system keychain",
                    style("✗").red().bold()
                );
                eprintln!("  Store one with: {}", style("commitmoji set-key").yellow());
            }
            Err(e) => return Err(Error::Keyring(e.to_string())),
        }

        Ok(())
    }
}

/// Resolve a path given on the command line against the working tree root
pub fn repo_relative(work_dir: &Path, cwd: &Path, path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    let absolute = normalize(&absolute);

    absolute
        .strip_prefix(work_dir)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Drop `.` and fold `..` without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
