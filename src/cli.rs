// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "commitmoji")]
#[command(version)]
#[command(about = "Draft emoji-annotated commit messages from your changes", long_about = None)]
pub struct Cli {
    /// Files to describe (default: pick interactively from all changes)
    pub paths: Vec<PathBuf>,

    /// Model name
    #[arg(short, long, env = "COMMITMOJI_MODEL")]
    pub model: Option<String>,

    /// Apply the generated message without the review menu
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Print message only, don't apply it
    #[arg(long)]
    pub dry_run: bool,

    /// Stage the selected files and commit after applying the message
    #[arg(long)]
    pub commit: bool,

    /// Write the applied message to this file (used by the git hook)
    #[arg(long, value_name = "FILE")]
    pub message_file: Option<PathBuf>,

    /// Send the diff even if it looks like it contains secrets
    #[arg(long)]
    pub allow_secrets: bool,

    /// Show the prompt sent to the LLM
    #[arg(long)]
    pub show_prompt: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Initialize config file
    Init,
    /// Show current configuration
    Config,
    /// Manage the prepare-commit-msg hook
    Hook {
        #[command(subcommand)]
        action: HookAction,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Store the API key in the system keychain
    #[cfg(feature = "secure-storage")]
    SetKey,
    /// Check whether an API key is stored in the system keychain
    #[cfg(feature = "secure-storage")]
    GetKey,
}

#[derive(clap::Subcommand, Debug, Clone, Copy)]
pub enum HookAction {
    /// Install the hook into the current repository
    Install,
    /// Remove the hook, restoring any previous one
    Uninstall,
    /// Show whether the hook is installed
    Status,
}
