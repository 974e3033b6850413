// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

// miette's Diagnostic derive generates code that triggers this false positive
#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Not a git repository")]
    #[diagnostic(
        code(commitmoji::git::not_repo),
        help("Run this command inside a git working tree")
    )]
    NotAGitRepo,

    #[error("The git executable is not available")]
    #[diagnostic(
        code(commitmoji::git::unavailable),
        help("Install git and make sure it is on your PATH")
    )]
    GitUnavailable,

    #[error("'{}' is not tracked by git", path.display())]
    #[diagnostic(code(commitmoji::git::not_tracked))]
    NotTracked { path: PathBuf },

    #[error("No changes found in the working tree")]
    #[diagnostic(
        code(commitmoji::git::no_changes),
        help("Edit some files first, or check your `exclude` patterns")
    )]
    NoChanges,

    #[error("No files selected")]
    #[diagnostic(
        code(commitmoji::review::nothing_selected),
        help("Select at least one file to describe")
    )]
    NothingSelected,

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("Potential secrets detected: {patterns:?}")]
    #[diagnostic(
        code(commitmoji::safety::secrets),
        help("Remove the secrets from your changes, or pass --allow-secrets")
    )]
    SecretsDetected { patterns: Vec<String> },

    #[error("No API key configured for the completion service")]
    #[diagnostic(
        code(commitmoji::llm::missing_key),
        help("Set `api_key` in the config file, COMMITMOJI_API_KEY or OPENAI_API_KEY")
    )]
    MissingCredential,

    #[error("Request to {provider} timed out")]
    #[diagnostic(
        code(commitmoji::llm::timeout),
        help("Increase `timeout_secs` or try again")
    )]
    Timeout { provider: String },

    #[error("Provider '{provider}' error: {message}")]
    #[diagnostic(code(commitmoji::provider::error))]
    Provider { provider: String, message: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(commitmoji::config::error))]
    Config(String),

    #[error("Git error: {0}")]
    #[diagnostic(code(commitmoji::git::error))]
    Git(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[error("Clipboard error: {0}")]
    #[diagnostic(code(commitmoji::clipboard::error))]
    Clipboard(String),

    #[cfg(feature = "secure-storage")]
    #[error("Keyring error: {0}")]
    #[diagnostic(
        code(commitmoji::keyring::error),
        help("Check your system keychain configuration")
    )]
    Keyring(String),
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        Error::Dialog(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
