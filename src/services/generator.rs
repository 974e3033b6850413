// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{CommitMessage, CompositeDiff, PromptContext, SYSTEM_PROMPT};
use crate::error::Error;
use crate::services::llm::LlmProvider;
use crate::services::review::{Notice, Notifier};
use crate::services::sanitizer::CommitSanitizer;

/// Why a completion request failed, as far as the user needs to know
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Credential,
    Network,
    Timeout,
    Other,
}

impl FailureKind {
    pub fn classify(err: &Error) -> Self {
        match err {
            Error::MissingCredential => return Self::Credential,
            Error::Timeout { .. } => return Self::Timeout,
            _ => {}
        }

        let text = err.to_string().to_lowercase();
        let any = |needles: &[&str]| needles.iter().any(|n| text.contains(n));

        if any(&["api key", "401", "403", "unauthorized", "authentication"]) {
            Self::Credential
        } else if any(&["timed out", "timeout"]) {
            Self::Timeout
        } else if any(&["connect", "dns", "network", "unreachable"]) {
            Self::Network
        } else {
            Self::Other
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Credential => {
                "The API key is missing or was rejected. Set `api_key` in the config file, COMMITMOJI_API_KEY or OPENAI_API_KEY."
            }
            Self::Network => {
                "Could not reach the completion service. Check your network connection and `base_url`."
            }
            Self::Timeout => {
                "The completion service took too long to answer. Try regenerating, or raise `timeout_secs`."
            }
            Self::Other => "Generating the commit message failed.",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Credential => "credential",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Drafts a commit message for a composite diff. Never fails: any
/// service error is reported and the default message is returned.
pub struct MessageGenerator {
    provider: Box<dyn LlmProvider>,
    notifier: Arc<dyn Notifier>,
    emoji: bool,
}

impl MessageGenerator {
    pub fn new(provider: Box<dyn LlmProvider>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            provider,
            notifier,
            emoji: true,
        }
    }

    pub fn with_emoji(mut self, emoji: bool) -> Self {
        self.emoji = emoji;
        self
    }

    pub fn prompt_for(diff: &CompositeDiff) -> String {
        PromptContext::new(diff).to_prompt()
    }

    pub async fn generate(&self, diff: &CompositeDiff) -> CommitMessage {
        let prompt = Self::prompt_for(diff);
        debug!(
            provider = self.provider.name(),
            files = diff.len(),
            prompt_chars = prompt.len(),
            "generating commit message"
        );

        match self.provider.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(raw) => {
                if raw.trim().is_empty() {
                    warn!(provider = self.provider.name(), "empty completion, using default");
                }
                CommitMessage::new(CommitSanitizer::finalize(&raw, self.emoji))
            }
            Err(e) => {
                let kind = FailureKind::classify(&e);
                warn!(provider = self.provider.name(), %kind, error = %e, "completion failed");
                self.notifier.notify(Notice::GenerationFailed {
                    kind,
                    detail: e.to_string(),
                });
                CommitMessage::new(CommitSanitizer::fallback(self.emoji))
            }
        }
    }
}
