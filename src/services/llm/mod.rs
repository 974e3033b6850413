// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;

pub mod openai;

use crate::config::Config;
use crate::error::Result;

/// A text-completion service reached with one system and one user message
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Text of the first returned completion, untrimmed. An empty string
    /// means the service returned no candidates.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;

    fn name(&self) -> &str;
}

pub fn create_provider(config: &Config) -> Box<dyn LlmProvider> {
    Box::new(openai::OpenAiProvider::new(config))
}
