// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::LlmProvider;
use crate::config::Config;
use crate::error::{Error, Result};

pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenAiProvider {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.credential(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    fn request_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                provider: self.name().into(),
            }
        } else if e.is_connect() {
            Error::Provider {
                provider: self.name().into(),
                message: format!("connection failed: {e}"),
            }
        } else {
            Error::Provider {
                provider: self.name().into(),
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let Some(api_key) = &self.api_key else {
            return Err(Error::MissingCredential);
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(%url, model = %self.model, prompt_chars = prompt.len(), "requesting completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&ChatRequest {
                model: &self.model,
                messages: [
                    Message {
                        role: "system",
                        content: system,
                    },
                    Message {
                        role: "user",
                        content: prompt,
                    },
                ],
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            })
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(Error::Provider {
                provider: self.name().into(),
                message: format!("HTTP {status}: {detail}"),
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| self.request_error(e))?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "openai"
    }
}
