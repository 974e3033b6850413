// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::CommitType;

/// Used whenever the model gives us nothing to work with
pub const DEFAULT_MESSAGE: &str = "feat: update code changes";

static HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)(\([^)]*\))?!?:").unwrap());

static LEADING_EMOJI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Extended_Pictographic}").unwrap());

static CODE_FENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[^\n]*\n([\s\S]*?)\n?```$").unwrap());

pub struct CommitSanitizer;

impl CommitSanitizer {
    /// Turn a raw completion into the final message: clean it up, fall
    /// back to the default when empty, then prefix the type emoji.
    pub fn finalize(raw: &str, emoji: bool) -> String {
        let cleaned = Self::clean(raw);
        let message = if cleaned.is_empty() {
            DEFAULT_MESSAGE.to_string()
        } else {
            cleaned
        };

        if emoji {
            Self::decorate(&message)
        } else {
            message
        }
    }

    /// The default message as `finalize` would return it
    pub fn fallback(emoji: bool) -> String {
        Self::finalize("", emoji)
    }

    /// Trim, then unwrap a surrounding code fence or pair of quotes
    pub fn clean(raw: &str) -> String {
        let mut cleaned = raw.trim();

        if let Some(caps) = CODE_FENCE_REGEX.captures(cleaned) {
            cleaned = caps.get(1).map_or("", |m| m.as_str()).trim();
        }

        for quote in ['"', '\'', '`'] {
            if cleaned.len() >= 2 && cleaned.starts_with(quote) && cleaned.ends_with(quote) {
                cleaned = cleaned[1..cleaned.len() - 1].trim();
                break;
            }
        }

        cleaned.to_string()
    }

    /// Type token from the header line, if it is one we know
    pub fn commit_type(message: &str) -> Option<CommitType> {
        HEADER_REGEX
            .captures(message)
            .and_then(|caps| caps.get(1))
            .and_then(|m| CommitType::parse(m.as_str()))
    }

    pub fn starts_with_emoji(message: &str) -> bool {
        LEADING_EMOJI_REGEX.is_match(message)
    }

    /// Prefix the emoji for the message's type, `feat` when unknown
    pub fn decorate(message: &str) -> String {
        if Self::starts_with_emoji(message) {
            return message.to_string();
        }
        let commit_type = Self::commit_type(message).unwrap_or(CommitType::Feat);
        format!("{} {}", commit_type.emoji(), message)
    }
}
