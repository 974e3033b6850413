// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use super::{CommitType, CompositeDiff};

pub const SYSTEM_PROMPT: &str = "You are an assistant that writes clear, concise git commit messages following the Conventional Commits specification.";

#[derive(Debug)]
pub struct PromptContext {
    pub diff: String,
}

impl PromptContext {
    pub fn new(diff: &CompositeDiff) -> Self {
        Self {
            diff: diff.render(),
        }
    }

    pub fn to_prompt(&self) -> String {
        let types = CommitType::PROMPTED
            .iter()
            .map(|t| format!("- {}: {}", t.as_str(), t.description()))
            .collect::<Vec<_>>()
            .join("\n");

        let emojis = CommitType::PROMPTED
            .iter()
            .map(|t| format!("{} {}", t.emoji(), t.as_str()))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"Generate a commit message for the following changes.

```diff
{diff}
```

Use this format:
<type>[optional scope]: <description>

[optional body]

The type must be one of:
{types}

Start the message with one emoji matching the type: {emojis}.
Keep the first line under 72 characters and write it in the imperative mood.
Reply with the commit message only."#,
            diff = self.diff,
        )
    }
}
