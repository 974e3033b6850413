// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Chore,
    Build,
    Ci,
}

impl CommitType {
    /// Every type that has an emoji
    pub const ALL: &[&str] = &[
        "feat", "fix", "docs", "style", "refactor", "perf", "test", "chore", "build", "ci",
    ];

    /// The types the model is allowed to choose from
    pub const PROMPTED: &[CommitType] = &[
        Self::Feat,
        Self::Fix,
        Self::Docs,
        Self::Style,
        Self::Refactor,
        Self::Perf,
        Self::Test,
        Self::Chore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feat => "feat",
            Self::Fix => "fix",
            Self::Docs => "docs",
            Self::Style => "style",
            Self::Refactor => "refactor",
            Self::Perf => "perf",
            Self::Test => "test",
            Self::Chore => "chore",
            Self::Build => "build",
            Self::Ci => "ci",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "feat" => Some(Self::Feat),
            "fix" => Some(Self::Fix),
            "docs" => Some(Self::Docs),
            "style" => Some(Self::Style),
            "refactor" => Some(Self::Refactor),
            "perf" => Some(Self::Perf),
            "test" => Some(Self::Test),
            "chore" => Some(Self::Chore),
            "build" => Some(Self::Build),
            "ci" => Some(Self::Ci),
            _ => None,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Feat => "✨",
            Self::Fix => "🐛",
            Self::Docs => "📚",
            Self::Style => "💄",
            Self::Refactor => "♻️",
            Self::Perf => "⚡",
            Self::Test => "✅",
            Self::Chore => "🔧",
            Self::Build => "🏗️",
            Self::Ci => "🔄",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Feat => "a new feature",
            Self::Fix => "a bug fix",
            Self::Docs => "documentation only changes",
            Self::Style => "formatting, whitespace or other changes that do not affect meaning",
            Self::Refactor => "a code change that neither fixes a bug nor adds a feature",
            Self::Perf => "a code change that improves performance",
            Self::Test => "adding missing tests or correcting existing tests",
            Self::Chore => "maintenance, tooling or dependency updates",
            Self::Build => "changes to the build system or external dependencies",
            Self::Ci => "changes to CI configuration files and scripts",
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message shown in review; edited in place or replaced on regenerate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    pub text: String,
}

impl CommitMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn subject(&self) -> &str {
        self.text.lines().next().unwrap_or("")
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
