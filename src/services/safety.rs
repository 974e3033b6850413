// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{CompositeDiff, NEW_FILE_MARKER};

pub struct SecretMatch {
    pub pattern_name: String,
    pub file: String,
    pub line: usize,
}

static SECRET_PATTERNS: LazyLock<Vec<(&str, Regex)>> = LazyLock::new(|| {
    vec![
        (
            "API Key",
            Regex::new(r#"(?i)(api[_-]?key|apikey)\s*[:=]\s*["']?[a-zA-Z0-9_-]{20,}"#).unwrap(),
        ),
        ("AWS Key", Regex::new(r"AKIA[0-9A-Z]{16}").unwrap()),
        (
            "Private Key",
            Regex::new(r"-----BEGIN .* PRIVATE KEY-----").unwrap(),
        ),
        ("OpenAI Key", Regex::new(r"sk-[a-zA-Z0-9]{48}").unwrap()),
        (
            "Generic Secret",
            Regex::new(r#"(?i)(password|secret|token)\s*[:=]\s*["'][^"']{8,}["']"#).unwrap(),
        ),
        (
            "Connection String",
            Regex::new(r"(?i)(mongodb|postgres|mysql|redis)://[^\s]+").unwrap(),
        ),
    ]
});

/// Scan lines that would leave the machine as additions: `+` lines of a
/// diff, or every line of a new file.
pub fn scan_for_secrets(diff: &CompositeDiff) -> Vec<SecretMatch> {
    let mut found = Vec::new();

    for file in diff.files() {
        let (added_only, body) = match file.diff_text.strip_prefix(NEW_FILE_MARKER) {
            Some(content) => (false, content),
            None => (true, file.diff_text.as_str()),
        };

        for (idx, line) in body.lines().enumerate() {
            if added_only && (!line.starts_with('+') || line.starts_with("+++")) {
                continue;
            }

            if let Some((name, _)) = SECRET_PATTERNS.iter().find(|(_, p)| p.is_match(line)) {
                found.push(SecretMatch {
                    pattern_name: name.to_string(),
                    file: file.path.display().to_string(),
                    line: idx + 1,
                });
            }
        }
    }

    found
}
