// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use commitmoji::services::sanitizer::CommitSanitizer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let decorated = CommitSanitizer::finalize(data, true);
    assert!(!decorated.trim().is_empty());
    assert!(CommitSanitizer::starts_with_emoji(&decorated));

    let plain = CommitSanitizer::finalize(data, false);
    assert!(!plain.trim().is_empty());
});
