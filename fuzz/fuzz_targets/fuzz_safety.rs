// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use commitmoji::domain::{CompositeDiff, FileDiff};
use commitmoji::services::safety::scan_for_secrets;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let diff = CompositeDiff::new(vec![
        FileDiff::new("fuzz.rs", data),
        FileDiff::new_file("fuzz_new.rs", data),
    ]);
    for found in scan_for_secrets(&diff) {
        assert!(found.line >= 1);
    }
});
