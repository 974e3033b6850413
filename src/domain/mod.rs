// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

mod change;
mod commit;
mod context;

pub use change::*;
pub use commit::*;
pub use context::*;
