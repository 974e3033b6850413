// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

pub mod aggregator;
pub mod generator;
pub mod llm;
pub mod repository;
pub mod review;
pub mod safety;
pub mod sanitizer;
pub mod terminal;
