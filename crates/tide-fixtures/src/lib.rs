// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Golden AST fixture regeneration for the Tide syntax test suite.
//!
//! For every `.td` test-definition file under the fixtures root, the tool
//! invokes the freshly built parser in its own process and records the
//! resulting AST as a canonical `.ast.json` artifact next to the input.
//! Future test runs diff parser output against these baselines byte for
//! byte, so serialization here must be deterministic.

pub mod config;
pub mod discover;
pub mod parse_runner;
pub mod parser_build;
pub mod report;
