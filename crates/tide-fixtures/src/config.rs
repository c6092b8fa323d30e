// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Run configuration for the fixture regenerator.
//!
//! The tool is a no-argument command; every knob is an environment variable
//! with a hard default, so a plain `regen-fixtures` from the repository root
//! does the right thing:
//!
//! - `TIDE_FIXTURES_DIR` — fixtures root to scan (default
//!   `syntax-tests/fixtures`)
//! - `TIDE_BUILD_CMD` — command that builds the parser (default
//!   `cargo build --release --package tidec`)
//! - `TIDE_PARSER_CMD` — command that parses stdin and prints the AST as
//!   JSON on stdout (default `target/release/tidec parse --ast-json`)
//! - `TIDE_PARSE_TIMEOUT_SECS` — per-file parse deadline; `0` disables it
//!   (default `30`)
//!
//! Command values split on whitespace into program plus arguments; there is
//! no shell quoting.

use camino::Utf8PathBuf;
use miette::Result;
use std::time::Duration;

/// Default fixtures root, relative to the working directory.
pub const DEFAULT_FIXTURES_DIR: &str = "syntax-tests/fixtures";

const DEFAULT_BUILD_CMD: &str = "cargo build --release --package tidec";
const DEFAULT_PARSER_CMD: &str = "target/release/tidec parse --ast-json";
const DEFAULT_PARSE_TIMEOUT_SECS: u64 = 30;

/// Resolved configuration for one regeneration run.
#[derive(Debug, Clone)]
pub struct RegenConfig {
    /// Directory scanned recursively for `.td` inputs.
    pub fixtures_dir: Utf8PathBuf,
    /// Program + arguments that build the parser.
    pub build_command: Vec<String>,
    /// Program + arguments that parse stdin into a JSON AST on stdout.
    pub parser_command: Vec<String>,
    /// Deadline for a single parse; `None` waits indefinitely.
    pub parse_timeout: Option<Duration>,
}

impl RegenConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an override is present but unusable (an empty
    /// command or a non-numeric timeout).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let fixtures_dir = lookup("TIDE_FIXTURES_DIR")
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| Utf8PathBuf::from(DEFAULT_FIXTURES_DIR), Utf8PathBuf::from);

        let build_command =
            split_command("TIDE_BUILD_CMD", lookup("TIDE_BUILD_CMD"), DEFAULT_BUILD_CMD)?;
        let parser_command = split_command(
            "TIDE_PARSER_CMD",
            lookup("TIDE_PARSER_CMD"),
            DEFAULT_PARSER_CMD,
        )?;
        let parse_timeout = parse_timeout(lookup("TIDE_PARSE_TIMEOUT_SECS"))?;

        Ok(Self {
            fixtures_dir,
            build_command,
            parser_command,
            parse_timeout,
        })
    }
}

/// Split a command string into program + arguments on whitespace.
fn split_command(name: &str, value: Option<String>, default: &str) -> Result<Vec<String>> {
    let raw = value.unwrap_or_else(|| default.to_string());
    let parts: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() {
        miette::bail!("{name} must name a command to run");
    }
    Ok(parts)
}

fn parse_timeout(value: Option<String>) -> Result<Option<Duration>> {
    let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(Some(Duration::from_secs(DEFAULT_PARSE_TIMEOUT_SECS)));
    };
    let secs: u64 = raw.trim().parse().map_err(|_| {
        miette::miette!("TIDE_PARSE_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'")
    })?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}
