// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Build step for the parser under test.
//!
//! The build procedure is an opaque external command; only its exit status
//! matters here. A failed build is an unrecoverable precondition failure for
//! the whole run, so there are no retries and no fixture is touched after
//! one.

use miette::{Context, IntoDiagnostic, Result};
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::config::RegenConfig;

/// Run the configured build command, suppressing its output.
///
/// # Errors
///
/// Returns an error if the command cannot be launched or exits non-zero.
pub fn run_build(config: &RegenConfig) -> Result<()> {
    let Some((program, args)) = config.build_command.split_first() else {
        miette::bail!("Build command is empty");
    };

    debug!(command = ?config.build_command, "Running build command");
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to launch build command '{program}'"))?;

    if !status.success() {
        miette::bail!(
            "Build command '{}' exited with {status}",
            config.build_command.join(" ")
        );
    }

    info!("Build succeeded");
    Ok(())
}
