// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Per-file parse execution and artifact writing.
//!
//! Each fixture is parsed by a freshly launched parser process so that a
//! crash, hang, or runaway allocation on one malformed input cannot take
//! down the rest of the run, and no parser state leaks between files. The
//! child receives the source text on stdin and must print the AST as JSON
//! on stdout; whatever it prints on stderr becomes the failure message when
//! it exits non-zero.
//!
//! The artifact is not the child's stdout verbatim: the JSON is parsed and
//! re-serialized pretty-printed with sorted keys and exactly one trailing
//! newline, so artifact bytes never depend on how the parser formats its
//! output. Writes go through a temporary file in the destination directory
//! and are renamed into place; a failure at any stage leaves an existing
//! artifact untouched.

use camino::Utf8Path;
use serde_json::Value;
use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use crate::config::RegenConfig;
use crate::discover::FixturePair;

/// Sleep between child status polls while waiting on the deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Result of regenerating one fixture. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The artifact was written.
    Success,
    /// Nothing was written; `message` is shown in the report.
    Failure {
        /// Human-readable reason, from the parser's stderr where available.
        message: String,
    },
}

impl ParseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }
}

/// Regenerate the artifact for one fixture pair.
///
/// Every error on this path — unreadable input, launch failure, parser
/// error, timeout, malformed output, write failure — is converted into a
/// [`ParseOutcome::Failure`] rather than propagated, so the caller always
/// continues with the next fixture.
#[instrument(skip_all, fields(input = %pair.input))]
pub fn regenerate_fixture(pair: &FixturePair, config: &RegenConfig) -> ParseOutcome {
    let source = match std::fs::read_to_string(&pair.input) {
        Ok(source) => source,
        Err(e) => return ParseOutcome::failure(format!("Cannot read '{}': {e}", pair.input)),
    };

    let stdout = match run_parser(&source, config) {
        Ok(stdout) => stdout,
        Err(message) => return ParseOutcome::Failure { message },
    };

    let ast: Value = match serde_json::from_str(&stdout) {
        Ok(ast) => ast,
        Err(e) => return ParseOutcome::failure(format!("Parser produced invalid JSON: {e}")),
    };

    match write_artifact(&pair.output, &ast) {
        Ok(()) => {
            debug!(artifact = %pair.output, "Wrote artifact");
            ParseOutcome::Success
        }
        Err(message) => ParseOutcome::Failure { message },
    }
}

/// Launch the parser, feed it `source`, and collect its stdout.
///
/// Returns the captured stdout on success, or the failure message (parser
/// stderr, launch error, or timeout) on failure.
fn run_parser(source: &str, config: &RegenConfig) -> Result<String, String> {
    let Some((program, args)) = config.parser_command.split_first() else {
        return Err("Parser command is empty".to_string());
    };

    let mut child = match Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return Err(format!("Failed to launch parser '{program}': {e}")),
    };

    // Feed the source from a separate thread: the child may exit (and close
    // its end of the pipe) before consuming all of it.
    let mut stdin = child.stdin.take().expect("parser stdin was piped");
    let source = source.to_owned();
    let stdin_thread = thread::spawn(move || {
        let _ = stdin.write_all(source.as_bytes());
    });

    // Drain both output pipes concurrently so a chatty parser cannot block
    // on a full pipe buffer while we wait for it to exit.
    let stdout_pipe = child.stdout.take().expect("parser stdout was piped");
    let stderr_pipe = child.stderr.take().expect("parser stderr was piped");
    let stdout_thread = thread::spawn(move || read_lossy(stdout_pipe));
    let stderr_thread = thread::spawn(move || read_lossy(stderr_pipe));

    let status = match wait_with_deadline(&mut child, config.parse_timeout) {
        Ok(status) => status,
        Err(message) => {
            // Kill before joining the readers so their pipes reach EOF.
            let _ = child.kill();
            let _ = child.wait();
            let _ = stdin_thread.join();
            let _ = stdout_thread.join();
            let _ = stderr_thread.join();
            return Err(message);
        }
    };

    let _ = stdin_thread.join();
    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();

    if status.success() {
        Ok(stdout)
    } else {
        let message = stderr.trim();
        if message.is_empty() {
            Err(format!("Parser exited with {status}"))
        } else {
            Err(message.to_string())
        }
    }
}

/// Wait for the child to exit, polling against the optional deadline.
fn wait_with_deadline(child: &mut Child, timeout: Option<Duration>) -> Result<ExitStatus, String> {
    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {}
            Err(e) => return Err(format!("Failed to wait for parser: {e}")),
        }
        if let Some(limit) = timeout {
            if started.elapsed() >= limit {
                return Err(format!("Parser timed out after {}s", limit.as_secs()));
            }
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn read_lossy(mut pipe: impl Read) -> String {
    let mut bytes = Vec::new();
    let _ = pipe.read_to_end(&mut bytes);
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Serialize the AST and atomically replace the artifact at `path`.
///
/// `serde_json`'s object maps are ordered, so the pretty-printed text is
/// canonical for a given AST. The file ends with exactly one newline.
fn write_artifact(path: &Utf8Path, ast: &Value) -> Result<(), String> {
    let mut text = serde_json::to_string_pretty(ast)
        .map_err(|e| format!("Cannot serialize AST: {e}"))?;
    text.push('\n');

    let dir = path.parent().unwrap_or_else(|| Utf8Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| format!("Cannot create temporary file in '{dir}': {e}"))?;
    tmp.write_all(text.as_bytes())
        .map_err(|e| format!("Cannot write '{path}': {e}"))?;
    tmp.persist(path)
        .map_err(|e| format!("Cannot write '{path}': {e}"))?;
    Ok(())
}
