// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Per-file progress reporting and the run summary.
//!
//! Outcomes arrive in discovery order and are printed as they arrive, so
//! the progress log is diffable across runs over an unchanged tree.

use camino::{Utf8Path, Utf8PathBuf};

use crate::discover::FixturePair;
use crate::parse_runner::ParseOutcome;

const RULE: &str = "==================================================";

/// Counts and ordered pairs for a completed (or in-progress) run.
#[derive(Debug, Default)]
pub struct RunSummary {
    success: usize,
    failed: usize,
    processed: Vec<FixturePair>,
}

impl RunSummary {
    pub fn success_count(&self) -> usize {
        self.success
    }

    pub fn failed_count(&self) -> usize {
        self.failed
    }

    /// Pairs in the order they were processed (discovery order).
    pub fn processed(&self) -> &[FixturePair] {
        &self.processed
    }

    /// Whether the run should exit 0.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, pair: FixturePair, outcome: &ParseOutcome) {
        match outcome {
            ParseOutcome::Success => self.success += 1,
            ParseOutcome::Failure { .. } => self.failed += 1,
        }
        self.processed.push(pair);
    }
}

/// Prints the progress log and accumulates the [`RunSummary`].
#[derive(Debug, Default)]
pub struct Reporter {
    summary: RunSummary,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn banner(&self) {
        println!("{RULE}");
        println!("Regenerating All Syntax Test Fixtures");
        println!("{RULE}");
        println!();
    }

    pub fn build_started(&self) {
        println!("Step 1: Building parser...");
    }

    pub fn build_succeeded(&self) {
        println!("✓ Build complete");
        println!();
    }

    pub fn build_failed(&self) {
        println!("✗ Build failed");
    }

    pub fn discovered(&self, count: usize) {
        println!("Step 2: Found {count} test files");
        println!();
    }

    pub fn processing(&self, pair: &FixturePair) {
        println!("Processing: {}", display_path(&pair.input));
    }

    /// Print the outcome lines for one pair and fold it into the summary.
    pub fn record(&mut self, pair: FixturePair, outcome: &ParseOutcome) {
        match outcome {
            ParseOutcome::Success => {
                println!("  ✓ Generated: {}", display_path(&pair.output));
            }
            ParseOutcome::Failure { message } => {
                println!("  ✗ Failed to parse");
                println!("    Error: {message}");
            }
        }
        println!();
        self.summary.record(pair, outcome);
    }

    /// Print the summary block and hand back the finished summary.
    pub fn finish(self) -> RunSummary {
        println!("{RULE}");
        println!("Summary:");
        println!("  Success: {}", self.summary.success_count());
        println!("  Failed:  {}", self.summary.failed_count());
        println!("{RULE}");

        if self.summary.is_success() {
            println!();
            println!("All fixtures regenerated successfully! ✓");
        }

        self.summary
    }
}

/// Display a path relative to the working directory when it lives inside it.
fn display_path(path: &Utf8Path) -> Utf8PathBuf {
    let Ok(cwd) = std::env::current_dir() else {
        return path.to_path_buf();
    };
    let Ok(cwd) = Utf8PathBuf::from_path_buf(cwd) else {
        return path.to_path_buf();
    };
    path.strip_prefix(&cwd)
        .map_or_else(|_| path.to_path_buf(), Utf8Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(name: &str) -> FixturePair {
        FixturePair::for_input(Utf8PathBuf::from(name))
    }

    fn failure(message: &str) -> ParseOutcome {
        ParseOutcome::Failure {
            message: message.to_string(),
        }
    }

    #[test]
    fn summary_counts_every_outcome_once() {
        let mut reporter = Reporter::new();
        reporter.record(pair("a/x.td"), &ParseOutcome::Success);
        reporter.record(pair("a/y.td"), &failure("boom"));
        reporter.record(pair("b/z.td"), &ParseOutcome::Success);

        let summary = reporter.finish();
        assert_eq!(summary.success_count(), 2);
        assert_eq!(summary.failed_count(), 1);
        assert_eq!(summary.processed().len(), 3);
        assert!(!summary.is_success());
    }

    #[test]
    fn processed_pairs_keep_arrival_order() {
        let mut reporter = Reporter::new();
        reporter.record(pair("b/z.td"), &ParseOutcome::Success);
        reporter.record(pair("a/x.td"), &ParseOutcome::Success);

        let summary = reporter.finish();
        let inputs: Vec<&str> = summary
            .processed()
            .iter()
            .map(|p| p.input.as_str())
            .collect();
        assert_eq!(inputs, ["b/z.td", "a/x.td"]);
    }

    #[test]
    fn empty_run_is_a_success() {
        let summary = Reporter::new().finish();
        assert_eq!(summary.success_count(), 0);
        assert_eq!(summary.failed_count(), 0);
        assert!(summary.is_success());
    }

    #[test]
    fn paths_outside_the_cwd_are_displayed_as_is() {
        let path = Utf8Path::new("/definitely/not/under/cwd/x.td");
        assert_eq!(display_path(path), path);
    }

    #[test]
    fn paths_under_the_cwd_are_relativized() {
        let cwd = Utf8PathBuf::from_path_buf(std::env::current_dir().unwrap()).unwrap();
        let inside = cwd.join("fixtures/x.td");
        assert_eq!(display_path(&inside), Utf8PathBuf::from("fixtures/x.td"));
    }
}
