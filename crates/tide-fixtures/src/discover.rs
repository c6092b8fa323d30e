// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fixture discovery.
//!
//! Recursively enumerates `.td` test-definition files under the fixtures
//! root and pairs each with its derived artifact path. The result is sorted
//! lexicographically by path so repeated runs over an unchanged tree process
//! files in an identical, diffable sequence.

use camino::{Utf8Path, Utf8PathBuf};
use miette::{Context, IntoDiagnostic, Result};
use std::fs;
use tracing::debug;

/// Extension of test-definition input files.
pub const FIXTURE_EXTENSION: &str = "td";

/// Extension of the serialized AST artifact written next to each input.
pub const ARTIFACT_EXTENSION: &str = "ast.json";

/// An input file and its derived output artifact path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixturePair {
    /// The `.td` test-definition file.
    pub input: Utf8PathBuf,
    /// The sibling `.ast.json` artifact the run will (over)write.
    pub output: Utf8PathBuf,
}

impl FixturePair {
    /// Derive the pair for an input path. Pure; touches no filesystem state.
    pub fn for_input(input: Utf8PathBuf) -> Self {
        let output = input.with_extension(ARTIFACT_EXTENSION);
        Self { input, output }
    }
}

/// Find all fixture inputs under `root`, in lexicographic path order.
///
/// An empty tree is not an error. A missing (or non-directory) root is: it
/// aborts the run before any fixture is processed.
///
/// # Errors
///
/// Returns an error if `root` is not a directory or a subdirectory cannot
/// be read.
pub fn discover_fixtures(root: &Utf8Path) -> Result<Vec<FixturePair>> {
    if !root.is_dir() {
        miette::bail!("Fixtures root '{root}' does not exist or is not a directory");
    }

    let mut inputs = Vec::new();
    collect_td_files_recursive(root, &mut inputs)?;
    inputs.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    debug!(count = inputs.len(), "Discovered fixture inputs");
    Ok(inputs.into_iter().map(FixturePair::for_input).collect())
}

/// Recursively collect all `.td` files from a directory tree.
///
/// Symlinks are skipped to avoid potential infinite recursion from circular
/// links.
fn collect_td_files_recursive(dir: &Utf8Path, files: &mut Vec<Utf8PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read directory '{dir}'"))?
    {
        let entry = entry.into_diagnostic()?;
        let file_type = entry.file_type().into_diagnostic()?;
        if file_type.is_symlink() {
            continue;
        }
        let entry_path = Utf8PathBuf::from_path_buf(entry.path())
            .map_err(|_| miette::miette!("Non-UTF-8 path"))?;

        if file_type.is_dir() {
            collect_td_files_recursive(&entry_path, files)?;
        } else if file_type.is_file() && entry_path.extension() == Some(FIXTURE_EXTENSION) {
            files.push(entry_path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &std::path::Path, relative: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn root_path(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn pair_derivation_replaces_the_extension() {
        let pair = FixturePair::for_input(Utf8PathBuf::from("fixtures/exprs/call.td"));
        assert_eq!(pair.output, Utf8PathBuf::from("fixtures/exprs/call.ast.json"));
    }

    #[test]
    fn discovery_is_recursive_and_sorted() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "b/z.td");
        touch(temp.path(), "a/y.td");
        touch(temp.path(), "a/x.td");

        let pairs = discover_fixtures(&root_path(&temp)).unwrap();
        let inputs: Vec<String> = pairs
            .iter()
            .map(|p| p.input.strip_prefix(root_path(&temp)).unwrap().to_string())
            .collect();

        assert_eq!(inputs, ["a/x.td", "a/y.td", "b/z.td"]);
    }

    #[test]
    fn non_fixture_files_are_ignored() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "case.td");
        touch(temp.path(), "case.ast.json");
        touch(temp.path(), "notes.md");

        let pairs = discover_fixtures(&root_path(&temp)).unwrap();
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].input.as_str().ends_with("case.td"));
    }

    #[test]
    fn empty_tree_yields_an_empty_sequence() {
        let temp = TempDir::new().unwrap();
        let pairs = discover_fixtures(&root_path(&temp)).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = root_path(&temp).join("does-not-exist");
        assert!(discover_fixtures(&missing).is_err());
    }
}
