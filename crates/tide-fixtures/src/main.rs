// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Entry point for the `regen-fixtures` command.
//!
//! The command takes no arguments; see [`tide_fixtures::config`] for the
//! environment variables that override the defaults. Exit code 0 means the
//! build succeeded and every discovered fixture parsed; anything else exits 1.

use clap::Parser;
use miette::Result;

use tide_fixtures::config::RegenConfig;
use tide_fixtures::report::{Reporter, RunSummary};
use tide_fixtures::{discover, parse_runner, parser_build};

/// Regenerate golden AST fixtures from `.td` test-definition files.
#[derive(Debug, Parser)]
#[command(name = "regen-fixtures")]
#[command(version, about, long_about = None)]
struct Cli {}

fn main() -> Result<()> {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    init_logging();
    let _cli = Cli::parse();

    match run() {
        Ok(summary) if summary.is_success() => std::process::exit(0),
        Ok(_) => std::process::exit(1),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();
}

/// Build → discover → regenerate each fixture → summarize.
///
/// Only run-level problems (configuration, build failure, unusable fixtures
/// root) surface as `Err`; per-file failures are folded into the summary and
/// the run keeps going.
fn run() -> Result<RunSummary> {
    let config = RegenConfig::from_env()?;
    let mut reporter = Reporter::new();
    reporter.banner();

    reporter.build_started();
    if let Err(e) = parser_build::run_build(&config) {
        reporter.build_failed();
        return Err(e);
    }
    reporter.build_succeeded();

    let pairs = discover::discover_fixtures(&config.fixtures_dir)?;
    reporter.discovered(pairs.len());

    for pair in pairs {
        reporter.processing(&pair);
        let outcome = parse_runner::regenerate_fixture(&pair, &config);
        reporter.record(pair, &outcome);
    }

    Ok(reporter.finish())
}
