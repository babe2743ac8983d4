//! CLI entry point for jss-static-group.
//!
//! Searches a Jamf Pro server with one or more `/match` queries and creates
//! a static group from the deduplicated results.
//!
//! Exit codes:
//! - 0: group created
//! - 1: usage, I/O, network or server error (including a name conflict)
//! - 2: the searches matched no devices

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jss_static_group::cli::{Cli, RunConfig};
use jss_static_group::client::JssClient;
use jss_static_group::credentials::TerminalPrompt;
use jss_static_group::error::{EXIT_FAILURE, JssError, Result};
use jss_static_group::run::{GroupCreated, create_group_from_search};

/// Logs go to stderr so stdout carries only progress and the result.
/// `RUST_LOG` overrides the level picked from `--verbose`.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={level}", env!("CARGO_CRATE_NAME"))));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(config: RunConfig) -> Result<GroupCreated> {
    let client = JssClient::new(&config.server_url, &config.credentials)?;
    create_group_from_search(
        &client,
        config.device_type,
        &config.search_terms,
        &config.group_name,
    )
    .await
}

/// Exit code for a failed argument parse.
///
/// clap's own code for usage errors is 2, which is reserved for "no results"
/// here. Help and version output go to stdout and exit 0; everything clap
/// reports on stderr (including the help printed when no arguments are
/// given) exits 1.
fn parse_error_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() { EXIT_FAILURE } else { 0 }
}

/// Exit code for the outcome of a resolved run.
fn outcome_exit_code(outcome: &Result<GroupCreated>) -> u8 {
    match outcome {
        Ok(_) => 0,
        Err(e) => e.exit_code(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(parse_error_exit_code(&e));
        }
    };

    init_tracing(cli.verbose);

    let outcome = match cli.resolve(&mut TerminalPrompt) {
        Ok(config) => run(config).await,
        Err(e) => Err(e),
    };

    match &outcome {
        Ok(created) => println!(
            "the new Static Group has been created with ID: {} ({} member(s))",
            created.group_id, created.member_count
        ),
        Err(e @ JssError::NoResults) => println!("{e}"),
        Err(e) => {
            eprintln!("Error: {e}");
            if matches!(e, JssError::ServerRejected { .. } | JssError::Unreachable(_)) {
                eprintln!("check the URL used and try again");
            }
        }
    }
    ExitCode::from(outcome_exit_code(&outcome))
}
