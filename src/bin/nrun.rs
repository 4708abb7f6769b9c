// src/bin/nrun.rs

use clap::Parser;
use colored::*;
use nrun::{
    CancellationToken,
    cli::{Cli, handlers},
    models::Settings,
};

/// The main entry point of the `nrun` application.
/// It sets up logging and Ctrl+C handling, runs the requested scripts,
/// and performs centralized error handling.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => fail(&e),
    };
    init_logging(cli.verbose || settings.verbose);
    log::debug!("CLI args parsed: {:?}", cli);

    // A single token for the whole invocation; Ctrl+C fires it and the executor
    // kills whatever child is running.
    let cancellation_token = CancellationToken::new();
    let signal_token = cancellation_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::debug!("Ctrl+C received; cancelling.");
            signal_token.cancel();
        }
    });

    match handlers::run::handle(cli, settings, &cancellation_token).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => fail(&e),
    }
}

/// `RUST_LOG` always wins; otherwise warnings only, or debug output with `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Prints a formatted message to stderr and exits with a failure code.
fn fail(error: &anyhow::Error) -> ! {
    eprintln!("\n{}: {:#}", "Error".red().bold(), error);
    std::process::exit(1);
}
