use crate::{
    CancellationToken,
    cli::{Cli, reporter::ConsoleReporter},
    core::{command_group::CommandGroupRunner, manifest, orchestrator, reporter::Reporter, shell_resolver},
    models::{ScriptRequest, Settings},
    system::executor::ExecutionContext,
};
use anyhow::{Context, Result};
use std::env;

/// Main entry point for a run. Returns the process exit code.
///
/// Loads the project, resolves the shell once, then hands the requested scripts
/// to the orchestrator. Only collaborator failures (manifest, working directory,
/// settings expansion) come back as `Err`; script failures are exit codes.
pub async fn handle(
    cli: Cli,
    settings: Settings,
    cancellation_token: &CancellationToken,
) -> Result<i32> {
    // 1. The start directory.
    let start_dir = match cli.cwd {
        Some(dir) => dir,
        None => env::current_dir().context("Could not determine the current directory")?,
    };

    // 2. The project manifest decides the working directory for every script.
    let project = manifest::load_project(&start_dir).await?;

    let verbose = cli.verbose || settings.verbose;
    let mut reporter = ConsoleReporter::stdio(&project.manifest_path);
    if verbose {
        reporter.banner(&project);
    }

    // 3. Resolve the shell exactly once for the whole invocation.
    let explicit_shell = match cli.shell {
        Some(shell) => Some(shell),
        None => settings.expanded_script_shell()?,
    };
    let shell = shell_resolver::resolve(
        explicit_shell.as_deref(),
        project.script_shell.as_deref(),
        cfg!(windows),
        |key| env::var(key).ok(),
    );
    if verbose {
        reporter.using_shell(&shell);
    }

    // 4. Run.
    let context = ExecutionContext::new(project.root.clone(), shell);
    let runner = CommandGroupRunner::new(&project.scripts, &context)
        .with_echo(!(cli.silent || settings.silent));
    let request = ScriptRequest {
        scripts: cli.scripts,
        if_present: cli.if_present,
        extra_args: cli.extra_args,
    };

    let outcome = orchestrator::run_all(
        &request,
        &project.scripts,
        &runner,
        &mut reporter,
        cancellation_token,
    )
    .await;
    log::debug!("Run records: {:?}", outcome.records);

    Ok(outcome.exit_code)
}
