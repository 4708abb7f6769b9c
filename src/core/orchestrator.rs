//! # Script Sequence Orchestrator
//!
//! Drives one invocation: resolve the requested set, run each script in order,
//! stop at the first failure, then fold the records into a process exit code.
//!
//! ```text
//! Idle -> Resolving -> Aborted(missing)
//!                   -> Running -> StoppedOnFailure | Completed
//! ```
//!
//! An empty request never reaches `Resolving`: it means "list the scripts".

use crate::{
    CancellationToken,
    constants::CANCELLED_EXIT_CODE,
    core::{reporter::Reporter, script_set},
    models::{RunOutcome, RunRecord, ScriptMap, ScriptRequest},
    system::executor::ExecutionError,
};

/// Executes a single named script and yields its exit code.
///
/// The production implementation is `core::command_group::CommandGroupRunner`.
pub trait ScriptRunner {
    fn run_script(
        &self,
        name: &str,
        extra_args: &[String],
        cancellation_token: &CancellationToken,
    ) -> impl Future<Output = Result<i32, ExecutionError>>;
}

/// Runs the requested scripts strictly one after another.
///
/// Missing scripts abort with exit code 1 before anything runs, unless
/// `request.if_present` is set, in which case they are skipped. Once a script
/// exits non-zero (or cancellation fires) nothing further starts.
pub async fn run_all<R, P>(
    request: &ScriptRequest,
    scripts: &ScriptMap,
    runner: &R,
    reporter: &mut P,
    cancellation_token: &CancellationToken,
) -> RunOutcome
where
    R: ScriptRunner,
    P: Reporter + ?Sized,
{
    if request.scripts.is_empty() {
        log::debug!("No scripts requested; listing available scripts.");
        reporter.available_scripts(scripts);
        return RunOutcome::default();
    }

    log::debug!("Resolving requested scripts: {:?}", request.scripts);
    let entries = match script_set::resolve(&request.scripts, scripts, request.if_present) {
        Ok(entries) => entries,
        Err(missing) => {
            log::debug!("Aborted: {}", missing);
            reporter.missing_scripts(&missing);
            return RunOutcome {
                exit_code: 1,
                records: Vec::new(),
            };
        }
    };

    let mut records: Vec<RunRecord> = Vec::with_capacity(entries.len());
    let mut interrupted = false;
    for entry in &entries {
        if cancellation_token.is_cancelled() {
            log::debug!("Cancelled; '{}' will not start.", entry.name);
            interrupted = true;
            break;
        }
        if !entry.exists {
            reporter.skipping(&entry.name);
            continue;
        }

        log::debug!("Running script '{}'", entry.name);
        let exit_code = match runner
            .run_script(&entry.name, &request.extra_args, cancellation_token)
            .await
        {
            Ok(code) => code,
            Err(e) => {
                log::debug!("Script '{}' could not run: {}", entry.name, e);
                reporter.script_error(&entry.name, &e);
                1
            }
        };

        records.push(RunRecord {
            script_name: entry.name.clone(),
            exit_code,
        });

        if exit_code != 0 {
            log::debug!(
                "Stopped on failure: '{}' exited with {}",
                entry.name,
                exit_code
            );
            break;
        }
    }

    // Cancellation between two successful scripts still must not look like success.
    let exit_code = if interrupted && records.iter().all(|r| r.exit_code == 0) {
        CANCELLED_EXIT_CODE
    } else {
        aggregate_exit_code(&records, reporter)
    };
    log::debug!(
        "Run finished: {} script(s) executed, exit code {}",
        records.len(),
        exit_code
    );
    RunOutcome { exit_code, records }
}

/// A lone record passes its own code through untouched. Otherwise the run is 0 only
/// if every record is 0, and each failure is reported on its own line.
fn aggregate_exit_code<P: Reporter + ?Sized>(records: &[RunRecord], reporter: &mut P) -> i32 {
    if let [only] = records {
        return only.exit_code;
    }

    let mut exit_code = 0;
    for record in records.iter().filter(|r| r.exit_code != 0) {
        reporter.script_failed(record);
        exit_code = 1;
    }
    exit_code
}
