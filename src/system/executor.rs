// src/system/executor.rs

use crate::{
    CancellationToken,
    constants::{INIT_CWD_VAR, SCRIPT_NAME_VAR},
    core::quoting::QuoteError,
    models::{ShellChoice, ShellKind},
};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Script '{0}' is not declared by the project.")]
    UnknownScript(String),
    #[error("Could not build the command line: {0}")]
    Quote(#[from] QuoteError),
    #[error("Shell '{shell}' could not be started: {source}")]
    Spawn {
        shell: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed while waiting for the shell to exit: {0}")]
    Wait(#[source] std::io::Error),
    #[error("Could not write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("Operation was cancelled by the user.")]
    Cancelled,
}

/// Read-only state shared by every child of one invocation.
///
/// `INIT_CWD` lives here instead of in the process environment, so nothing
/// leaks between runs (or between tests).
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    working_dir: PathBuf,
    shell: ShellChoice,
    env: BTreeMap<String, String>,
}

impl ExecutionContext {
    pub fn new(working_dir: impl Into<PathBuf>, shell: ShellChoice) -> Self {
        let working_dir = working_dir.into();
        let mut env = BTreeMap::new();
        env.insert(
            INIT_CWD_VAR.to_string(),
            dunce::simplified(&working_dir).display().to_string(),
        );
        Self {
            working_dir,
            shell,
            env,
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn shell(&self) -> &ShellChoice {
        &self.shell
    }

    /// Variables layered over the inherited process environment.
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }
}

/// Runs one sub-command through the resolved shell and returns its exit code.
///
/// The child inherits stdin/stdout/stderr untouched. The wait is a `select!` between
/// the child and the cancellation token; on cancellation the child is killed and
/// `ExecutionError::Cancelled` is returned.
pub async fn execute_in_shell(
    script_name: &str,
    command_text: &str,
    context: &ExecutionContext,
    cancellation_token: &CancellationToken,
) -> Result<i32, ExecutionError> {
    if cancellation_token.is_cancelled() {
        return Err(ExecutionError::Cancelled);
    }

    let shell = &context.shell;
    let mut command = Command::new(&shell.path);
    command.args(shell.kind.invocation_flags());
    push_command_text(&mut command, shell.kind, command_text);
    command
        .current_dir(dunce::simplified(&context.working_dir))
        .envs(&context.env)
        .env(SCRIPT_NAME_VAR, script_name)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|source| ExecutionError::Spawn {
        shell: shell.path.clone(),
        source,
    })?;
    log::debug!(
        "Spawned '{}' for script '{}' (PID: {:?}): {}",
        shell.path,
        script_name,
        child.id(),
        command_text
    );

    tokio::select! {
        status = child.wait() => {
            let code = exit_code_of(status.map_err(ExecutionError::Wait)?);
            log::debug!("Child for script '{}' exited with {}", script_name, code);
            Ok(code)
        }
        () = cancellation_token.cancelled() => {
            log::debug!(
                "Cancellation requested, killing child process (PID: {:?})...",
                child.id()
            );
            if let Err(e) = child.kill().await {
                log::warn!("Failed to kill child process: {}", e);
            }
            Err(ExecutionError::Cancelled)
        }
    }
}

/// `cmd` needs its pre-quoted text appended verbatim; Rust's own argv escaping would
/// turn the inner quotes into `\"`, which `cmd` does not understand.
#[cfg(windows)]
fn push_command_text(command: &mut Command, kind: ShellKind, text: &str) {
    match kind {
        ShellKind::Cmd => {
            command.raw_arg(&*kind.quote_command(text));
        }
        ShellKind::Posix => {
            command.arg(text);
        }
    }
}

#[cfg(not(windows))]
fn push_command_text(command: &mut Command, _kind: ShellKind, text: &str) {
    command.arg(text);
}

/// Signal deaths on unix follow the shell convention of `128 + signal`.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Prints `NAME=value` lines for the process environment with `overlay` applied, sorted by name.
pub fn write_environment<W: Write>(
    out: &mut W,
    overlay: &BTreeMap<String, String>,
) -> std::io::Result<()> {
    let mut vars: BTreeMap<String, String> = std::env::vars_os()
        .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
        .collect();
    vars.extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));

    for (key, value) in &vars {
        writeln!(out, "{}={}", key, value)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shell_resolver;
    use std::time::{Duration, Instant};

    #[test]
    fn test_context_sets_init_cwd() {
        let ctx = ExecutionContext::new("/work/project", shell_resolver::resolve(None, None, false, |_| None));
        assert_eq!(ctx.env().get(INIT_CWD_VAR).map(String::as_str), Some("/work/project"));
        assert_eq!(ctx.working_dir(), Path::new("/work/project"));
    }

    #[test]
    fn test_write_environment_applies_overlay_sorted() {
        let mut overlay = BTreeMap::new();
        overlay.insert("ZZ_NRUN_TEST".to_string(), "last".to_string());
        overlay.insert("AA_NRUN_TEST".to_string(), "first".to_string());

        let mut out = Vec::new();
        write_environment(&mut out, &overlay).unwrap();
        let text = String::from_utf8(out).unwrap();

        let first = text.find("AA_NRUN_TEST=first").expect("overlay var printed");
        let last = text.find("ZZ_NRUN_TEST=last").expect("overlay var printed");
        assert!(first < last);
        assert!(text.lines().all(|line| line.contains('=')));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;

        fn sh_context(dir: &Path) -> ExecutionContext {
            ExecutionContext::new(dir, shell_resolver::resolve(None, None, false, |_| None))
        }

        #[tokio::test]
        async fn test_exit_codes_are_propagated() {
            let dir = tempfile::tempdir().unwrap();
            let ctx = sh_context(dir.path());
            let token = CancellationToken::new();

            assert_eq!(execute_in_shell("ok", "true", &ctx, &token).await.unwrap(), 0);
            assert_eq!(execute_in_shell("bad", "exit 3", &ctx, &token).await.unwrap(), 3);
        }

        #[tokio::test]
        async fn test_child_runs_in_working_dir_with_init_cwd() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
            let ctx = sh_context(dir.path());
            let token = CancellationToken::new();

            let expected = dir.path().display().to_string();
            let check = format!(r#"test -f marker.txt && test "$INIT_CWD" = '{}'"#, expected);
            assert_eq!(execute_in_shell("check", &check, &ctx, &token).await.unwrap(), 0);
        }

        #[tokio::test]
        async fn test_script_name_is_exported() {
            let dir = tempfile::tempdir().unwrap();
            let ctx = sh_context(dir.path());
            let token = CancellationToken::new();

            let code = execute_in_shell("lint", r#"test "$NRUN_SCRIPT_NAME" = lint"#, &ctx, &token)
                .await
                .unwrap();
            assert_eq!(code, 0);
        }

        #[tokio::test]
        async fn test_signal_death_maps_to_128_plus_signal() {
            let dir = tempfile::tempdir().unwrap();
            let ctx = sh_context(dir.path());
            let token = CancellationToken::new();

            let code = execute_in_shell("die", "kill -9 $$", &ctx, &token).await.unwrap();
            assert_eq!(code, 137);
        }

        #[tokio::test]
        async fn test_missing_shell_is_a_spawn_error() {
            let dir = tempfile::tempdir().unwrap();
            let shell = shell_resolver::resolve(Some("/definitely/not/a/shell"), None, false, |_| None);
            let ctx = ExecutionContext::new(dir.path(), shell);
            let token = CancellationToken::new();

            let err = execute_in_shell("x", "true", &ctx, &token).await.unwrap_err();
            assert!(matches!(err, ExecutionError::Spawn { .. }));
        }

        #[tokio::test]
        async fn test_cancellation_kills_running_child() {
            let dir = tempfile::tempdir().unwrap();
            let ctx = sh_context(dir.path());
            let token = CancellationToken::new();

            let canceller = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                canceller.cancel();
            });

            let started = Instant::now();
            let err = execute_in_shell("slow", "sleep 10", &ctx, &token).await.unwrap_err();
            assert!(matches!(err, ExecutionError::Cancelled));
            assert!(started.elapsed() < Duration::from_secs(5));
        }

        #[tokio::test]
        async fn test_already_cancelled_token_spawns_nothing() {
            let dir = tempfile::tempdir().unwrap();
            let ctx = sh_context(dir.path());
            let token = CancellationToken::new();
            token.cancel();

            let err = execute_in_shell("x", "touch should_not_exist", &ctx, &token)
                .await
                .unwrap_err();
            assert!(matches!(err, ExecutionError::Cancelled));
            assert!(!dir.path().join("should_not_exist").exists());
        }
    }
}
