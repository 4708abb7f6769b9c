// src/core/shell_resolver.rs

use crate::{
    constants::{COMSPEC_VAR, DEFAULT_CMD_SHELL, DEFAULT_POSIX_SHELL},
    models::{ShellChoice, ShellKind},
};

/// Picks the shell for an invocation.
///
/// Priority, highest first:
/// 1. `explicit_shell` (user override),
/// 2. `project_default_shell` (declared by the manifest),
/// 3. on Windows hosts, `COMSPEC` from `get_env`, falling back to `cmd`,
/// 4. `sh` everywhere else.
///
/// Pure: the host and environment are inputs, so this never fails and never touches the process.
pub fn resolve<F>(
    explicit_shell: Option<&str>,
    project_default_shell: Option<&str>,
    is_windows_host: bool,
    get_env: F,
) -> ShellChoice
where
    F: Fn(&str) -> Option<String>,
{
    let path = match explicit_shell.or(project_default_shell) {
        Some(shell) => shell.to_string(),
        None if is_windows_host => {
            get_env(COMSPEC_VAR).unwrap_or_else(|| DEFAULT_CMD_SHELL.to_string())
        }
        None => DEFAULT_POSIX_SHELL.to_string(),
    };

    let kind = classify(&path);
    log::debug!("Resolved script shell '{}' ({:?})", path, kind);
    ShellChoice { path, kind }
}

/// A shell is cmd-style when its basename is `cmd` or `cmd.exe`, ignoring case.
///
/// Both separators are stripped regardless of host, so `C:\Windows\System32\cmd.exe`
/// classifies the same on every platform.
pub fn classify(shell_path: &str) -> ShellKind {
    let basename = shell_path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(shell_path);

    if basename.eq_ignore_ascii_case("cmd") || basename.eq_ignore_ascii_case("cmd.exe") {
        ShellKind::Cmd
    } else {
        ShellKind::Posix
    }
}
