// src/models.rs

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

// --- RUNTIME MODELS ---

/// Script name to raw command string, as declared by the project.
///
/// A `BTreeMap` keeps listings deterministic. Never mutated during a run.
pub type ScriptMap = BTreeMap<String, String>;

/// The two shell families whose invocation and quoting rules differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellKind {
    /// The Windows command interpreter (`cmd`, `cmd.exe`).
    Cmd,
    /// Anything else is treated as a POSIX `sh`-compatible shell.
    Posix,
}

/// The shell chosen for an invocation. Resolved once, reused for every sub-command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellChoice {
    pub path: String,
    pub kind: ShellKind,
}

impl ShellChoice {
    pub fn is_cmd_style(&self) -> bool {
        self.kind == ShellKind::Cmd
    }
}

/// A requested script name paired with whether it can be run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScriptEntry {
    pub name: String,
    pub exists: bool,
}

/// The result of one script that actually executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub script_name: String,
    pub exit_code: i32,
}

/// What a whole invocation produced: the process exit code and every executed script, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOutcome {
    pub exit_code: i32,
    pub records: Vec<RunRecord>,
}

/// The caller's request: scripts in execution order, tolerance, and trailing arguments.
#[derive(Debug, Clone, Default)]
pub struct ScriptRequest {
    pub scripts: Vec<String>,
    pub if_present: bool,
    /// Forwarded to the last sub-command of every script that runs.
    pub extra_args: Vec<String>,
}

/// A project as produced by the manifest loader.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    /// The directory containing the manifest; scripts run here.
    pub root: PathBuf,
    pub manifest_path: PathBuf,
    pub scripts: ScriptMap,
    /// The shell the project asks for, if any.
    pub script_shell: Option<String>,
}

// --- MANIFEST MODELS (What is read from the project files) ---

/// `nrun.toml`
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct NrunManifest {
    pub script_shell: Option<String>,
    #[serde(default)]
    pub scripts: ScriptMap,
}

/// The subset of `package.json` this tool reads. Other fields are ignored.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct PackageManifest {
    #[serde(default)]
    pub scripts: ScriptMap,
    #[serde(default, rename = "scriptShell")]
    pub script_shell: Option<String>,
}

// --- USER SETTINGS (`<config_dir>/nrun/config.toml`) ---

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Shell used when neither `--shell` nor `NRUN_SCRIPT_SHELL` is given. `~` and `$VAR` are expanded.
    pub script_shell: Option<String>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub silent: bool,
}
