// src/core/reporter.rs

use crate::{
    core::script_set::MissingScriptsError,
    models::{LoadedProject, RunRecord, ScriptMap, ShellChoice},
    system::executor::ExecutionError,
};

/// Receives every user-facing notification of a run. Rendering is the implementor's business.
pub trait Reporter {
    /// Start-of-run banner. Only emitted in verbose mode.
    fn banner(&mut self, project: &LoadedProject);
    /// Only emitted in verbose mode.
    fn using_shell(&mut self, shell: &ShellChoice);
    /// Nothing was requested, so the available scripts are shown instead.
    fn available_scripts(&mut self, scripts: &ScriptMap);
    /// A missing script skipped under if-present tolerance.
    fn skipping(&mut self, name: &str);
    /// The run was aborted before anything executed.
    fn missing_scripts(&mut self, error: &MissingScriptsError);
    /// A script could not be executed at all (as opposed to exiting non-zero).
    fn script_error(&mut self, name: &str, error: &ExecutionError);
    /// One failing record of a multi-script run.
    fn script_failed(&mut self, record: &RunRecord);
}

