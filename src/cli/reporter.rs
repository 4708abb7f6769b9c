// src/cli/reporter.rs

use crate::{
    core::{reporter::Reporter, script_set::MissingScriptsError},
    models::{LoadedProject, RunRecord, ScriptMap, ShellChoice},
    system::executor::ExecutionError,
};
use colored::*;
use std::fmt::Display;
use std::io::{self, Stderr, Stdout, Write};
use std::path::Path;

/// Renders run notifications for a terminal: progress to `out`, problems to `err`.
#[derive(Debug)]
pub struct ConsoleReporter<O: Write, E: Write> {
    out: O,
    err: E,
    manifest: String,
}

impl ConsoleReporter<Stdout, Stderr> {
    pub fn stdio(manifest_path: &Path) -> Self {
        Self::new(io::stdout(), io::stderr(), manifest_path)
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    pub fn new(out: O, err: E, manifest_path: &Path) -> Self {
        Self {
            out,
            err,
            manifest: manifest_path.display().to_string(),
        }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

/// A reporter must never abort a run, so write failures are only logged.
fn emit<W: Write>(sink: &mut W, line: impl Display) {
    if let Err(e) = writeln!(sink, "{}", line) {
        log::warn!("Could not write to the terminal: {}", e);
    }
}

impl<O: Write, E: Write> Reporter for ConsoleReporter<O, E> {
    fn banner(&mut self, project: &LoadedProject) {
        let text = format!(
            t!("report.banner"),
            version = env!("CARGO_PKG_VERSION"),
            manifest = project.manifest_path.display()
        );
        emit(&mut self.out, text.dimmed());
    }

    fn using_shell(&mut self, shell: &ShellChoice) {
        emit(
            &mut self.out,
            format!(t!("report.using_shell"), shell = shell.path).dimmed(),
        );
    }

    fn available_scripts(&mut self, scripts: &ScriptMap) {
        if scripts.is_empty() {
            emit(
                &mut self.out,
                format!(t!("report.no_scripts"), manifest = self.manifest).yellow(),
            );
            return;
        }

        emit(
            &mut self.out,
            format!(t!("report.available_scripts"), manifest = self.manifest).bold(),
        );
        for (name, command) in scripts {
            emit(&mut self.out, format!("  {}", name.cyan().bold()));
            emit(&mut self.out, format!("    {}", command.dimmed()));
        }
    }

    fn skipping(&mut self, name: &str) {
        emit(
            &mut self.out,
            format!(t!("report.skipping"), name = name).yellow(),
        );
    }

    fn missing_scripts(&mut self, error: &MissingScriptsError) {
        let names = error
            .names
            .iter()
            .map(|n| format!("\"{}\"", n))
            .collect::<Vec<_>>()
            .join(", ");
        emit(
            &mut self.err,
            format!(t!("report.missing"), names = names).red(),
        );
    }

    fn script_error(&mut self, name: &str, error: &ExecutionError) {
        emit(
            &mut self.err,
            format!(t!("report.script_error"), name = name, error = error).red(),
        );
    }

    fn script_failed(&mut self, record: &RunRecord) {
        emit(
            &mut self.err,
            format!(
                t!("report.failed"),
                name = record.script_name,
                code = record.exit_code
            )
            .red(),
        );
    }
}
