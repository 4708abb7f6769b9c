// src/core/command_group.rs

use crate::{
    CancellationToken,
    constants::{CANCELLED_EXIT_CODE, ENV_PSEUDO_SCRIPT, SCRIPT_NAME_VAR},
    core::{orchestrator::ScriptRunner, quoting::QuoteError},
    models::{ScriptMap, ShellKind},
    system::executor::{self, ExecutionContext, ExecutionError},
};
use colored::*;
use std::io::Write;

// --- Command Group Assembly ---

/// What the splitter is currently inside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nesting {
    SingleQuote,
    DoubleQuote,
    Backtick,
    Paren,
    Brace,
}

/// Splits a script's text into its `&&`-chained steps.
///
/// Only top-level `&&` is a boundary. Quotes, escapes, parenthesised groups and
/// `$(...)`/`${...}` expansions nest, so a quote inside a substitution inside a
/// double-quoted word is tracked as its own level. Quote and escape rules follow
/// `kind`: POSIX knows `'`, `"`, backticks and `\`; cmd only knows `"` and `^`.
/// Text that is still open at the end (an unbalanced quote or group) is not split
/// at all and goes to the shell whole. Empty steps are dropped, so an empty script
/// yields no steps.
pub fn split_command_group(raw: &str, kind: ShellKind) -> Vec<String> {
    let mut steps = Vec::new();
    let mut current = String::with_capacity(raw.len());
    let mut stack: Vec<Nesting> = Vec::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        let inside = stack.last().copied();

        match kind {
            ShellKind::Posix => match (inside, c) {
                (Some(Nesting::SingleQuote), '\'') => {
                    stack.pop();
                }
                (Some(Nesting::SingleQuote), _) => {}
                (_, '\\') => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                (Some(Nesting::DoubleQuote), '"') | (Some(Nesting::Backtick), '`') => {
                    stack.pop();
                }
                (Some(Nesting::Backtick), _) => {}
                (_, '`') => stack.push(Nesting::Backtick),
                (_, '$') => match chars.peek() {
                    Some('(') => {
                        current.push('(');
                        chars.next();
                        stack.push(Nesting::Paren);
                    }
                    Some('{') => {
                        current.push('{');
                        chars.next();
                        stack.push(Nesting::Brace);
                    }
                    _ => {}
                },
                (Some(Nesting::DoubleQuote), _) => {}
                (_, '\'') => stack.push(Nesting::SingleQuote),
                (_, '"') => stack.push(Nesting::DoubleQuote),
                (_, '(') => stack.push(Nesting::Paren),
                (Some(Nesting::Paren), ')') | (Some(Nesting::Brace), '}') => {
                    stack.pop();
                }
                (None, '&') if chars.peek() == Some(&'&') => {
                    chars.next();
                    current.pop();
                    push_step(&mut steps, &mut current);
                }
                _ => {}
            },
            ShellKind::Cmd => match (inside, c) {
                (Some(Nesting::DoubleQuote), '"') => {
                    stack.pop();
                }
                (Some(Nesting::DoubleQuote), _) => {}
                (_, '^') => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                (_, '"') => stack.push(Nesting::DoubleQuote),
                (_, '(') => stack.push(Nesting::Paren),
                (Some(Nesting::Paren), ')') => {
                    stack.pop();
                }
                (None, '&') if chars.peek() == Some(&'&') => {
                    chars.next();
                    current.pop();
                    push_step(&mut steps, &mut current);
                }
                _ => {}
            },
        }
    }

    if !stack.is_empty() {
        log::debug!("Unbalanced {:?} in {:?}; running it as a single step.", stack, raw);
        steps.clear();
        current.clear();
        current.push_str(raw);
    }
    push_step(&mut steps, &mut current);
    steps
}

fn push_step(steps: &mut Vec<String>, current: &mut String) {
    let step = current.trim();
    if !step.is_empty() {
        steps.push(step.to_string());
    }
    current.clear();
}

/// Splits `raw` and appends the escaped `extra_args` to the last step only.
pub fn build_command_group(
    raw: &str,
    extra_args: &[String],
    kind: ShellKind,
) -> Result<Vec<String>, QuoteError> {
    let mut steps = split_command_group(raw, kind);
    if extra_args.is_empty() {
        return Ok(steps);
    }

    let forwarded = kind.join_args(extra_args)?;
    match steps.last_mut() {
        Some(last) => {
            last.push(' ');
            last.push_str(&forwarded);
        }
        None => steps.push(forwarded),
    }
    Ok(steps)
}

// --- Runner ---

/// Runs one named script: each step through the shell, in order, stopping at the first non-zero exit.
#[derive(Debug)]
pub struct CommandGroupRunner<'a> {
    scripts: &'a ScriptMap,
    context: &'a ExecutionContext,
    echo: bool,
}

impl<'a> CommandGroupRunner<'a> {
    pub fn new(scripts: &'a ScriptMap, context: &'a ExecutionContext) -> Self {
        Self {
            scripts,
            context,
            echo: true,
        }
    }

    /// Whether each step is printed before it runs.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// The built-in `env`: what a child would see, written to `out`.
    fn print_environment<W: Write>(&self, out: &mut W, script_name: &str) -> Result<i32, ExecutionError> {
        let mut overlay = self.context.env().clone();
        overlay.insert(SCRIPT_NAME_VAR.to_string(), script_name.to_string());
        executor::write_environment(out, &overlay)?;
        Ok(0)
    }
}

impl ScriptRunner for CommandGroupRunner<'_> {
    async fn run_script(
        &self,
        name: &str,
        extra_args: &[String],
        cancellation_token: &CancellationToken,
    ) -> Result<i32, ExecutionError> {
        let Some(raw) = self.scripts.get(name) else {
            if name == ENV_PSEUDO_SCRIPT {
                log::debug!("'{}' is not declared; printing the environment.", name);
                return self.print_environment(&mut std::io::stdout().lock(), name);
            }
            return Err(ExecutionError::UnknownScript(name.to_string()));
        };

        let steps = build_command_group(raw, extra_args, self.context.shell().kind)?;
        log::debug!("Script '{}' has {} step(s): {:?}", name, steps.len(), steps);

        for step in &steps {
            if cancellation_token.is_cancelled() {
                return Ok(CANCELLED_EXIT_CODE);
            }
            if self.echo {
                println!("{} {}", "→".blue(), step.green());
            }

            match executor::execute_in_shell(name, step, self.context, cancellation_token).await {
                Ok(0) => {}
                Ok(code) => {
                    log::debug!("Step '{}' exited with {}; skipping the rest of '{}'.", step, code, name);
                    return Ok(code);
                }
                Err(ExecutionError::Cancelled) => return Ok(CANCELLED_EXIT_CODE),
                Err(e) => return Err(e),
            }
        }

        Ok(0)
    }
}
