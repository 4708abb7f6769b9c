// src/core/quoting.rs
//
// Per-shell invocation and escaping rules. Everything that builds text for a shell goes through here.

use crate::models::ShellKind;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Argument {0:?} contains a NUL byte and cannot be passed to a shell.")]
    NulByte(String),
    #[error("Argument {arg:?} cannot be quoted for a POSIX shell: {source}")]
    Posix {
        arg: String,
        #[source]
        source: shlex::QuoteError,
    },
}

/// Characters `cmd.exe` interprets outside of double quotes.
const CMD_METACHARACTERS: [char; 7] = ['^', '&', '|', '<', '>', '(', ')'];

/// Variable expansion markers. `cmd` expands `%VAR%` (and `!VAR!` under delayed
/// expansion) even inside double quotes, where a caret is literal.
const CMD_EXPANSION_CHARACTERS: [char; 2] = ['%', '!'];

impl ShellKind {
    /// The flags placed between the shell path and the command text.
    ///
    /// `cmd` gets `/d` (skip AutoRun), `/s` (strip exactly the outer quote pair) and `/c`.
    pub fn invocation_flags(self) -> &'static [&'static str] {
        match self {
            Self::Cmd => &["/d", "/s", "/c"],
            Self::Posix => &["-c"],
        }
    }

    /// Turns a sub-command into the argument handed to the shell.
    ///
    /// POSIX text is passed through untouched as one argv entry, since the script
    /// already carries correct `sh` quoting. For `cmd` the text is wrapped in one pair
    /// of double quotes which `/s` removes again, leaving inner quotes intact; the
    /// result must be appended verbatim (not re-escaped) by the process layer.
    pub fn quote_command(self, text: &str) -> Cow<'_, str> {
        match self {
            Self::Cmd => Cow::Owned(format!("\"{}\"", text)),
            Self::Posix => Cow::Borrowed(text),
        }
    }

    /// Escapes one forwarded argument so the shell sees it as a single literal word.
    pub fn escape_arg(self, arg: &str) -> Result<String, QuoteError> {
        if arg.contains('\0') {
            return Err(QuoteError::NulByte(arg.to_string()));
        }
        match self {
            Self::Cmd => Ok(escape_cmd_arg(arg)),
            Self::Posix => shlex::try_quote(arg)
                .map(Cow::into_owned)
                .map_err(|source| QuoteError::Posix {
                    arg: arg.to_string(),
                    source,
                }),
        }
    }

    /// Escapes every argument and joins them with single spaces.
    pub fn join_args(self, args: &[String]) -> Result<String, QuoteError> {
        let escaped = args
            .iter()
            .map(|arg| self.escape_arg(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(escaped.join(" "))
    }
}

/// Words with whitespace or quotes are double-quoted with inner quotes doubled.
/// Bare words only need their metacharacters caret-escaped.
///
/// `%` and `!` are caret-escaped in both forms. Inside quotes that means stepping
/// out of the quoted span for the one character: `"a "^%" b"`.
fn escape_cmd_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "\"\"".to_string();
    }

    let mut escaped = String::with_capacity(arg.len() + 4);
    if arg.chars().any(|c| c.is_whitespace() || c == '"') {
        escaped.push('"');
        for c in arg.chars() {
            match c {
                '"' => escaped.push_str("\"\""),
                c if CMD_EXPANSION_CHARACTERS.contains(&c) => {
                    escaped.push_str("\"^");
                    escaped.push(c);
                    escaped.push('"');
                }
                c => escaped.push(c),
            }
        }
        escaped.push('"');
        return escaped;
    }

    for c in arg.chars() {
        if CMD_METACHARACTERS.contains(&c) || CMD_EXPANSION_CHARACTERS.contains(&c) {
            escaped.push('^');
        }
        escaped.push(c);
    }
    escaped
}
