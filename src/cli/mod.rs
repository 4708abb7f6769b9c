use clap::Parser;
use std::path::PathBuf;

pub mod handlers;
pub mod reporter;

/// nrun: run a project's named scripts through the platform shell.
///
/// Scripts run one after another in the order given and the run stops at the
/// first failure. With no script names, the available scripts are listed.
/// Arguments after `--` are appended to the last command of every script.
#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about,
    long_about = None,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The scripts to run, in order.
    pub scripts: Vec<String>,

    /// Skip requested scripts that the project does not declare instead of failing.
    #[arg(long)]
    pub if_present: bool,

    /// The shell used to run scripts (overrides the project and the OS default).
    #[arg(long, visible_alias = "script-shell", env = "NRUN_SCRIPT_SHELL", value_name = "PATH")]
    pub shell: Option<String>,

    /// Directory to start looking for the project manifest in. Defaults to the current directory.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Print the banner, the chosen shell and debug logs.
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not echo each command before running it.
    #[arg(short, long)]
    pub silent: bool,

    /// Arguments forwarded to the scripts.
    #[arg(last = true, value_name = "ARGS")]
    pub extra_args: Vec<String>,
}
