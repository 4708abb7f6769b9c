// src/constants.rs

/// The pseudo-script that is always runnable: prints the environment unless the project overrides it.
pub const ENV_PSEUDO_SCRIPT: &str = "env";

/// Set for every child to the directory the run executes in.
pub const INIT_CWD_VAR: &str = "INIT_CWD";

/// Set for every child to the name of the script it belongs to.
pub const SCRIPT_NAME_VAR: &str = "NRUN_SCRIPT_NAME";

/// Consulted on Windows hosts when no shell is configured.
pub const COMSPEC_VAR: &str = "COMSPEC";

/// Fallback shells when nothing else is configured.
pub const DEFAULT_CMD_SHELL: &str = "cmd";
pub const DEFAULT_POSIX_SHELL: &str = "sh";

/// Exit code reported for a script whose child was terminated by cancellation.
pub const CANCELLED_EXIT_CODE: i32 = 130;

/// Manifest files searched for in each directory, in order of precedence.
pub const MANIFEST_FILENAMES: [&str; 2] = ["nrun.toml", "package.json"];

/// The directory name under the system config dir.
pub const CONFIG_DIR_NAME: &str = "nrun";

/// Overrides the settings directory (mostly useful for tests and CI).
pub const CONFIG_DIR_ENV_VAR: &str = "NRUN_CONFIG_DIR";

/// The user settings file inside the config directory.
pub const SETTINGS_FILENAME: &str = "config.toml";
