//! Application-wide constants

use std::time::Duration;

/// Snapshot and deployment management CLI
pub const CTL_BIN: &str = "deepin-immutable-ctl";

/// Writable-mode toggle CLI
pub const WRITABLE_BIN: &str = "deepin-immutable-writable";

/// Privilege elevation helper, prepended to commands that need root
pub const ELEVATION_PREFIX: &str = "pkexec";

/// Interpreter used for console and query commands
pub const SHELL: &str = "/bin/bash";

/// Read-only queries that never need elevation (substring match)
pub const NO_ROOT_SIGNATURES: &[&str] = &[
    "deepin-immutable-ctl --immutable-status",
    "deepin-immutable-ctl snapshot list",
    "deepin-immutable-ctl snapshot show",
    "deepin-immutable-writable status",
];

/// Commands that always run elevated, even when they wrap a read-only query
pub const FORCE_ROOT_SIGNATURES: &[&str] = &["deepin-immutable-ctl admin exec"];

/// Written to the console when the user cancels a running command
pub const CANCEL_MARKER: &str = "⛔ [CANCELLED BY USER]";

/// Prefix for stderr chunks forwarded to the console
pub const STDERR_PREFIX: &str = "ERROR: ";

/// Stderr noise produced by our own kill; never forwarded
pub const KILL_NOISE: &[&str] = &["terminated", "killed"];

/// Bytes read from a pipe at a time; each read becomes one output chunk
pub const READ_CHUNK_SIZE: usize = 4096;

/// Width of the separator written after every console command
pub const SEPARATOR_WIDTH: usize = 80;

/// How long cancel waits for the OS to reap a killed child
pub const REAP_TIMEOUT: Duration = Duration::from_secs(1);

/// How long to keep draining pipes after the child exited
pub const OUTPUT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Exit code reported when a killed child could not be reaped in time
pub const UNREAPED_EXIT_CODE: i32 = -1;

/// Default timeout for synchronous (no console) queries in seconds
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

/// Default interval between background status refreshes in seconds
pub const DEFAULT_STATUS_REFRESH_SECS: u64 = 10;

/// Maximum lines kept in the console view
pub const CONSOLE_BUFFER_SIZE: usize = 2000;

/// Event poll timeout in milliseconds
pub const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Spinner animation interval in milliseconds
pub const SPINNER_TICK_MS: u128 = 100;

/// Maximum length for user text input (prevents memory exhaustion)
pub const MAX_INPUT_LENGTH: usize = 512;

/// Display name shown in the header and about panel
pub const APP_NAME: &str = "Immutable Deepin Tools";

/// Application version shown on the about panel
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common commands offered by the admin exec form
pub const COMMON_EXEC_COMMANDS: &[(&str, &str)] = &[
    ("apt update", "apt update"),
    ("apt upgrade", "apt upgrade -y"),
    ("apt install", "apt install "),
    ("apt remove", "apt remove "),
    ("apt autoremove", "apt autoremove -y"),
    ("apt clean", "apt clean"),
];

/// Separator line written after every console command
pub fn separator() -> String {
    format!("\n{}\n", "=".repeat(SEPARATOR_WIDTH))
}
