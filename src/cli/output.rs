//! Output formatting
//!
//! Maps the global `--quiet`, `--json` and `-v` flags onto the log level and
//! the shape of command output, and renders errors for the user.

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";
}

/// Output preferences derived from the global flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Suppress everything but errors and requested data
    pub quiet: bool,

    /// Machine-readable output
    pub json: bool,

    /// Verbosity count (`-v` = 1, `-vv` = 2)
    pub verbose: u8,
}

impl OutputConfig {
    /// Create from the parsed flags
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Default log filter when `RUST_LOG` is unset
    ///
    /// `--quiet` wins over `-v`.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    /// Whether human-oriented status lines should be printed
    pub fn show_status(&self) -> bool {
        !self.quiet && !self.json
    }

    /// Print a success line unless suppressed
    pub fn success(&self, message: &str) {
        if self.show_status() {
            println!("{} {message}", status::SUCCESS);
        }
    }
}

/// Print an error and its causes to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} Error: {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  Caused by: {cause}");
    }
}
