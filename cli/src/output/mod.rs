//! Output formatting module

pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let use_colors =
            !no_color && Term::stdout().is_term() && std::env::var_os("NO_COLOR").is_none();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self { styles, quiet }
    }

    /// Print `✓ msg`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        self.marked("✓", self.styles.success, msg);
    }

    /// Print `⚠ msg`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        self.marked("⚠", self.styles.warning, msg);
    }

    /// Print `ℹ msg`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        self.marked("ℹ", self.styles.info, msg);
    }

    fn marked(&self, mark: &str, style: Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", mark.style(style));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }

    /// Print a command line for the operator to copy.
    ///
    /// Never suppressed: with `--quiet` this is the only output of a
    /// successful direct run.
    pub fn command(&self, line: &str) {
        println!("    {}", line.style(self.styles.command));
    }
}
