//! Console progress reporting
//!
//! Color is a per-run configuration value carried by the [`Reporter`], not
//! process-global state; `--no-color` only affects the run it was given to.
//! Skips and info lines go to stdout, failures to stderr.

use colored::{Color, Colorize};

/// Progress printer for one export run
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Plain line with no prefix
    pub fn line(&self, msg: &str) {
        println!("{msg}");
    }

    /// Progress line for an item being exported
    pub fn info(&self, msg: &str) {
        println!("* {msg}");
    }

    /// Informational skip line
    pub fn skip(&self, msg: &str) {
        println!("{} {msg}", self.paint("*", Color::Yellow));
    }

    /// Per-item failure line
    pub fn fail(&self, msg: &str) {
        eprintln!("{} {msg}", self.paint("*", Color::Red));
    }

    /// Final summary line
    pub fn done(&self, exported: usize) {
        println!(
            "\n{exported} documents {}",
            self.paint("exported.", Color::Green)
        );
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}
