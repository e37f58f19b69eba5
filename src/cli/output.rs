//! Output formatting for CLI commands
//!
//! Results go to stdout; warnings and verbose traces go to stderr.

use anyhow::{Context, Result};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints a list of names, comma-joined in text mode
    pub fn list(&self, items: &[String]) -> Result<()> {
        match self.format {
            OutputFormat::Text => println!("{}", items.join(",")),
            OutputFormat::Json => self.data(items)?,
        }
        Ok(())
    }

    /// Prints a single value
    pub fn value(&self, value: &str) -> Result<()> {
        match self.format {
            OutputFormat::Text => println!("{}", value),
            OutputFormat::Json => self.data(value)?,
        }
        Ok(())
    }

    /// Prints preformatted lines (text only)
    pub fn lines(&self, lines: &[String]) {
        if self.format == OutputFormat::Text {
            for line in lines {
                println!("{}", line);
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize + ?Sized>(&self, data: &T) -> Result<()> {
        let json = match self.format {
            OutputFormat::Text => serde_json::to_string_pretty(data),
            OutputFormat::Json => serde_json::to_string(data),
        }
        .context("Failed to serialize output as JSON")?;

        println!("{}", json);
        Ok(())
    }

    /// Prints a warning to stderr
    pub fn warn(&self, message: &str) {
        match self.format {
            OutputFormat::Text => eprintln!("WARNING: {}", message),
            OutputFormat::Json => {
                eprintln!("{}", serde_json::json!({ "warning": message }));
            }
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}
