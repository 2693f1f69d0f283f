use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use alert::ThresholdError;
use market::TickerError;
use thiserror::Error;

use crate::cli::USAGE_EXAMPLE;

/// A startup failure that ends the process.
///
/// Besides the message, it tells the user which file was responsible (if
/// any) and what to do about it.
pub trait Diagnostic: std::error::Error {
    /// One line describing the phase that failed.
    fn headline(&self) -> &'static str;

    fn file(&self) -> Option<&Path> {
        None
    }

    fn remediation(&self) -> String;
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("invalid ticker: {0}")]
    Ticker(#[from] TickerError),

    #[error("invalid {which} price '{value}': not a decimal number")]
    Price { which: &'static str, value: String },

    #[error("invalid thresholds: {0}")]
    Thresholds(#[from] ThresholdError),
}

impl Diagnostic for InputError {
    fn headline(&self) -> &'static str {
        "invalid command line arguments"
    }

    fn remediation(&self) -> String {
        match self {
            InputError::Ticker(_) => {
                format!("pass the code of an existing asset, e.g. '{USAGE_EXAMPLE}'")
            }
            InputError::Price { .. } | InputError::Thresholds(ThresholdError::NotFinite { .. }) => {
                "pass both prices as decimal numbers in the NN.NN format, e.g. 23.67".to_string()
            }
            InputError::Thresholds(ThresholdError::NonPositiveBuy(_)) => {
                "pass a buy price greater than zero".to_string()
            }
            InputError::Thresholds(ThresholdError::SellNotAboveBuy { .. }) => {
                "pass a sell price greater than the buy price".to_string()
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file '{}' does not exist or could not be read: {source}", .file.display())]
    Unreadable {
        file: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("configuration file '{}' has no [{section}] section", .file.display())]
    MissingSection { file: PathBuf, section: &'static str },

    #[error("field '{field}' in section [{section}] of '{}' is missing or empty", .file.display())]
    MissingField {
        file: PathBuf,
        section: &'static str,
        field: &'static str,
    },

    #[error(
        "field '{field}' in section [{section}] of '{}' must be {expected}, got '{value}'",
        .file.display()
    )]
    InvalidField {
        file: PathBuf,
        section: &'static str,
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl Diagnostic for ConfigError {
    fn headline(&self) -> &'static str {
        "invalid configuration"
    }

    fn file(&self) -> Option<&Path> {
        match self {
            ConfigError::Unreadable { file, .. }
            | ConfigError::MissingSection { file, .. }
            | ConfigError::MissingField { file, .. }
            | ConfigError::InvalidField { file, .. } => Some(file),
        }
    }

    fn remediation(&self) -> String {
        match self {
            ConfigError::Unreadable { file, .. } => format!(
                "create '{}' with the settings the application needs (see config/*.ini.example)",
                file.display()
            ),
            ConfigError::MissingSection { file, section } => {
                format!("add a [{section}] section to '{}'", file.display())
            }
            ConfigError::MissingField {
                file,
                section,
                field,
            } => format!(
                "set a non-empty '{field}' under [{section}] in '{}'",
                file.display()
            ),
            ConfigError::InvalidField {
                file,
                section,
                field,
                expected,
                ..
            } => format!(
                "set '{field}' under [{section}] in '{}' to {expected}",
                file.display()
            ),
        }
    }
}

/// Framed, multi-line description of a fatal error.
pub fn render_fatal(err: &dyn Diagnostic, invocation: &str) -> String {
    const RULE: &str = "--------------------------------------------------------------";

    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, " stock-alert: {}", err.headline());
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, " > Details:          {err}");
    if let Some(file) = err.file() {
        let _ = writeln!(out, " > File:             {}", file.display());
    }
    let _ = writeln!(out, " > Invoked as:       {invocation}");
    let _ = writeln!(out, " > Suggested action: {}", err.remediation());
    out
}

/// Print a fatal error to stderr and mirror it in the log.
pub fn report_fatal(err: &dyn Diagnostic) {
    let invocation = std::env::args_os()
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    eprint!("{}", render_fatal(err, &invocation));
    tracing::error!(error = %err, "startup aborted");
}
