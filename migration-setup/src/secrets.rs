//! Secrets file inspection.
//!
//! The downstream agent loads the `.env` file itself at startup; this
//! module only classifies whether the file looks configured. The file is
//! never written, and the key value is never read out or exported.

use crate::config::{API_KEY_NAME, SetupConfig};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;

/// State of the API-key secrets file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretsStatus {
    /// No secrets file on disk.
    Absent,
    /// File exists but still carries the template placeholder.
    PlaceholderPresent,
    /// File exists with a real-looking value.
    Configured,
}

/// Matches an uncommented `GEMINI_API_KEY=<value>` line.
static KEY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?m)^[ \t]*{API_KEY_NAME}[ \t]*=[ \t]*(\S+)"))
        .expect("valid key-line regex")
});

/// Inspect the configured secrets file and classify its state.
pub fn check(config: &SetupConfig) -> Result<SecretsStatus> {
    if !config.env_file.exists() {
        return Ok(SecretsStatus::Absent);
    }

    let content = fs::read_to_string(&config.env_file)
        .with_context(|| format!("Failed to read {}", config.env_file.display()))?;

    Ok(classify(&content, &config.placeholder))
}

/// Classify secrets-file content. Pure; no filesystem access.
///
/// The file counts as unconfigured while the template's placeholder
/// sentinel is still present anywhere in it.
pub fn classify(content: &str, placeholder: &str) -> SecretsStatus {
    if content.contains(placeholder) {
        SecretsStatus::PlaceholderPresent
    } else {
        SecretsStatus::Configured
    }
}

/// Whether an uncommented key line with a value exists. Diagnostic only;
/// the guidance branch depends solely on the placeholder sentinel.
pub fn key_line_present(content: &str) -> bool {
    KEY_LINE.is_match(content)
}

/// One-paragraph diagnostic for the `info` subcommand.
pub fn describe(config: &SetupConfig) -> Result<String> {
    let status = check(config)?;

    let line = match status {
        SecretsStatus::Absent => format!("Secrets file {}: absent", config.env_file.display()),
        SecretsStatus::PlaceholderPresent => format!(
            "Secrets file {}: placeholder not yet replaced",
            config.env_file.display()
        ),
        SecretsStatus::Configured => {
            let content = fs::read_to_string(&config.env_file)
                .with_context(|| format!("Failed to read {}", config.env_file.display()))?;
            if key_line_present(&content) {
                format!(
                    "Secrets file {}: {} set (value not shown)",
                    config.env_file.display(),
                    API_KEY_NAME
                )
            } else {
                format!(
                    "Secrets file {}: present, but no {} line found",
                    config.env_file.display(),
                    API_KEY_NAME
                )
            }
        }
    };

    Ok(line + "\n")
}
