//! Setup configuration for the migration-agent bootstrapper.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Interpreter the venv is pinned to. A bare `python3` is accepted as a
/// fallback when the pinned minor version is not on PATH.
pub const PYTHON_VERSION: &str = "3.11";

/// Environment variable the downstream agent reads from the secrets file.
pub const API_KEY_NAME: &str = "GEMINI_API_KEY";

fn default_venv_dir() -> PathBuf {
    PathBuf::from(".venv")
}

fn default_env_file() -> PathBuf {
    PathBuf::from(".env")
}

fn default_env_template() -> PathBuf {
    PathBuf::from(".env.example")
}

fn default_python() -> String {
    format!("python{}", PYTHON_VERSION)
}

fn default_kernel_name() -> String {
    "migration-agent".to_string()
}

fn default_kernel_display_name() -> String {
    "Migration Agent (.venv)".to_string()
}

fn default_placeholder() -> String {
    "YOUR_API_KEY_HERE".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupConfig {
    /// Virtual environment directory, relative to the project root
    #[serde(default = "default_venv_dir")]
    pub venv_dir: PathBuf,

    /// Secrets file the downstream agent loads at startup
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,

    /// Template the user copies to create the secrets file
    #[serde(default = "default_env_template")]
    pub env_template: PathBuf,

    /// Preferred interpreter used to create the venv
    #[serde(default = "default_python")]
    pub python: String,

    /// Internal name for the registered Jupyter kernel
    #[serde(default = "default_kernel_name")]
    pub kernel_name: String,

    /// Display name shown in the notebook kernel picker
    #[serde(default = "default_kernel_display_name")]
    pub kernel_display_name: String,

    /// Sentinel value the template ships with in place of a real key
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            venv_dir: default_venv_dir(),
            env_file: default_env_file(),
            env_template: default_env_template(),
            python: default_python(),
            kernel_name: default_kernel_name(),
            kernel_display_name: default_kernel_display_name(),
            placeholder: default_placeholder(),
        }
    }
}

impl SetupConfig {
    /// Default config file path: `setup.toml` in the project root.
    pub fn default_path() -> PathBuf {
        PathBuf::from("setup.toml")
    }

    /// Load config from `path`, or from `setup.toml` when none is given.
    ///
    /// An explicitly passed path must exist; the default path is optional
    /// and falls back to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let content = fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config file {}", p.display()))?;
                Self::parse(&content)
            }
            None => {
                let default = Self::default_path();
                if !default.exists() {
                    return Ok(Self::default());
                }
                let content = fs::read_to_string(&default).with_context(|| {
                    format!("Failed to read config file {}", default.display())
                })?;
                Self::parse(&content)
            }
        }
    }

    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse setup config")
    }
}
