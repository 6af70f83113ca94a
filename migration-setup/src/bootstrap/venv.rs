//! Virtual environment creation and dependency installation.

use super::EnvPaths;
use crate::config::PYTHON_VERSION;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Errors from locating a usable base interpreter.
#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error(
        "No usable Python interpreter found (tried {preferred}, python3). \
         Install Python {PYTHON_VERSION} and re-run."
    )]
    NotFound { preferred: String },
}

/// Find the base interpreter used to create the venv.
///
/// Prefers the pinned minor version, falls back to whatever `python3`
/// resolves to on PATH.
pub fn find_interpreter(preferred: &str) -> Result<PathBuf, InterpreterError> {
    if let Ok(path) = which::which(preferred) {
        log::debug!("using interpreter {}", path.display());
        return Ok(path);
    }

    which::which("python3")
        .inspect(|path| log::debug!("falling back to {}", path.display()))
        .map_err(|_| InterpreterError::NotFound {
            preferred: preferred.to_string(),
        })
}

/// Resolve executable paths inside the venv without touching the filesystem.
pub fn resolve_paths(venv_dir: &Path) -> EnvPaths {
    let bin_dir = venv_dir.join("bin");
    EnvPaths {
        python: bin_dir.join("python"),
        pip: bin_dir.join("pip"),
        bin_dir,
        venv_dir: venv_dir.to_path_buf(),
    }
}

/// Create a virtual environment at `venv_dir` using `interpreter`.
///
/// The caller is responsible for checking that `venv_dir` does not already
/// exist; an existing environment is never overwritten.
pub fn create_venv(interpreter: &Path, venv_dir: &Path) -> Result<()> {
    let output = Command::new(interpreter)
        .args(["-m", "venv"])
        .arg(venv_dir)
        .output()
        .with_context(|| format!("Failed to run {}", interpreter.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "venv creation failed at {}: {}",
            venv_dir.display(),
            stderr.trim()
        );
    }

    Ok(())
}

/// Check if the venv exists and its Python runs.
pub fn is_venv_ready(paths: &EnvPaths) -> Result<bool> {
    if !paths.python.exists() {
        return Ok(false);
    }

    let output = Command::new(&paths.python)
        .args(["--version"])
        .output()
        .context("Failed to run venv Python")?;

    Ok(output.status.success())
}

/// Report the venv interpreter's version string.
pub fn python_version(paths: &EnvPaths) -> Result<String> {
    let output = Command::new(&paths.python)
        .args(["--version"])
        .output()
        .context("Failed to run venv Python")?;

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Check if the project package imports from inside the venv.
pub fn is_project_installed(paths: &EnvPaths) -> Result<bool> {
    if !paths.python.exists() {
        return Ok(false);
    }

    let output = Command::new(&paths.python)
        .args(["-c", "import src.base"])
        .output()
        .context("Failed to check project package")?;

    Ok(output.status.success())
}

/// Upgrade pip inside the venv.
///
/// Pip's own output is inherited so the user sees its progress directly.
pub fn upgrade_pip(paths: &EnvPaths) -> Result<()> {
    let status = Command::new(&paths.pip)
        .args(["install", "--upgrade", "pip"])
        .status()
        .context("Failed to run pip")?;

    if !status.success() {
        anyhow::bail!("pip self-upgrade failed");
    }

    Ok(())
}

/// Install the project in editable mode, pulling all declared dependencies.
pub fn pip_install_editable(paths: &EnvPaths) -> Result<()> {
    let status = Command::new(&paths.pip)
        .args(["install", "-e", "."])
        .status()
        .context("Failed to run pip")?;

    if !status.success() {
        anyhow::bail!("pip install -e . failed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_paths() {
        let paths = resolve_paths(Path::new(".venv"));
        assert!(paths.python.ends_with(".venv/bin/python"));
        assert!(paths.pip.ends_with(".venv/bin/pip"));
        assert!(paths.bin_dir.ends_with(".venv/bin"));
        assert_eq!(paths.venv_dir, PathBuf::from(".venv"));
    }

    #[test]
    fn test_interpreter_error_message() {
        let err = InterpreterError::NotFound {
            preferred: "python3.11".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("python3.11"));
        assert!(msg.contains("Install Python 3.11"));
    }

    #[test]
    fn test_venv_not_ready_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = resolve_paths(&dir.path().join("no-venv"));
        assert!(!is_venv_ready(&paths).unwrap());
    }

    #[test]
    fn test_project_not_installed_when_venv_missing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = resolve_paths(&dir.path().join("no-venv"));
        assert!(!is_project_installed(&paths).unwrap());
    }
}
