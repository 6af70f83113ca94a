//! Bootstrap module for the migration-agent development environment.
//!
//! Handles creation of the project virtual environment, editable
//! installation of the project's dependencies, and optional Jupyter
//! kernel registration.

pub mod kernel;
pub mod venv;

use crate::config::SetupConfig;
use crate::secrets;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Resolved executable paths inside the venv.
///
/// Later steps receive this handle instead of relying on ambient PATH
/// mutation, so every delegated command runs against the right tools.
pub struct EnvPaths {
    /// The venv directory itself.
    pub venv_dir: PathBuf,
    /// Path to the venv's Python interpreter.
    pub python: PathBuf,
    /// Path to pip in the venv.
    pub pip: PathBuf,
    /// The venv's bin directory (what `activate` would prepend to PATH).
    pub bin_dir: PathBuf,
}

/// Whether this run created the venv or found it already in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvState {
    /// The venv was created by this run.
    Created,
    /// The venv already existed; creation and installs are skipped.
    Reused,
}

/// Ensure the virtual environment exists, creating it if missing.
///
/// Creation failure is fatal to the whole run: nothing downstream can
/// work without an environment. An existing directory is never touched.
pub fn ensure_environment(config: &SetupConfig) -> Result<EnvState> {
    if config.venv_dir.exists() {
        log::debug!("venv already present at {}", config.venv_dir.display());
        return Ok(EnvState::Reused);
    }

    let interpreter = venv::find_interpreter(&config.python)?;
    eprintln!(
        "Creating virtual environment at {}...",
        config.venv_dir.display()
    );
    venv::create_venv(&interpreter, &config.venv_dir)?;
    eprintln!("Virtual environment created.");

    Ok(EnvState::Created)
}

/// Resolve the environment handle for this run.
///
/// Runs on every invocation, not just first-time setup.
pub fn activate_environment(config: &SetupConfig) -> EnvPaths {
    venv::resolve_paths(&config.venv_dir)
}

/// Install the project and its declared dependencies into the venv.
pub fn install_dependencies(paths: &EnvPaths) -> Result<()> {
    venv::upgrade_pip(paths)?;
    venv::pip_install_editable(paths)
}

/// Register the notebook kernel under the configured names.
pub fn register_kernel(paths: &EnvPaths, config: &SetupConfig) -> Result<()> {
    kernel::register(paths, &config.kernel_name, &config.kernel_display_name)
}

/// Assemble environment diagnostics for the `info` subcommand.
pub fn get_info(config: &SetupConfig) -> Result<String> {
    let paths = activate_environment(config);

    let mut info = String::new();

    info.push_str(&format!("Venv dir: {}\n", paths.venv_dir.display()));
    info.push_str(&format!(
        "Venv ready: {}\n",
        venv::is_venv_ready(&paths).unwrap_or(false)
    ));

    if paths.python.exists() {
        if let Ok(version) = venv::python_version(&paths) {
            info.push_str(&format!("Python version: {}\n", version));
        }
        info.push_str(&format!(
            "Project installed: {}\n",
            venv::is_project_installed(&paths).unwrap_or(false)
        ));
    }

    info.push('\n');
    match kernel::read_kernelspec(&config.kernel_name)? {
        Some(spec) => {
            info.push_str(&format!(
                "Kernel \"{}\": registered as \"{}\"\n",
                config.kernel_name, spec.display_name
            ));
        }
        None => {
            info.push_str(&format!(
                "Kernel \"{}\": not registered\n",
                config.kernel_name
            ));
        }
    }

    info.push('\n');
    info.push_str(&secrets::describe(config)?);

    Ok(info)
}

/// Statistics about a `clean` run.
#[derive(Default)]
pub struct CleanupStats {
    pub venv_removed: bool,
    pub venv_size: u64,
    pub kernel_removed: bool,
}

/// Remove the venv (and optionally the kernelspec) on explicit request.
pub fn clean(config: &SetupConfig, include_kernel: bool) -> Result<CleanupStats> {
    let mut stats = CleanupStats::default();

    if config.venv_dir.exists() {
        stats.venv_size = dir_size(&config.venv_dir).unwrap_or(0);
        std::fs::remove_dir_all(&config.venv_dir)
            .context("Failed to remove the virtual environment")?;
        stats.venv_removed = true;
    }

    if include_kernel {
        stats.kernel_removed = kernel::remove(&config.kernel_name)?;
    }

    Ok(stats)
}

/// Calculate directory size recursively.
fn dir_size(path: &std::path::Path) -> Result<u64> {
    let mut size = 0;

    if path.is_file() {
        return Ok(std::fs::metadata(path)?.len());
    }

    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let metadata = entry.metadata()?;

        if metadata.is_dir() {
            size += dir_size(&entry.path())?;
        } else {
            size += metadata.len();
        }
    }

    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config_with_venv(dir: &Path) -> SetupConfig {
        SetupConfig {
            venv_dir: dir.to_path_buf(),
            ..SetupConfig::default()
        }
    }

    #[test]
    fn test_existing_venv_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let venv = dir.path().join(".venv");
        std::fs::create_dir(&venv).unwrap();

        let config = config_with_venv(&venv);
        let state = ensure_environment(&config).unwrap();
        assert_eq!(state, EnvState::Reused);

        // The directory itself was not touched
        assert!(venv.exists());
        assert_eq!(std::fs::read_dir(&venv).unwrap().count(), 0);
    }

    #[test]
    fn test_activate_resolves_paths() {
        let config = config_with_venv(Path::new("/tmp/project/.venv"));
        let paths = activate_environment(&config);
        assert!(paths.python.ends_with(".venv/bin/python"));
        assert!(paths.pip.ends_with(".venv/bin/pip"));
    }

    #[test]
    fn test_clean_missing_venv() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_venv(&dir.path().join("absent"));
        let stats = clean(&config, false).unwrap();
        assert!(!stats.venv_removed);
        assert_eq!(stats.venv_size, 0);
    }

    #[test]
    fn test_clean_removes_venv() {
        let dir = tempfile::tempdir().unwrap();
        let venv = dir.path().join(".venv");
        std::fs::create_dir_all(venv.join("bin")).unwrap();
        std::fs::write(venv.join("bin").join("python"), "fake").unwrap();

        let config = config_with_venv(&venv);
        let stats = clean(&config, false).unwrap();
        assert!(stats.venv_removed);
        assert!(stats.venv_size > 0);
        assert!(!venv.exists());
    }

    #[test]
    fn test_dir_size_counts_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(dir.path().join("a"), "1234").unwrap();
        std::fs::write(sub.join("b"), "56789").unwrap();
        assert_eq!(dir_size(dir.path()).unwrap(), 9);
    }
}
