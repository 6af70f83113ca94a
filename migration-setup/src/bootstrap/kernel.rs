//! Jupyter kernel registration for the notebook workflow.

use super::EnvPaths;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Command;

/// Register the venv as a user-level Jupyter kernel.
pub fn register(paths: &EnvPaths, name: &str, display_name: &str) -> Result<()> {
    let output = Command::new(&paths.python)
        .args(["-m", "ipykernel", "install", "--user", "--name"])
        .arg(name)
        .args(["--display-name"])
        .arg(display_name)
        .output()
        .context("Failed to run ipykernel")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("ipykernel install failed: {}", stderr.trim());
    }

    eprintln!("  Registered kernel \"{}\" ({})", name, display_name);
    Ok(())
}

/// User-level kernelspec directory for `name`.
///
/// Jupyter stores user kernelspecs under `~/Library/Jupyter` on macOS and
/// under the XDG data dir elsewhere.
pub fn kernelspec_dir(name: &str) -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    let base = dirs::home_dir().map(|h| h.join("Library").join("Jupyter"));

    #[cfg(not(target_os = "macos"))]
    let base = dirs::data_dir().map(|d| d.join("jupyter"));

    base.map(|b| b.join("kernels").join(name))
}

/// The `kernel.json` Jupyter writes on registration.
#[derive(Debug, Deserialize)]
pub struct KernelSpec {
    pub argv: Vec<String>,
    pub display_name: String,
    #[serde(default)]
    pub language: String,
}

/// Read the registered kernelspec, if any.
pub fn read_kernelspec(name: &str) -> Result<Option<KernelSpec>> {
    let Some(dir) = kernelspec_dir(name) else {
        return Ok(None);
    };

    let spec_file = dir.join("kernel.json");
    if !spec_file.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&spec_file)
        .with_context(|| format!("Failed to read {}", spec_file.display()))?;
    let spec = serde_json::from_str(&content).context("Failed to parse kernel.json")?;
    Ok(Some(spec))
}

/// Remove the registered kernelspec. Returns whether anything was removed.
pub fn remove(name: &str) -> Result<bool> {
    let Some(dir) = kernelspec_dir(name) else {
        return Ok(false);
    };

    if !dir.exists() {
        return Ok(false);
    }

    std::fs::remove_dir_all(&dir)
        .with_context(|| format!("Failed to remove kernelspec at {}", dir.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernelspec_dir() {
        let dir = kernelspec_dir("migration-agent").unwrap();
        assert!(dir.ends_with("kernels/migration-agent"));
    }

    #[test]
    fn test_parse_kernelspec() {
        let json = r#"{
            "argv": ["/home/user/project/.venv/bin/python", "-m", "ipykernel_launcher", "-f", "{connection_file}"],
            "display_name": "Migration Agent (.venv)",
            "language": "python"
        }"#;
        let spec: KernelSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.display_name, "Migration Agent (.venv)");
        assert_eq!(spec.language, "python");
        assert!(spec.argv[0].ends_with("python"));
    }

    #[test]
    fn test_parse_kernelspec_without_language() {
        let json = r#"{"argv": ["python"], "display_name": "x"}"#;
        let spec: KernelSpec = serde_json::from_str(json).unwrap();
        assert!(spec.language.is_empty());
    }
}
