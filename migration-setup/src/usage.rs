//! Guidance and usage text printed at the end of a setup run.
//!
//! Rendering is pure so the three-way secrets branch can be tested
//! without touching the filesystem.

use crate::bootstrap::EnvPaths;
use crate::config::{API_KEY_NAME, SetupConfig};
use crate::secrets::SecretsStatus;

/// Guidance matching the secrets-file state. Empty when configured.
pub fn guidance(status: SecretsStatus, config: &SetupConfig) -> String {
    match status {
        SecretsStatus::Absent => format!(
            "\nNo {env} file found. To configure your API key:\n\
             \x20 cp {template} {env}\n\
             \x20 # then edit {env} and set {key}\n",
            env = config.env_file.display(),
            template = config.env_template.display(),
            key = API_KEY_NAME,
        ),
        SecretsStatus::PlaceholderPresent => format!(
            "\n{env} still contains the template placeholder.\n\
             Edit {env} and replace {placeholder} with your real {key}.\n",
            env = config.env_file.display(),
            placeholder = config.placeholder,
            key = API_KEY_NAME,
        ),
        SecretsStatus::Configured => String::new(),
    }
}

/// Final usage block advertising the downstream migration-agent commands.
pub fn usage_block(paths: &EnvPaths, config: &SetupConfig) -> String {
    format!(
        "\nSetup complete. To start working:\n\n\
         \x20 source {bin}/activate\n\n\
         Available commands:\n\
         \x20 python -m src.base                  # interactive coding agent\n\
         \x20 python -m src.agents.planner_agent  # generate a migration plan\n\
         \x20 python -m src.plan_manager          # inspect plan.md tasks\n\
         \x20 jupyter notebook                    # pick the \"{kernel}\" kernel\n\n\
         The agent reads {key} from {env} at startup.\n",
        bin = paths.bin_dir.display(),
        kernel = config.kernel_display_name,
        key = API_KEY_NAME,
        env = config.env_file.display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_guidance() {
        let config = SetupConfig::default();
        let text = guidance(SecretsStatus::Absent, &config);
        assert!(text.contains("cp .env.example .env"));
        assert!(!text.contains("replace"));
    }

    #[test]
    fn test_placeholder_guidance() {
        let config = SetupConfig::default();
        let text = guidance(SecretsStatus::PlaceholderPresent, &config);
        assert!(text.contains("replace YOUR_API_KEY_HERE"));
        assert!(!text.contains("cp .env.example"));
    }

    #[test]
    fn test_configured_guidance_is_silent() {
        let config = SetupConfig::default();
        assert!(guidance(SecretsStatus::Configured, &config).is_empty());
    }

    #[test]
    fn test_usage_block() {
        let config = SetupConfig::default();
        let paths = crate::bootstrap::venv::resolve_paths(&config.venv_dir);
        let text = usage_block(&paths, &config);
        assert!(text.contains("source .venv/bin/activate"));
        assert!(text.contains("python -m src.base"));
        assert!(text.contains("Migration Agent (.venv)"));
        assert!(text.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_usage_block_respects_config_paths() {
        let config = SetupConfig {
            venv_dir: "env".into(),
            ..SetupConfig::default()
        };
        let paths = crate::bootstrap::venv::resolve_paths(&config.venv_dir);
        let text = usage_block(&paths, &config);
        assert!(text.contains("source env/bin/activate"));
    }
}
