use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub main_window: MainWindowConfig,
    pub security: SecurityConfig,
    pub policy: PolicyConfig,
}

impl AppConfig {
    /// Reads a JSON config file. Missing sections and fields use defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MainWindowConfig {
    /// Send the host window behind others after a copy
    pub drop_to_back_after_copy: bool,
    pub minimize_after_copy: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SecurityConfig {
    /// Tag copies so clipboard-history tools skip them
    pub use_ignore_format_marker: bool,
    /// Seconds a host waits before calling clear-if-owner. `None` keeps the
    /// content until the host clears it some other way.
    pub clear_after_secs: Option<u64>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            use_ignore_format_marker: true,
            clear_after_secs: Some(12),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PolicyConfig {
    pub copy_to_clipboard: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self { copy_to_clipboard: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert!(config.security.use_ignore_format_marker);
        assert_eq!(config.security.clear_after_secs, Some(12));
        assert!(config.policy.copy_to_clipboard);
        assert!(!config.main_window.minimize_after_copy);
    }

    #[test]
    fn load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "main_window": {{ "minimize_after_copy": true }}, "policy": {{ "copy_to_clipboard": false }} }}"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert!(config.main_window.minimize_after_copy);
        assert!(!config.main_window.drop_to_back_after_copy);
        assert!(!config.policy.copy_to_clipboard);
        assert!(config.security.use_ignore_format_marker);
    }

    #[test]
    fn load_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(AppConfig::load(file.path()).is_err());
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(&dir.path().join("nope.json")).is_err());
    }
}
