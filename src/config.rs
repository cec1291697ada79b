use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct SyncConfig {
    /// Overrides where local files (the extra-data store) live.
    pub data_dir: Option<PathBuf>,
    /// Whether reported values include staged changes at startup.
    #[serde(default = "default_preview_changes")]
    pub preview_changes: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            data_dir: None,
            preview_changes: true,
        }
    }
}

fn default_preview_changes() -> bool {
    true
}

fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".worksync")
        .join("config.toml")
}

pub fn data_dir(config: &SyncConfig) -> PathBuf {
    config.data_dir.clone().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".worksync")
    })
}

pub fn extra_data_path(config: &SyncConfig) -> PathBuf {
    data_dir(config).join("extra_data.json")
}

pub fn load_config() -> Result<SyncConfig> {
    let path = config_path();
    if !path.exists() {
        return Ok(SyncConfig::default());
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: SyncConfig =
        toml::from_str(&contents).with_context(|| "Failed to parse config.toml")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_preview_changes_on() {
        let config = SyncConfig::default();
        assert!(config.preview_changes);
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: SyncConfig = toml::from_str("").unwrap();
        assert!(config.preview_changes);
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn explicit_values_are_honored() {
        let config: SyncConfig = toml::from_str(
            r#"
            data_dir = "/tmp/worksync-test"
            preview_changes = false
            "#,
        )
        .unwrap();
        assert!(!config.preview_changes);
        assert_eq!(
            extra_data_path(&config),
            PathBuf::from("/tmp/worksync-test/extra_data.json")
        );
    }
}
