use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::picker::PickerPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Dark,
    Light,
}

/// Optional `#RRGGBB` overrides for theme tokens
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ThemeOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub color_mode: ColorMode,

    /// Size cap shown in the drop zone, in MB
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Reject dropped files over the cap instead of only advertising it
    #[serde(default = "default_true")]
    pub enforce_size_cap: bool,

    /// Apply the drop-path type and size checks to browsed files too
    #[serde(default)]
    pub strict_browse: bool,

    /// Browse popup lists every file, not just .csv/.json
    #[serde(default)]
    pub show_all_files: bool,

    /// Directory the browse popup opens in (home directory otherwise)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_dir: Option<PathBuf>,

    /// Desktop notification when a file is submitted
    #[serde(default)]
    pub notifications: bool,

    #[serde(default)]
    pub theme: ThemeOverrides,
}

fn default_max_file_size_mb() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::default(),
            max_file_size_mb: default_max_file_size_mb(),
            enforce_size_cap: true,
            strict_browse: false,
            show_all_files: false,
            start_dir: None,
            notifications: false,
            theme: ThemeOverrides::default(),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("dropzone");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            // Keep a broken file around for the user to fix
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        let _ = config.save();
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(&self.normalized())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Copy with empty or nonsensical values dropped
    fn normalized(&self) -> Self {
        let mut clean = self.clone();

        if clean.max_file_size_mb == 0 {
            clean.max_file_size_mb = default_max_file_size_mb();
        }

        if clean.start_dir.as_ref().map(|p| p.as_os_str().is_empty()).unwrap_or(false) {
            clean.start_dir = None;
        }

        for value in [
            &mut clean.theme.accent,
            &mut clean.theme.border,
            &mut clean.theme.danger,
            &mut clean.theme.text,
        ] {
            if value.as_ref().map(|s| s.trim().is_empty()).unwrap_or(false) {
                *value = None;
            }
        }

        clean
    }

    /// Size cap in bytes
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size_mb.max(1).saturating_mul(1024 * 1024)
    }

    /// Acceptance rules for the picker
    pub fn policy(&self) -> PickerPolicy {
        PickerPolicy {
            max_file_size: self.enforce_size_cap.then(|| self.max_file_size()),
            strict_browse: self.strict_browse,
            ..PickerPolicy::default()
        }
    }

    /// Directory the browse popup starts in
    pub fn browse_start(&self) -> PathBuf {
        self.start_dir
            .clone()
            .filter(|p| p.is_dir())
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("/"))
    }
}
