use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::language::Language;

/// On-disk settings, including the persisted API key. Stored as TOML in the
/// platform config directory. The key is kept in plain text; anyone hardening
/// this should move it behind a server-side proxy instead.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    pub ai: AiConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub model: String,
    /// Override for tests and self-hosted proxies. Not persisted.
    #[serde(skip)]
    pub base_url: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash-latest".to_string(),
            base_url: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DisplayConfig {
    pub color_output: bool,
    pub default_language: Option<Language>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_output: true,
            default_language: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Startup load: an absent config file means defaults (and no
    /// credential), not an error.
    pub fn load_or_default() -> Result<Self> {
        let path = get_config_path()?;
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "codesage", "codesage")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}
