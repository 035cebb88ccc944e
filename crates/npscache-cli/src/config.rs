//! Application configuration management.
//!
//! Settings come from an optional JSON file at
//! `~/.config/npscache/config.json`; the cache location can be overridden
//! with `NPSCACHE_CACHE_FILE` and the places API key is read from
//! `MAPQUEST_API_KEY` (a `.env` file is honoured).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use npscache_core::api::Ambiguities;
use npscache_core::SearchParams;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "npscache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Cache document file name
const CACHE_FILE: &str = "nps_cache.json";

pub const CACHE_FILE_ENV: &str = "NPSCACHE_CACHE_FILE";
pub const API_KEY_ENV: &str = "MAPQUEST_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cache_file: Option<PathBuf>,
    pub search_radius_miles: u32,
    pub max_matches: u32,
}

impl Default for Config {
    fn default() -> Self {
        let search = SearchParams::default();
        Self {
            cache_file: None,
            search_radius_miles: search.radius_miles,
            max_matches: search.max_matches,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Where the cache document lives: the env override, then the config
    /// file, then the platform cache directory, then the working directory.
    pub fn cache_path(&self) -> PathBuf {
        self.cache_path_with(std::env::var(CACHE_FILE_ENV).ok())
    }

    fn cache_path_with(&self, env_override: Option<String>) -> PathBuf {
        if let Some(path) = env_override.filter(|p| !p.trim().is_empty()) {
            return PathBuf::from(path);
        }
        if let Some(ref path) = self.cache_file {
            return path.clone();
        }
        dirs::cache_dir()
            .map(|dir| dir.join(APP_NAME).join(CACHE_FILE))
            .unwrap_or_else(|| PathBuf::from(CACHE_FILE))
    }

    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            radius_miles: self.search_radius_miles,
            max_matches: self.max_matches,
            ambiguities: Ambiguities::Ignore,
        }
    }

    pub fn api_key() -> Option<String> {
        std::env::var(API_KEY_ENV).ok()
    }
}
