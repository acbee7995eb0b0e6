use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::ForgeError;

pub const DEFAULT_CONFIG_FILE: &str = "neuralforge.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
    pub gemini_api_base: String,
    pub artifacts_dir: String,
    pub max_citations: usize,
    pub github: GitHubConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_base: String,
    pub private: bool,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            temperature: 0.7,
            timeout_secs: 120,
            gemini_api_base: "https://generativelanguage.googleapis.com/v1beta".into(),
            artifacts_dir: ".neuralforge/runs".into(),
            max_citations: 4,
            github: GitHubConfig::default(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".into(),
            private: false,
            user_agent: concat!("neuralforge/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl Config {
    /// Loads `explicit` if given, else `neuralforge.toml` in the working
    /// directory when it exists, else defaults. Environment overrides apply
    /// on top.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ForgeError> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };
        let mut cfg = match path {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self, ForgeError> {
        let text = fs::read_to_string(path).map_err(|e| ForgeError::Config(e.to_string()))?;
        toml::from_str(&text)
            .map_err(|e| ForgeError::Config(format!("invalid {}: {e}", path.display())))
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get("NEURALFORGE_MODEL") {
            self.model = v;
        }
        if let Some(v) = get("GEMINI_BASE_URL") {
            self.gemini_api_base = v;
        }
        if let Some(v) = get("GITHUB_API_BASE") {
            self.github.api_base = v;
        }
    }
}
