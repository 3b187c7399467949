//! Gallery configuration.
//!
//! Loaded with layered precedence (highest wins):
//! 1. Environment variables: `PIGMENT_RAW_HOST`, `PIGMENT_MAX_CONCURRENT_READS`
//! 2. An explicit config file, or `~/.pigment/config.json` when none is given
//! 3. Built-in defaults

use crate::error::{PigmentError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_RAW_HOST: &str = "PIGMENT_RAW_HOST";
pub const ENV_MAX_CONCURRENT_READS: &str = "PIGMENT_MAX_CONCURRENT_READS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryConfig {
    /// Host serving raw repository files
    #[serde(default = "default_raw_host")]
    pub raw_host: String,
    /// Upper bound on store reads issued at once within one stage
    #[serde(default = "default_max_concurrent_reads")]
    pub max_concurrent_reads: usize,
    /// Shortest name fragment that may fall back to a substring search
    #[serde(default = "default_partial_search_min_len")]
    pub partial_search_min_len: usize,
}

fn default_raw_host() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_max_concurrent_reads() -> usize {
    16
}

fn default_partial_search_min_len() -> usize {
    3
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            raw_host: default_raw_host(),
            max_concurrent_reads: default_max_concurrent_reads(),
            partial_search_min_len: default_partial_search_min_len(),
        }
    }
}

impl GalleryConfig {
    /// Load config: file (explicit or global) < environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_file(path)?,
            None => match Self::global_config_path() {
                Some(global) if global.exists() => Self::load_file(&global)?,
                _ => Self::default(),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            PigmentError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// `~/.pigment/config.json`
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".pigment").join("config.json"))
    }

    /// Applies overrides from a variable lookup (the process environment in [`load`](Self::load)).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_RAW_HOST) {
            self.raw_host = host;
        }
        if let Some(raw) = lookup(ENV_MAX_CONCURRENT_READS) {
            self.max_concurrent_reads = raw.trim().parse().map_err(|_| {
                PigmentError::Config(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_MAX_CONCURRENT_READS, raw
                ))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_reads == 0 {
            return Err(PigmentError::Config(
                "maxConcurrentReads must be at least 1".to_string(),
            ));
        }
        if self.raw_host.trim().is_empty() {
            return Err(PigmentError::Config("rawHost must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = GalleryConfig::default();
        assert_eq!(config.raw_host, "https://raw.githubusercontent.com");
        assert_eq!(config.max_concurrent_reads, 16);
        assert_eq!(config.partial_search_min_len, 3);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "rawHost": "http://localhost:8080" }"#).unwrap();

        let config = GalleryConfig::load_file(&path).unwrap();
        assert_eq!(config.raw_host, "http://localhost:8080");
        assert_eq!(config.max_concurrent_reads, 16);
    }

    #[test]
    fn test_env_overrides_file() {
        let vars: HashMap<&str, &str> = [
            (ENV_RAW_HOST, "https://cdn.example.org"),
            (ENV_MAX_CONCURRENT_READS, "4"),
        ]
        .into_iter()
        .collect();

        let mut config = GalleryConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.raw_host, "https://cdn.example.org");
        assert_eq!(config.max_concurrent_reads, 4);
    }

    #[test]
    fn test_bad_override_is_config_error() {
        let mut config = GalleryConfig::default();
        let err = config
            .apply_overrides(|key| (key == ENV_MAX_CONCURRENT_READS).then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, PigmentError::Config(_)));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = GalleryConfig {
            max_concurrent_reads: 0,
            ..GalleryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            GalleryConfig::load_file(&path),
            Err(PigmentError::Config(_))
        ));
    }
}
