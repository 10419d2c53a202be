//! Configuration loading and management

use anyhow::{Context, Result, bail};
use pagewatch_domain::usecases::CheckMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    /// Seed registry entries; merged into the cache on each run
    #[serde(default)]
    pub pages: Vec<PageSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Normalization strategy: "links" or "rendered"
    #[serde(default = "default_mode")]
    pub mode: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Column width for rendered-text mode
    #[serde(default = "default_render_width")]
    pub render_width: usize,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSeed {
    pub name: String,
    pub url: String,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./cache")
}

fn default_mode() -> String {
    "links".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_render_width() -> usize {
    80
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            mode: default_mode(),
            timeout_secs: default_timeout_secs(),
            render_width: default_render_width(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("PAGEWATCH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn check_mode(&self) -> Result<CheckMode> {
        match self.general.mode.as_str() {
            "links" => Ok(CheckMode::Links),
            "rendered" => Ok(CheckMode::Rendered),
            other => bail!("Unknown mode '{}', expected 'links' or 'rendered'", other),
        }
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# pagewatch configuration

[general]
cache_dir = "./cache"
# "links" compares hyperlink lists and resolves titles for new links;
# "rendered" compares the plain-text rendering line by line.
mode = "links"
timeout_secs = 30
render_width = 80
log_level = "info"

# Seed pages; merged into the registry on each run.
# [[pages]]
# name = "Example News"
# url = "http://example.com/news"

# [[pages]]
# name = "Release Notes"
# url = "http://example.com/releases"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.general.mode, "links");
        assert!(config.check_mode().is_ok());
        assert!(config.pages.is_empty());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let mut config = AppConfig::default();
        config.general.mode = "semantic".to_string();
        assert!(config.check_mode().is_err());
    }

    #[test]
    fn example_toml_parses_back() {
        let parsed: AppConfig = toml_from_example();
        assert_eq!(parsed.general.mode, "links");
    }

    fn toml_from_example() -> AppConfig {
        let parsed = config::Config::builder()
            .add_source(config::File::from_str(
                &AppConfig::example_toml(),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        parsed.try_deserialize().unwrap()
    }
}
