use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FinderConfig {
    /// Recipe API connection settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Search and pagination settings
    #[serde(default)]
    pub search: SearchConfig,
    /// Where favorites, recent searches and preferences are persisted
    #[serde(default)]
    pub storage: StorageConfig,
    /// Draft search autosave settings
    #[serde(default)]
    pub draft: DraftConfig,
}

/// Configuration for the recipe lookup API
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// API key for authentication (can also be set via SPOONACULAR_API_KEY)
    pub api_key: Option<String>,
    /// Base URL for the API endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

impl ApiConfig {
    /// Resolve the API key, falling back to the environment
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("SPOONACULAR_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Configuration for searching and paging
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Results requested per page, also the cap on ingredient matches
    #[serde(default = "default_recipes_per_page")]
    pub recipes_per_page: usize,
    /// Fixed pause between sequential detail look-ups in milliseconds
    #[serde(default = "default_detail_delay_ms")]
    pub detail_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            recipes_per_page: default_recipes_per_page(),
            detail_delay_ms: default_detail_delay_ms(),
        }
    }
}

impl SearchConfig {
    pub fn detail_delay(&self) -> Duration {
        Duration::from_millis(self.detail_delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON file holding the persisted entries
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DraftConfig {
    /// Quiet period after the last keystroke before the draft is saved
    #[serde(default = "default_quiet_period_ms")]
    pub quiet_period_ms: u64,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: default_quiet_period_ms(),
        }
    }
}

impl DraftConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://api.spoonacular.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_recipes_per_page() -> usize {
    12
}

fn default_detail_delay_ms() -> u64 {
    100
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("recipe_finder.json")
}

fn default_quiet_period_ms() -> u64 {
    1000
}

impl FinderConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_FINDER__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_FINDER__API__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config("config")
    }
}

/// Load configuration from the named file (extension optional) and the environment
pub fn load_config(file_name: &str) -> Result<FinderConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name(file_name).required(false))
        // Use double underscore for nested: RECIPE_FINDER__SEARCH__DETAIL_DELAY_MS
        .add_source(
            Environment::with_prefix("RECIPE_FINDER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let config = FinderConfig::default();
        assert_eq!(config.api.base_url, "https://api.spoonacular.com");
        assert_eq!(config.api.timeout, 30);
        assert_eq!(config.search.recipes_per_page, 12);
        assert_eq!(config.search.detail_delay(), Duration::from_millis(100));
        assert_eq!(config.storage.path, PathBuf::from("recipe_finder.json"));
        assert_eq!(config.draft.quiet_period(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[api]
api_key = "file-key"
base_url = "http://localhost:9999"

[search]
detail_delay_ms = 5
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = load_config(&path).unwrap();

        assert_eq!(config.api.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.api.base_url, "http://localhost:9999");
        assert_eq!(config.api.timeout, 30);
        assert_eq!(config.search.detail_delay_ms, 5);
        assert_eq!(config.search.recipes_per_page, 12);
    }

    #[test]
    fn test_load_config_without_file() {
        let config = load_config("definitely-not-a-config-file").unwrap();
        assert_eq!(config.api.base_url, "https://api.spoonacular.com");
        assert_eq!(config.search.recipes_per_page, 12);
        assert_eq!(config.storage.path, PathBuf::from("recipe_finder.json"));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let api = ApiConfig {
            api_key: Some("  ".to_string()),
            ..ApiConfig::default()
        };
        if std::env::var("SPOONACULAR_API_KEY").is_err() {
            assert!(api.resolved_api_key().is_none());
        }

        let api = ApiConfig {
            api_key: Some("abc".to_string()),
            ..ApiConfig::default()
        };
        assert_eq!(api.resolved_api_key().as_deref(), Some("abc"));
    }
}
