//! Configuration types for the FlexService.

use std::env;

use flex_shared::DEFAULT_RESULT_SIZE;

use crate::errors::FlexError;

/// Default search engine URL.
pub const DEFAULT_URL: &str = "http://localhost:9200";

/// Configuration for the FlexService.
///
/// Passed explicitly to the service at construction time. `index` is the
/// collection every entity is indexed under unless the entity overrides it.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexConfig {
    /// Collection (index) name used when an entity has no override.
    pub index: String,
    /// Whether `save`/`delete` keep documents in sync automatically.
    ///
    /// Defaults to `false`, leaving indexing under manual control.
    pub auto_index: bool,
    /// Search engine URL.
    pub url: String,
    /// Result-size cap for query shortcuts. Defaults to 1000.
    pub result_size: usize,
}

impl FlexConfig {
    /// Create a config for the given collection with defaults for everything else.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            auto_index: false,
            url: DEFAULT_URL.to_string(),
            result_size: DEFAULT_RESULT_SIZE,
        }
    }

    pub fn with_auto_index(mut self, auto_index: bool) -> Self {
        self.auto_index = auto_index;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_result_size(mut self, result_size: usize) -> Self {
        self.result_size = result_size;
        self
    }

    /// Load the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_INDEX`: collection name (required)
    /// - `FLEX_AUTO_INDEX`: `true`/`1`/`yes`/`on` to enable auto-index (default: off)
    /// - `OPENSEARCH_URL`: engine URL (default: http://localhost:9200)
    /// - `FLEX_RESULT_SIZE`: result-size cap for query shortcuts (default: 1000)
    ///
    /// # Returns
    ///
    /// * `Ok(FlexConfig)` - The loaded configuration
    /// * `Err(FlexError::ConfigError)` - If `SEARCH_INDEX` is missing or a value is malformed
    pub fn from_env() -> Result<Self, FlexError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, FlexError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let index = lookup("SEARCH_INDEX")
            .filter(|index| !index.trim().is_empty())
            .ok_or_else(|| FlexError::config("SEARCH_INDEX is not set"))?;

        let mut config = Self::new(index);

        if let Some(raw) = lookup("FLEX_AUTO_INDEX") {
            config.auto_index = parse_flag(&raw).ok_or_else(|| {
                FlexError::config(format!("FLEX_AUTO_INDEX must be a boolean, got '{}'", raw))
            })?;
        }

        if let Some(url) = lookup("OPENSEARCH_URL") {
            config.url = url;
        }

        if let Some(raw) = lookup("FLEX_RESULT_SIZE") {
            config.result_size = raw.parse::<usize>().map_err(|e| {
                FlexError::config(format!("FLEX_RESULT_SIZE must be a number: {}", e))
            })?;
        }

        Ok(config)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_new_defaults() {
        let config = FlexConfig::new("blog");
        assert_eq!(config.index, "blog");
        assert!(!config.auto_index);
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.result_size, 1000);
    }

    #[test]
    fn test_from_lookup_requires_index() {
        let result = FlexConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(FlexError::ConfigError(_))));

        let result = FlexConfig::from_lookup(lookup_from(&[("SEARCH_INDEX", "  ")]));
        assert!(matches!(result, Err(FlexError::ConfigError(_))));
    }

    #[test]
    fn test_from_lookup_reads_all_values() {
        let config = FlexConfig::from_lookup(lookup_from(&[
            ("SEARCH_INDEX", "blog"),
            ("FLEX_AUTO_INDEX", "TRUE"),
            ("OPENSEARCH_URL", "http://search:9200"),
            ("FLEX_RESULT_SIZE", "50"),
        ]))
        .unwrap();

        assert_eq!(
            config,
            FlexConfig::new("blog")
                .with_auto_index(true)
                .with_url("http://search:9200")
                .with_result_size(50)
        );
    }

    #[test]
    fn test_from_lookup_rejects_bad_flag() {
        let result = FlexConfig::from_lookup(lookup_from(&[
            ("SEARCH_INDEX", "blog"),
            ("FLEX_AUTO_INDEX", "sometimes"),
        ]));
        assert!(matches!(result, Err(FlexError::ConfigError(_))));
    }

    #[test]
    fn test_from_lookup_rejects_bad_result_size() {
        let result = FlexConfig::from_lookup(lookup_from(&[
            ("SEARCH_INDEX", "blog"),
            ("FLEX_RESULT_SIZE", "lots"),
        ]));
        assert!(matches!(result, Err(FlexError::ConfigError(_))));
    }
}
