//! Configuration for portfolio operations

use crate::error::{PortfolioError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the dataset path
pub const DATA_PATH_ENV: &str = "PORTFOLIO_DATA_PATH";
/// Environment variable overriding the news file path
pub const NEWS_PATH_ENV: &str = "PORTFOLIO_NEWS_PATH";

/// Configuration for portfolio operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Dataset file: a JSON array of company records
    pub data_path: PathBuf,

    /// News file: a JSON object keyed by company name
    pub news_path: PathBuf,

    /// Result count for ranking and top-by-valuation when none is given
    pub default_limit: usize,

    /// Whether news answers default to the one-line rendering
    pub news_brief: bool,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/portfolio_4_cf_valuations.json"),
            news_path: PathBuf::from("data/news.json"),
            default_limit: 5,
            news_brief: true,
        }
    }
}

impl PortfolioConfig {
    /// Create a new configuration builder
    pub fn builder() -> PortfolioConfigBuilder {
        PortfolioConfigBuilder::default()
    }

    /// Apply path overrides from the environment
    pub fn with_env_paths(mut self) -> Self {
        if let Ok(path) = std::env::var(DATA_PATH_ENV) {
            self.data_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var(NEWS_PATH_ENV) {
            self.news_path = PathBuf::from(path);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.data_path.as_os_str().is_empty() {
            return Err(PortfolioError::ConfigError(
                "data_path must not be empty".to_string(),
            ));
        }

        if self.news_path.as_os_str().is_empty() {
            return Err(PortfolioError::ConfigError(
                "news_path must not be empty".to_string(),
            ));
        }

        if self.default_limit == 0 {
            return Err(PortfolioError::ConfigError(
                "default_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for PortfolioConfig
#[derive(Debug, Default)]
pub struct PortfolioConfigBuilder {
    data_path: Option<PathBuf>,
    news_path: Option<PathBuf>,
    default_limit: Option<usize>,
    news_brief: Option<bool>,
}

impl PortfolioConfigBuilder {
    /// Set the dataset path
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Set the news file path
    pub fn news_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.news_path = Some(path.into());
        self
    }

    /// Set the default ranking limit
    pub fn default_limit(mut self, limit: usize) -> Self {
        self.default_limit = Some(limit);
        self
    }

    /// Set the default news rendering
    pub fn news_brief(mut self, brief: bool) -> Self {
        self.news_brief = Some(brief);
        self
    }

    /// Load path overrides from the environment
    ///
    /// Explicitly set paths take precedence over the environment.
    pub fn with_env_paths(mut self) -> Self {
        if self.data_path.is_none() {
            self.data_path = std::env::var(DATA_PATH_ENV).ok().map(PathBuf::from);
        }
        if self.news_path.is_none() {
            self.news_path = std::env::var(NEWS_PATH_ENV).ok().map(PathBuf::from);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<PortfolioConfig> {
        let defaults = PortfolioConfig::default();

        let config = PortfolioConfig {
            data_path: self.data_path.unwrap_or(defaults.data_path),
            news_path: self.news_path.unwrap_or(defaults.news_path),
            default_limit: self.default_limit.unwrap_or(defaults.default_limit),
            news_brief: self.news_brief.unwrap_or(defaults.news_brief),
        };

        config.validate()?;
        Ok(config)
    }
}
