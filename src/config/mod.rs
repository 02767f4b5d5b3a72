//! Configuration loading and management

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::pagination::DEFAULT_PAGE_SIZE;
use crate::response::Locale;

/// Package-level configuration
///
/// All fields have conservative defaults; a zero-config setup serves English
/// messages, hides debug detail and paginates by 10.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Locale for catalog messages
    #[serde(default)]
    pub locale: Locale,

    /// Deployment environment name; anything other than `prod` enables debug
    /// detail in error payloads
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Optional schema prefix applied to generated sort expressions
    #[serde(default)]
    pub table_prefix: Option<String>,

    /// Page size used when a request paginates without an explicit `size`
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
}

fn default_environment() -> String {
    "prod".to_string()
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            environment: default_environment(),
            table_prefix: None,
            default_page_size: default_page_size(),
        }
    }
}

impl RepositoryConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Whether error payloads may carry debug detail
    pub fn debug_enabled(&self) -> bool {
        self.environment != "prod"
    }
}
