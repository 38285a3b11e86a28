//! Optional TOML configuration file
//!
//! ```toml
//! [generator]
//! package = "petstore"
//! output_dir = "generated/petstore"
//!
//! [client]
//! timeout_ms = 2000
//! retries = 2
//! ```
//!
//! Command-line flags override values from the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::application::ApplicationError;
use crate::generation::ClientDefaults;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub package: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub service_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwaggenConfig {
    pub generator: GeneratorConfig,
    /// Defaults baked into the generated client
    pub client: ClientDefaults,
}

impl SwaggenConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ApplicationError> {
        toml::from_str(content).map_err(|e| ApplicationError::ConfigError(e.to_string()))
    }

    pub async fn load(path: &Path) -> Result<Self, ApplicationError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ApplicationError::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}
