//! Demo server configuration
//!
//! Layered: YAML file (when given), then `ADMINKIT_`-prefixed environment
//! variables, then CLI overrides applied by `main`.

use adminkit::AdminConfig;
use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,

    /// SeaORM connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Admin site tunables
    #[serde(default)]
    pub admin: AdminConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            database_url: default_database_url(),
            admin: AdminConfig::default(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_database_url() -> String {
    "sqlite::memory:".to_string()
}

/// Load configuration from an optional YAML file plus the environment.
pub fn load(path: Option<&Path>) -> anyhow::Result<DemoConfig> {
    let mut figment = Figment::new();
    if let Some(path) = path {
        figment = figment.merge(Yaml::file(path));
    }
    figment = figment.merge(Env::prefixed("ADMINKIT_").split("__"));
    Ok(figment.extract()?)
}
