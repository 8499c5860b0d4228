//! Admin site configuration

use serde::Deserialize;

/// Tunables for a mounted admin site.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    /// Site title, served with the navigation menu
    #[serde(default = "default_title")]
    pub title: String,

    /// Ceiling for the `per_page` query parameter
    #[serde(default = "default_max_per_page")]
    pub max_per_page: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            max_per_page: default_max_per_page(),
        }
    }
}

fn default_title() -> String {
    "Admin".to_string()
}

fn default_max_per_page() -> u64 {
    100
}
