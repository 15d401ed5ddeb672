// Configuration utilities for the songcredits engine
//
// The platform keeps one JSON configuration document for all of its
// services. Engine settings live in the "attribution" section, looked
// up in the "services" subtree first with a top-level fallback for
// configs written before the subtree existed.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

fn default_unknown_artist() -> String {
    "Unknown Artist".to_string()
}

fn default_page_size() -> usize {
    50
}

/// Settings for the attribution engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionConfig {
    /// Extra separator literals, split after the built-in set
    #[serde(default)]
    pub extra_separators: Vec<String>,

    /// Display name credited when a song has no resolvable artist
    #[serde(default = "default_unknown_artist")]
    pub unknown_artist: String,

    /// Page size used when a caller does not request one
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            extra_separators: Vec::new(),
            unknown_artist: default_unknown_artist(),
            default_page_size: default_page_size(),
        }
    }
}

/// Helper function to get a service's configuration section
///
/// Looks in the "services" subtree first, then falls back to the old
/// top-level layout for configs that predate it.
///
/// # Arguments
/// * `config` - The configuration JSON object
/// * `service_name` - The service section to look up (e.g. "attribution")
///
/// # Returns
/// * `Option<&serde_json::Value>` - The section if present
pub fn get_service_config<'a>(
    config: &'a serde_json::Value,
    service_name: &str,
) -> Option<&'a serde_json::Value> {
    if let Some(services) = config.get("services") {
        if let Some(service_config) = services.get(service_name) {
            debug!("Found {} configuration in services section", service_name);
            return Some(service_config);
        }
    }

    if let Some(service_config) = config.get(service_name) {
        debug!(
            "Found {} configuration at top level (legacy structure)",
            service_name
        );
        return Some(service_config);
    }

    debug!("No {} configuration found", service_name);
    None
}

impl AttributionConfig {
    /// Read the attribution section out of the platform config document
    ///
    /// A missing section or an unparsable one yields the defaults; a bad
    /// config must not keep artist pages from rendering.
    pub fn from_config(config: &serde_json::Value) -> Self {
        match get_service_config(config, "attribution") {
            Some(section) => match serde_json::from_value(section.clone()) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("Invalid attribution configuration, using defaults: {}", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }
}
