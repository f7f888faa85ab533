//! Configuration schema for the template engine.
//!
//! This module defines the configuration structure and validation logic for
//! the settings that shape how templates are executed.

use crate::variables::MissingPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Main configuration structure for the template engine.
///
/// Missing settings fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Request timeout in milliseconds.
    ///
    /// `None` (the default) means no timeout: callers that need a deadline
    /// either set one here or wrap the execution themselves.
    ///
    /// Must be greater than 0 when set.
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Whether to automatically follow HTTP redirects. Defaults to true.
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,

    /// Maximum number of redirects to follow.
    ///
    /// Only used when `follow_redirects` is true. Defaults to 10.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,

    /// Whether to validate SSL/TLS certificates.
    ///
    /// **Warning:** Disabling SSL validation can expose you to security risks.
    #[serde(default = "default_validate_ssl")]
    pub validate_ssl: bool,

    /// Behaviour for placeholders whose path is missing from the data context.
    #[serde(default)]
    pub missing_values: MissingPolicy,

    /// Headers added to every request unless the request sets them itself.
    #[serde(default = "default_headers")]
    pub default_headers: HashMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            follow_redirects: default_follow_redirects(),
            max_redirects: default_max_redirects(),
            validate_ssl: default_validate_ssl(),
            missing_values: MissingPolicy::default(),
            default_headers: default_headers(),
        }
    }
}

impl EngineConfig {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` with a descriptive error message.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout == Some(0) {
            return Err("timeout must be greater than 0".to_string());
        }

        if self
            .default_headers
            .keys()
            .any(|name| name.trim().is_empty())
        {
            return Err("defaultHeaders must not contain empty header names".to_string());
        }

        Ok(())
    }

    /// Returns the timeout as a `Duration`, if one is configured.
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_millis)
    }

    /// Merges this configuration with another, using values from `other`.
    ///
    /// Default headers are combined, with `other` winning on conflicts.
    pub fn merge(&self, other: &EngineConfig) -> Self {
        let mut default_headers = self.default_headers.clone();
        default_headers.extend(other.default_headers.clone());

        Self {
            timeout: other.timeout,
            follow_redirects: other.follow_redirects,
            max_redirects: other.max_redirects,
            validate_ssl: other.validate_ssl,
            missing_values: other.missing_values,
            default_headers,
        }
    }
}

// Default value functions for serde

fn default_follow_redirects() -> bool {
    true
}

fn default_max_redirects() -> u32 {
    10
}

fn default_validate_ssl() -> bool {
    true
}

fn default_headers() -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert(
        "User-Agent".to_string(),
        concat!("request-template/", env!("CARGO_PKG_VERSION")).to_string(),
    );
    headers
}
