//! Configuration loading for the template engine.
//!
//! Settings are read from a JSON document under the `"request-template"` key
//! and merged with defaults. The resulting `EngineConfig` is an ordinary value
//! handed to the HTTP client and executor; there is no process-wide instance.

pub mod schema;

pub use schema::EngineConfig;

use serde_json::Value;

/// Key under which engine settings live in a settings document.
pub const SETTINGS_KEY: &str = "request-template";

/// Loads configuration from an optional settings document.
///
/// Malformed settings are logged and ignored in favour of the defaults; the
/// merged result is then validated.
///
/// # Example
///
/// ```
/// use request_template::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "request-template": {
///         "timeout": 60000,
///         "validateSsl": false
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.timeout, Some(60000));
/// assert!(!config.validate_ssl);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<EngineConfig, String> {
    let mut config = EngineConfig::default();

    if let Some(settings) = settings_json.as_ref().and_then(|s| s.get(SETTINGS_KEY)) {
        match serde_json::from_value::<EngineConfig>(settings.clone()) {
            Ok(user_config) => config = config.merge(&user_config),
            Err(e) => log::warn!(
                "Failed to parse {} settings: {}. Using defaults.",
                SETTINGS_KEY,
                e
            ),
        }
    }

    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {}", e))?;

    Ok(config)
}
