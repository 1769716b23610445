use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AtlasError, AtlasResult};
use crate::globe::GlobeConfig;
use crate::narrative::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiConfig};
use crate::radar::{RadarConfig, ShareChartConfig};
use crate::topology::{DEFAULT_BOUNDARY_OBJECT, DEFAULT_BOUNDARY_URL};

/// Primary credential variable; the second is a fallback.
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Application-wide configuration.
///
/// Every field has a serde default, so partial JSON documents are accepted.
/// The credential is never serialized back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_boundary_url")]
    pub boundary_url: String,
    #[serde(default = "default_boundary_object")]
    pub boundary_object: String,
    #[serde(default)]
    pub globe: GlobeConfig,
    #[serde(default)]
    pub radar: RadarConfig,
    #[serde(default)]
    pub share: ShareChartConfig,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
            boundary_url: default_boundary_url(),
            boundary_object: default_boundary_object(),
            globe: GlobeConfig::default(),
            radar: RadarConfig::default(),
            share: ShareChartConfig::default(),
        }
    }
}

impl AtlasConfig {
    /// Defaults plus the credential from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_api_key(read_api_key(|name| std::env::var(name).ok()))
    }

    pub fn from_json_str(raw: &str) -> AtlasResult<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| AtlasError::InvalidData(format!("failed to parse atlas config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_globe(mut self, globe: GlobeConfig) -> Self {
        self.globe = globe;
        self
    }

    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Client settings; fails with `MissingCredential` when no key is set.
    pub fn gemini_config(&self) -> AtlasResult<GeminiConfig> {
        let api_key = self.api_key.clone().ok_or(AtlasError::MissingCredential)?;
        Ok(GeminiConfig::new(api_key)
            .with_model(self.model.clone())
            .with_endpoint(self.endpoint.clone())
            .with_timeout_secs(self.request_timeout_secs))
    }

    pub fn validate(&self) -> AtlasResult<()> {
        if self.boundary_url.trim().is_empty() || self.boundary_object.trim().is_empty() {
            return Err(AtlasError::InvalidData(
                "boundary url and object must not be empty".to_owned(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(AtlasError::InvalidData(
                "request timeout must be > 0 seconds".to_owned(),
            ));
        }
        self.globe.validate()?;
        self.radar.validate()?;
        self.share.validate()
    }
}

fn read_api_key(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    let found = API_KEY_VARS
        .iter()
        .find_map(|name| {
            lookup(*name)
                .filter(|value| !value.trim().is_empty())
                .map(|value| (*name, value))
        });
    match &found {
        Some((name, _)) => debug!(source = name, "api credential found"),
        None => debug!("no api credential in environment"),
    }
    found.map(|(_, value)| value)
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_owned()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_boundary_url() -> String {
    DEFAULT_BOUNDARY_URL.to_owned()
}

fn default_boundary_object() -> String {
    DEFAULT_BOUNDARY_OBJECT.to_owned()
}

#[cfg(test)]
mod tests {
    use super::{AtlasConfig, read_api_key};
    use crate::error::AtlasError;

    #[test]
    fn api_key_prefers_primary_variable() {
        let both = |name: &str| Some(format!("{name}-value"));
        assert_eq!(read_api_key(both).as_deref(), Some("API_KEY-value"));

        let fallback = |name: &str| (name == "GEMINI_API_KEY").then(|| "g".to_owned());
        assert_eq!(read_api_key(fallback).as_deref(), Some("g"));

        let blank = |_: &str| Some("   ".to_owned());
        assert_eq!(read_api_key(blank), None);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            AtlasConfig::from_json_str(r#"{ "model": "m", "globe": { "scale": 200 } }"#)
                .expect("config");
        assert_eq!(config.model, "m");
        assert_eq!(config.globe.scale, 200.0);
        assert_eq!(config.globe.viewport.width, 800);
        assert!(!config.has_credential());
        assert!(matches!(
            config.gemini_config(),
            Err(AtlasError::MissingCredential)
        ));
    }

    #[test]
    fn credential_is_not_serialized() {
        let config = AtlasConfig::default().with_api_key(Some("secret".to_owned()));
        let json = serde_json::to_string(&config).expect("json");
        assert!(!json.contains("secret"));
        assert_eq!(config.gemini_config().expect("gemini").api_key, "secret");
    }
}
