use std::time::Duration;

use mailwriter_core::DEFAULT_TONE;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{CONNECT_TIMEOUT_MS, GENERATE_ENDPOINT, SETTLE_DELAY_MS};
use crate::control::ControlSpec;
use crate::locator::{LocatorError, LocatorSet};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(String),
    #[error("invalid endpoint {endpoint:?}: {message}")]
    Endpoint { endpoint: String, message: String },
    #[error(transparent)]
    Locator(#[from] LocatorError),
}

/// Everything tunable about the augmentation, as data.
///
/// Missing fields fall back to the defaults, so a settings file only needs
/// to name what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentSettings {
    pub endpoint: String,
    pub tone: String,
    pub settle_delay_ms: u64,
    pub connect_timeout_ms: u64,
    pub locators: LocatorSet,
    pub control: ControlSpec,
}

impl Default for AugmentSettings {
    fn default() -> Self {
        Self {
            endpoint: GENERATE_ENDPOINT.to_string(),
            tone: DEFAULT_TONE.to_string(),
            settle_delay_ms: SETTLE_DELAY_MS,
            connect_timeout_ms: CONNECT_TIMEOUT_MS,
            locators: LocatorSet::default(),
            control: ControlSpec::default(),
        }
    }
}

impl AugmentSettings {
    pub fn from_ron(text: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            ron::from_str(text).map_err(|err| SettingsError::Parse(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_ron(&self) -> Result<String, SettingsError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())
            .map_err(|err| SettingsError::Parse(err.to_string()))
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let endpoint = Url::parse(&self.endpoint).map_err(|err| SettingsError::Endpoint {
            endpoint: self.endpoint.clone(),
            message: err.to_string(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(SettingsError::Endpoint {
                endpoint: self.endpoint.clone(),
                message: format!("unsupported scheme {}", endpoint.scheme()),
            });
        }
        self.control.marker_locator()?;
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
