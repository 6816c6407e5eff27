use mailwriter_engine::{AugmentSettings, SettingsError};
use mailwriter_logging::mw_warn;

/// Settings text shipped inside the content script.
pub const EMBEDDED_SETTINGS: &str = include_str!("../settings.ron");

pub fn load_settings(text: &str) -> Result<AugmentSettings, SettingsError> {
    AugmentSettings::from_ron(text)
}

/// The embedded settings, or the built-in defaults if they do not load.
///
/// A broken settings file must not keep the control off the page.
pub fn embedded_settings() -> AugmentSettings {
    load_settings(EMBEDDED_SETTINGS).unwrap_or_else(|err| {
        mw_warn!("Ignoring embedded settings: {}", err);
        AugmentSettings::default()
    })
}
