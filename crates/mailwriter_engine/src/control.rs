use serde::{Deserialize, Serialize};

use crate::constants::{
    CONTROL_CLASS_NAME, CONTROL_MARGIN_RIGHT, CONTROL_MARKER_ATTRIBUTE, CONTROL_ROLE,
    CONTROL_TOOLTIP,
};
use crate::locator::{Locator, LocatorError};

/// How the injected control looks and how it is recognised later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSpec {
    pub class_name: String,
    pub role: String,
    pub tooltip: String,
    pub margin_right: String,
    pub marker_attribute: String,
}

impl ControlSpec {
    /// Locator for any instance carrying the marker attribute.
    pub fn marker_locator(&self) -> Result<Locator, LocatorError> {
        Locator::parse(&format!("[{}]", self.marker_attribute))
    }
}

impl Default for ControlSpec {
    fn default() -> Self {
        Self {
            class_name: CONTROL_CLASS_NAME.to_string(),
            role: CONTROL_ROLE.to_string(),
            tooltip: CONTROL_TOOLTIP.to_string(),
            margin_right: CONTROL_MARGIN_RIGHT.to_string(),
            marker_attribute: CONTROL_MARKER_ATTRIBUTE.to_string(),
        }
    }
}
