pub const IDLE_LABEL: &str = "AI Reply";
pub const BUSY_LABEL: &str = "Generating...";
pub const FAILURE_ALERT: &str = "Failed to generate reply";

/// What the injected control should currently show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlView {
    pub label: &'static str,
    pub enabled: bool,
}

impl ControlView {
    pub const IDLE: ControlView = ControlView {
        label: IDLE_LABEL,
        enabled: true,
    };

    pub const BUSY: ControlView = ControlView {
        label: BUSY_LABEL,
        enabled: false,
    };
}

impl Default for ControlView {
    fn default() -> Self {
        Self::IDLE
    }
}
