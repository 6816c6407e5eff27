//! Built-in defaults matching the current webmail compose UI.
//!
//! Every list is in priority order: the first selector that matches wins.

pub const GENERATE_ENDPOINT: &str = "http://localhost:8080/api/email/generate";

/// Wait after a compose surface shows up before touching its toolbar.
pub const SETTLE_DELAY_MS: u64 = 500;

pub const CONNECT_TIMEOUT_MS: u64 = 10_000;

pub const TOOLBAR_SELECTORS: &[&str] = &[".btC", ".aDh", "[role=\"toolbar\"]", ".gU.Up"];

pub const EMAIL_BODY_SELECTORS: &[&str] = &[
    ".h7",
    ".a3s.aiL",
    ".gmail_quote",
    "[role=\"presentation\"]",
];

pub const EDITABLE_REGION_SELECTORS: &[&str] = &["[role=\"textbox\"][g_editable=\"true\"]"];

pub const COMPOSE_SIGNATURE_SELECTORS: &[&str] = &[".aDh", ".btC", "[role=\"dialog\"]"];

/// Native button classes plus our own styling hook.
pub const CONTROL_CLASS_NAME: &str = "T-I J-J5-Ji aoO v7 T-I-atl L3 ai-reply-button";
pub const CONTROL_ROLE: &str = "button";
pub const CONTROL_TOOLTIP: &str = "Generate AI Reply";
pub const CONTROL_MARGIN_RIGHT: &str = "8px";
pub const CONTROL_MARKER_ATTRIBUTE: &str = "data-mailwriter-control";
