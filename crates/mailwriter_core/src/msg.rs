#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User clicked the injected control.
    Clicked,
    /// The generation service answered with a usable reply.
    ReplyReceived { reply: String },
    /// Network failure or non-success status from the generation service.
    RequestFailed,
    /// The click handler is exiting, on any path.
    Settled,
}
