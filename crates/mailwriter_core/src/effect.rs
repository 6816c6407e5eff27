use crate::ControlView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Push label and enabled flag onto the injected control.
    ApplyView(ControlView),
    /// Write the generated reply into the editable region at the caret.
    InsertReply { reply: String },
    /// Raise a blocking alert in the host page.
    Alert { message: String },
}
