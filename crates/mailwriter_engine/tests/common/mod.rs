#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use ego_tree::NodeId;
use mailwriter_core::{ControlView, GenerationRequest};
use mailwriter_engine::{
    ClickHandler, ControlSpec, GenerateError, HostDocument, Locator, MemoryDocument,
    ReplyGenerator,
};
use tokio::sync::Notify;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(mailwriter_logging::initialize_for_tests);
}

/// A reading pane with an open reply window, shaped like the webmail UI.
pub const COMPOSE_PAGE: &str = r#"
<html><body>
  <div class="nH">
    <div class="a3s aiL">  Can we move the meeting to Thursday?  </div>
    <div role="dialog">
      <div class="btC"><div class="dC">Send</div><div class="wG">Attach</div></div>
      <div role="textbox" g_editable="true" contenteditable="true"></div>
    </div>
  </div>
</body></html>
"#;

/// Inbox view: no compose surface at all.
pub const INBOX_PAGE: &str = r#"
<html><body>
  <div class="nH"><table class="F cf zt"><tr><td>Inbox</td></tr></table></div>
</body></html>
"#;

/// Canned generator that records every request it receives.
pub struct FakeGenerator {
    result: Result<String, GenerateError>,
    requests: RefCell<Vec<GenerationRequest>>,
    probe: Option<Box<dyn Fn()>>,
    gate: Option<Rc<Notify>>,
}

impl FakeGenerator {
    pub fn replying(reply: &str) -> Self {
        Self::with_result(Ok(reply.to_string()))
    }

    pub fn failing(err: GenerateError) -> Self {
        Self::with_result(Err(err))
    }

    fn with_result(result: Result<String, GenerateError>) -> Self {
        Self {
            result,
            requests: RefCell::new(Vec::new()),
            probe: None,
            gate: None,
        }
    }

    /// Runs `probe` while the request is in flight.
    pub fn with_probe(mut self, probe: impl Fn() + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    /// Holds the request open until `gate` is notified.
    pub fn with_gate(mut self, gate: Rc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl ReplyGenerator for FakeGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        self.requests.borrow_mut().push(request.clone());
        if let Some(probe) = &self.probe {
            probe();
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.result.clone()
    }
}

/// A page that behaves like [`MemoryDocument`] except where it is told to
/// refuse: attaching the control, or inserting text.
pub struct RefusingDocument {
    pub page: MemoryDocument,
    refuse_attach: bool,
    refuse_insert: bool,
}

impl RefusingDocument {
    pub fn refusing_attach(markup: &str) -> Self {
        Self {
            page: MemoryDocument::parse(markup),
            refuse_attach: true,
            refuse_insert: false,
        }
    }

    pub fn refusing_insert(markup: &str) -> Self {
        Self {
            page: MemoryDocument::parse(markup),
            refuse_attach: false,
            refuse_insert: true,
        }
    }
}

impl HostDocument for RefusingDocument {
    type Node = NodeId;

    fn query(&self, locator: &Locator) -> Option<NodeId> {
        self.page.query(locator)
    }

    fn query_all(&self, locator: &Locator) -> Vec<NodeId> {
        self.page.query_all(locator)
    }

    fn matches_within(&self, node: &NodeId, locator: &Locator) -> bool {
        self.page.matches_within(node, locator)
    }

    fn text_content(&self, node: &NodeId) -> String {
        self.page.text_content(node)
    }

    fn create_control(&self, spec: &ControlSpec, view: ControlView) -> Option<NodeId> {
        self.page.create_control(spec, view)
    }

    fn set_label(&self, node: &NodeId, label: &str) {
        self.page.set_label(node, label);
    }

    fn set_disabled(&self, node: &NodeId, disabled: bool) {
        self.page.set_disabled(node, disabled);
    }

    fn is_disabled(&self, node: &NodeId) -> bool {
        self.page.is_disabled(node)
    }

    fn on_click(&self, node: &NodeId, handler: ClickHandler<NodeId>) {
        self.page.on_click(node, handler);
    }

    fn prepend_child(&self, parent: &NodeId, child: &NodeId) -> bool {
        !self.refuse_attach && self.page.prepend_child(parent, child)
    }

    fn remove(&self, node: &NodeId) {
        self.page.remove(node);
    }

    fn focus(&self, node: &NodeId) {
        self.page.focus(node);
    }

    fn insert_text(&self, text: &str) -> bool {
        !self.refuse_insert && self.page.insert_text(text)
    }

    fn alert(&self, message: &str) {
        self.page.alert(message);
    }
}
