use std::rc::Rc;

use futures_util::FutureExt;
use mailwriter_core::{update, Effect, GenerationRequest, Msg, RequestCycle};
use mailwriter_logging::{mw_debug, mw_error, mw_warn};

use crate::generate::{GenerateError, ReplyGenerator};
use crate::host::{apply_view, ClickHandler, HostDocument};
use crate::locator::LocatorList;

/// How one click ended, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The control was disabled; a request is already in flight.
    Ignored,
    Inserted,
    /// The request succeeded but there was nowhere to put the reply.
    EditableRegionMissing,
    /// The request succeeded but the host refused the insertion.
    InsertionRejected,
    Failed,
}

/// The control's click handler: one generation request per click.
pub struct RequestOrchestrator<D: HostDocument> {
    document: Rc<D>,
    generator: Rc<dyn ReplyGenerator>,
    email_body: LocatorList,
    editable_region: LocatorList,
    tone: String,
}

impl<D: HostDocument + 'static> RequestOrchestrator<D> {
    pub fn new(
        document: Rc<D>,
        generator: Rc<dyn ReplyGenerator>,
        email_body: LocatorList,
        editable_region: LocatorList,
        tone: impl Into<String>,
    ) -> Self {
        Self {
            document,
            generator,
            email_body,
            editable_region,
            tone: tone.into(),
        }
    }

    /// Handler to register on every injected control.
    pub fn click_handler(self: &Rc<Self>) -> ClickHandler<D::Node> {
        let orchestrator = Rc::clone(self);
        Rc::new(move |control: D::Node| {
            let orchestrator = Rc::clone(&orchestrator);
            async move {
                orchestrator.handle_click(&control).await;
            }
            .boxed_local()
        })
    }

    pub async fn handle_click(&self, control: &D::Node) -> ClickOutcome {
        if self.document.is_disabled(control) {
            mw_debug!("Ignoring click while a reply is being generated");
            return ClickOutcome::Ignored;
        }

        let mut cycle = CycleGuard::new(self.document.as_ref(), control);
        cycle.dispatch(Msg::Clicked);

        let msg = match self.request_reply().await {
            Ok(reply) => Msg::ReplyReceived { reply },
            Err(err) => {
                mw_error!("Reply generation failed: {}", err);
                Msg::RequestFailed
            }
        };

        let mut outcome = ClickOutcome::Failed;
        for effect in cycle.dispatch(msg) {
            match effect {
                Effect::InsertReply { reply } => outcome = self.insert_reply(&reply),
                Effect::Alert { message } => self.document.alert(&message),
                Effect::ApplyView(_) => {}
            }
        }
        outcome
    }

    async fn request_reply(&self) -> Result<String, GenerateError> {
        let email_content = self
            .email_body
            .read_text(self.document.as_ref())
            .unwrap_or_else(|| {
                mw_debug!("Email body not found, sending empty content");
                String::new()
            });
        let request = GenerationRequest::new(email_content, self.tone.clone());
        self.generator.generate(&request).await
    }

    fn insert_reply(&self, reply: &str) -> ClickOutcome {
        let Some(region) = self.editable_region.resolve(self.document.as_ref()) else {
            mw_error!("Compose box was not found");
            return ClickOutcome::EditableRegionMissing;
        };
        self.document.focus(&region);
        if self.document.insert_text(reply) {
            ClickOutcome::Inserted
        } else {
            mw_warn!("Host refused to insert the generated reply");
            ClickOutcome::InsertionRejected
        }
    }
}

/// Owns the request cycle for one click and settles it back to idle when
/// dropped, whichever way the handler exits.
struct CycleGuard<'a, D: HostDocument> {
    document: &'a D,
    control: &'a D::Node,
    cycle: RequestCycle,
}

impl<'a, D: HostDocument> CycleGuard<'a, D> {
    fn new(document: &'a D, control: &'a D::Node) -> Self {
        Self {
            document,
            control,
            cycle: RequestCycle::new(),
        }
    }

    /// Applies view changes directly and hands back the remaining effects.
    fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let (cycle, effects) = update(std::mem::take(&mut self.cycle), msg);
        self.cycle = cycle;
        let mut remaining = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                Effect::ApplyView(view) => apply_view(self.document, self.control, view),
                other => remaining.push(other),
            }
        }
        remaining
    }
}

impl<D: HostDocument> Drop for CycleGuard<'_, D> {
    fn drop(&mut self) {
        self.dispatch(Msg::Settled);
    }
}
