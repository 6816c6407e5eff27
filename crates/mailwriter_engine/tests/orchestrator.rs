mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{init_logging, FakeGenerator, RefusingDocument, COMPOSE_PAGE};
use ego_tree::NodeId;
use futures_util::future;
use mailwriter_core::{GenerationRequest, FAILURE_ALERT};
use mailwriter_engine::{
    ClickOutcome, ControlInjector, GenerateError, HostDocument, Injector, LocatorSet,
    MemoryDocument, RequestOrchestrator,
};
use pretty_assertions::assert_eq;
use tokio::sync::Notify;

const MARKER: &str = "[data-mailwriter-control]";

struct Page {
    document: Rc<MemoryDocument>,
    orchestrator: Rc<RequestOrchestrator<MemoryDocument>>,
    generator: Rc<FakeGenerator>,
    control: NodeId,
}

fn page_with(markup: &str, generator: FakeGenerator) -> Page {
    let document = Rc::new(MemoryDocument::parse(markup));
    page_on(document, generator)
}

fn page_on(document: Rc<MemoryDocument>, generator: FakeGenerator) -> Page {
    let generator = Rc::new(generator);
    let locators = LocatorSet::default();
    let orchestrator = Rc::new(RequestOrchestrator::new(
        Rc::clone(&document),
        Rc::clone(&generator) as Rc<dyn mailwriter_engine::ReplyGenerator>,
        locators.email_body,
        locators.editable_region,
        "professional",
    ));
    let injector = ControlInjector::new(
        Rc::clone(&document),
        locators.toolbar,
        Default::default(),
        orchestrator.click_handler(),
    )
    .unwrap();
    injector.inject();
    let control = document.find(MARKER).unwrap();
    Page {
        document,
        orchestrator,
        generator,
        control,
    }
}

fn editable_text(document: &MemoryDocument) -> String {
    let region = document.find("[role=\"textbox\"]").unwrap();
    document.text_content(&region)
}

#[tokio::test]
async fn successful_reply_is_inserted_into_the_compose_box() {
    init_logging();
    let page = page_with(COMPOSE_PAGE, FakeGenerator::replying("Thanks, sounds good."));

    let outcome = page.orchestrator.handle_click(&page.control).await;

    assert_eq!(outcome, ClickOutcome::Inserted);
    assert_eq!(editable_text(&page.document), "Thanks, sounds good.");
    assert_eq!(
        page.document.focused(),
        page.document.find("[role=\"textbox\"]")
    );
    assert!(page.document.alerts().is_empty());
    assert_eq!(
        page.generator.requests(),
        vec![GenerationRequest::new(
            "Can we move the meeting to Thursday?",
            "professional"
        )]
    );
}

#[tokio::test]
async fn reply_is_inserted_at_caret_preserving_draft() {
    init_logging();
    let page = page_with(
        r#"<html><body><div role="dialog">
          <div class="btC"></div>
          <div role="textbox" g_editable="true">Hi Ana,--
Sent from my desk</div>
        </div></body></html>"#,
        FakeGenerator::replying("Thanks, sounds good."),
    );
    let region = page.document.find("[role=\"textbox\"]").unwrap();
    page.document.place_caret(region, "Hi Ana,".chars().count());

    let outcome = page.orchestrator.handle_click(&page.control).await;

    assert_eq!(outcome, ClickOutcome::Inserted);
    assert_eq!(
        editable_text(&page.document),
        "Hi Ana,Thanks, sounds good.--\nSent from my desk"
    );
}

#[tokio::test]
async fn control_is_disabled_while_pending_and_restored_after_success() {
    init_logging();
    let document = Rc::new(MemoryDocument::parse(COMPOSE_PAGE));
    let seen: Rc<RefCell<Vec<(bool, String)>>> = Rc::default();
    let probe_document = Rc::clone(&document);
    let probe_seen = Rc::clone(&seen);
    let generator = FakeGenerator::replying("Sure.").with_probe(move || {
        let control = probe_document.find(MARKER).unwrap();
        probe_seen.borrow_mut().push((
            probe_document.is_disabled(&control),
            probe_document.text_content(&control),
        ));
    });
    let page = page_on(document, generator);

    page.orchestrator.handle_click(&page.control).await;

    assert_eq!(*seen.borrow(), vec![(true, "Generating...".to_string())]);
    assert!(!page.document.is_disabled(&page.control));
    assert_eq!(page.document.text_content(&page.control), "AI Reply");
}

#[tokio::test]
async fn server_error_restores_control_and_alerts_without_inserting() {
    init_logging();
    let document = Rc::new(MemoryDocument::parse(COMPOSE_PAGE));
    let seen: Rc<RefCell<Vec<bool>>> = Rc::default();
    let probe_document = Rc::clone(&document);
    let probe_seen = Rc::clone(&seen);
    let generator = FakeGenerator::failing(GenerateError::HttpStatus(500)).with_probe(move || {
        let control = probe_document.find(MARKER).unwrap();
        probe_seen
            .borrow_mut()
            .push(probe_document.is_disabled(&control));
    });
    let page = page_on(document, generator);

    let outcome = page.orchestrator.handle_click(&page.control).await;

    assert_eq!(outcome, ClickOutcome::Failed);
    assert_eq!(*seen.borrow(), vec![true]);
    assert_eq!(page.document.alerts(), vec![FAILURE_ALERT.to_string()]);
    assert_eq!(editable_text(&page.document), "");
    assert!(!page.document.is_disabled(&page.control));
    assert_eq!(page.document.text_content(&page.control), "AI Reply");
}

#[tokio::test]
async fn network_failure_is_reported_once_and_not_retried() {
    init_logging();
    let page = page_with(
        COMPOSE_PAGE,
        FakeGenerator::failing(GenerateError::Network("connection refused".to_string())),
    );

    let outcome = page.orchestrator.handle_click(&page.control).await;

    assert_eq!(outcome, ClickOutcome::Failed);
    assert_eq!(page.generator.requests().len(), 1);
    assert_eq!(page.document.alerts().len(), 1);
}

#[tokio::test]
async fn missing_email_body_sends_empty_content() {
    init_logging();
    let page = page_with(
        r#"<html><body><div role="dialog">
          <div class="btC"></div>
          <div role="textbox" g_editable="true"></div>
        </div></body></html>"#,
        FakeGenerator::replying("Hello!"),
    );

    let outcome = page.orchestrator.handle_click(&page.control).await;

    assert_eq!(outcome, ClickOutcome::Inserted);
    assert_eq!(
        page.generator.requests(),
        vec![GenerationRequest::new("", "professional")]
    );
}

#[tokio::test]
async fn missing_compose_box_still_counts_as_success() {
    init_logging();
    let page = page_with(
        r#"<html><body><div class="a3s aiL">Ping</div><div class="btC"></div></body></html>"#,
        FakeGenerator::replying("Pong"),
    );

    let outcome = page.orchestrator.handle_click(&page.control).await;

    assert_eq!(outcome, ClickOutcome::EditableRegionMissing);
    assert!(page.document.alerts().is_empty());
    assert!(!page.document.is_disabled(&page.control));
    assert_eq!(page.document.text_content(&page.control), "AI Reply");
}

#[tokio::test]
async fn clicks_while_pending_are_inert() {
    init_logging();
    let gate = Rc::new(Notify::new());
    let page = page_with(
        COMPOSE_PAGE,
        FakeGenerator::replying("Once.").with_gate(Rc::clone(&gate)),
    );
    let first = page.document.click(page.control).unwrap();

    let meanwhile = async {
        tokio::task::yield_now().await;
        assert!(page.document.is_disabled(&page.control));
        assert!(page.document.click(page.control).is_none());
        let outcome = page.orchestrator.handle_click(&page.control).await;
        gate.notify_one();
        outcome
    };
    let ((), second) = future::join(first, meanwhile).await;

    assert_eq!(second, ClickOutcome::Ignored);
    assert_eq!(page.generator.requests().len(), 1);
    assert_eq!(editable_text(&page.document), "Once.");
    assert!(!page.document.is_disabled(&page.control));
}

#[tokio::test]
async fn dropping_the_pending_handler_still_restores_the_control() {
    init_logging();
    let gate = Rc::new(Notify::new());
    let page = page_with(
        COMPOSE_PAGE,
        FakeGenerator::replying("never").with_gate(Rc::clone(&gate)),
    );

    {
        let pending = page.orchestrator.handle_click(&page.control);
        let mut pending = Box::pin(pending);
        assert!(futures_util::poll!(&mut pending).is_pending());
        assert!(page.document.is_disabled(&page.control));
    }

    assert!(!page.document.is_disabled(&page.control));
    assert_eq!(page.document.text_content(&page.control), "AI Reply");
    assert_eq!(editable_text(&page.document), "");
}

#[tokio::test]
async fn control_can_be_used_again_after_a_failure() {
    init_logging();
    let page = page_with(
        COMPOSE_PAGE,
        FakeGenerator::failing(GenerateError::HttpStatus(503)),
    );

    assert_eq!(
        page.orchestrator.handle_click(&page.control).await,
        ClickOutcome::Failed
    );
    assert_eq!(
        page.orchestrator.handle_click(&page.control).await,
        ClickOutcome::Failed
    );

    assert_eq!(page.generator.requests().len(), 2);
    assert_eq!(page.document.alerts().len(), 2);
}

#[tokio::test]
async fn signature_block_survives_the_inserted_reply() {
    init_logging();
    let page = page_with(
        r#"<html><body><div role="dialog">
          <div class="btC"></div>
          <div role="textbox" g_editable="true"><div>Hi Ana,</div><div class="gmail_signature">Sig</div></div>
        </div></body></html>"#,
        FakeGenerator::replying("Thanks, sounds good."),
    );
    let region = page.document.find("[role=\"textbox\"]").unwrap();
    page.document.place_caret(region, "Hi Ana,".chars().count());

    let outcome = page.orchestrator.handle_click(&page.control).await;

    assert_eq!(outcome, ClickOutcome::Inserted);
    assert_eq!(page.document.count(".gmail_signature"), 1);
    let signature = page.document.find(".gmail_signature").unwrap();
    assert_eq!(page.document.text_content(&signature), "Sig");
    assert_eq!(
        editable_text(&page.document),
        "Hi Ana,Thanks, sounds good.Sig"
    );
}

#[tokio::test]
async fn refused_insertion_is_reported_and_control_restored() {
    init_logging();
    let document = Rc::new(RefusingDocument::refusing_insert(COMPOSE_PAGE));
    let locators = LocatorSet::default();
    let orchestrator = Rc::new(RequestOrchestrator::new(
        Rc::clone(&document),
        Rc::new(FakeGenerator::replying("Thanks, sounds good.")),
        locators.email_body,
        locators.editable_region,
        "professional",
    ));
    let injector = ControlInjector::new(
        Rc::clone(&document),
        locators.toolbar,
        Default::default(),
        orchestrator.click_handler(),
    )
    .unwrap();
    assert_eq!(injector.inject(), mailwriter_engine::InjectOutcome::Injected);
    let control = document.page.find(MARKER).unwrap();

    let outcome = orchestrator.handle_click(&control).await;

    assert_eq!(outcome, ClickOutcome::InsertionRejected);
    assert!(document.page.alerts().is_empty());
    assert!(!document.is_disabled(&control));
    assert_eq!(document.text_content(&control), "AI Reply");
    assert_eq!(editable_text(&document.page), "");
}
