use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use futures_util::stream::Stream;
use mailwriter_logging::mw_info;

use crate::generate::ReplyGenerator;
use crate::host::HostDocument;
use crate::injector::ControlInjector;
use crate::orchestrator::RequestOrchestrator;
use crate::settings::{AugmentSettings, SettingsError};
use crate::watcher::{MutationBatch, MutationWatcher};

/// The whole controller for one page: watcher, injector and click handler
/// sharing a single host document.
pub struct Augmenter<D: HostDocument> {
    orchestrator: Rc<RequestOrchestrator<D>>,
    watcher: MutationWatcher<D, ControlInjector<D>>,
}

impl<D: HostDocument + 'static> Augmenter<D> {
    pub fn new(
        document: Rc<D>,
        generator: Rc<dyn ReplyGenerator>,
        settings: &AugmentSettings,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let locators = &settings.locators;

        let orchestrator = Rc::new(RequestOrchestrator::new(
            Rc::clone(&document),
            generator,
            locators.email_body.clone(),
            locators.editable_region.clone(),
            settings.tone.clone(),
        ));
        let injector = ControlInjector::new(
            Rc::clone(&document),
            locators.toolbar.clone(),
            settings.control.clone(),
            orchestrator.click_handler(),
        )?;
        let watcher = MutationWatcher::new(
            document,
            locators.compose_signature.clone(),
            settings.settle_delay(),
            injector,
        );

        Ok(Self {
            orchestrator,
            watcher,
        })
    }

    pub fn watcher(&self) -> &MutationWatcher<D, ControlInjector<D>> {
        &self.watcher
    }

    pub fn injector(&self) -> &ControlInjector<D> {
        self.watcher.injector()
    }

    pub fn orchestrator(&self) -> &Rc<RequestOrchestrator<D>> {
        &self.orchestrator
    }

    /// Observes the page for as long as `batches` yields.
    pub async fn run<S, F, Fut>(&self, batches: S, sleep: F)
    where
        S: Stream<Item = MutationBatch<D::Node>>,
        F: Fn(Duration) -> Fut,
        Fut: Future<Output = ()>,
    {
        mw_info!(
            "Observing page, settle delay {:?}",
            self.watcher.settle_delay()
        );
        self.watcher.run(batches, sleep).await;
    }
}
