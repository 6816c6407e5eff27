use std::future::Future;
use std::pin::pin;
use std::rc::Rc;
use std::time::Duration;

use futures_util::stream::{FuturesUnordered, Stream, StreamExt};
use futures_util::select;
use mailwriter_logging::{mw_debug, mw_info};

use crate::host::HostDocument;
use crate::injector::Injector;
use crate::locator::LocatorList;

/// Nodes added to the document by one structural-change batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationBatch<N> {
    pub added: Vec<N>,
}

impl<N> Default for MutationBatch<N> {
    fn default() -> Self {
        Self { added: Vec::new() }
    }
}

/// Observes the host's mutation stream and schedules an injection pass,
/// after a settle delay, whenever a compose surface shows up.
pub struct MutationWatcher<D: HostDocument, I> {
    document: Rc<D>,
    signature: LocatorList,
    settle_delay: Duration,
    injector: I,
}

impl<D: HostDocument, I: Injector> MutationWatcher<D, I> {
    pub fn new(
        document: Rc<D>,
        signature: LocatorList,
        settle_delay: Duration,
        injector: I,
    ) -> Self {
        Self {
            document,
            signature,
            settle_delay,
            injector,
        }
    }

    pub fn injector(&self) -> &I {
        &self.injector
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// True when any added node, or something inside it, carries a compose
    /// surface signature.
    pub fn compose_appeared(&self, batch: &MutationBatch<D::Node>) -> bool {
        batch
            .added
            .iter()
            .any(|node| self.signature.matches_within(self.document.as_ref(), node))
    }

    /// Runs for as long as `batches` yields. Each qualifying batch schedules
    /// exactly one pass, `sleep(settle_delay)` later; passes are independent of
    /// each other. Passes still pending when the stream ends run before this
    /// returns.
    pub async fn run<S, F, Fut>(&self, batches: S, sleep: F)
    where
        S: Stream<Item = MutationBatch<D::Node>>,
        F: Fn(Duration) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut batches = pin!(batches.fuse());
        let mut scheduled = FuturesUnordered::new();

        loop {
            select! {
                batch = batches.next() => match batch {
                    Some(batch) => {
                        if self.compose_appeared(&batch) {
                            mw_info!("Compose window detected");
                            scheduled.push(sleep(self.settle_delay));
                        }
                    }
                    None => break,
                },
                () = scheduled.select_next_some() => {
                    self.injector.inject();
                }
                complete => break,
            }
        }

        mw_debug!("Mutation stream ended with {} pass(es) pending", scheduled.len());
        while scheduled.next().await.is_some() {
            self.injector.inject();
        }
    }
}
