use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use js_sys::Array;
use mailwriter_engine::MutationBatch;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, MutationObserver, MutationObserverInit, MutationRecord};

/// A `MutationObserver` on the page body, subtree included. Observation stops
/// when this is dropped.
pub(super) struct BodyObserver {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(Array, MutationObserver)>,
}

impl BodyObserver {
    /// Starts observing and returns the stream of added-element batches, one
    /// per observer callback.
    pub(super) fn observe(
        body: &HtmlElement,
    ) -> Result<(Self, UnboundedReceiver<MutationBatch<Element>>), JsValue> {
        let (sender, receiver) = unbounded();
        let callback = Closure::<dyn FnMut(Array, MutationObserver)>::new(
            move |records: Array, _observer: MutationObserver| {
                let mut batch = MutationBatch::default();
                for record in records.iter() {
                    let Ok(record) = record.dyn_into::<MutationRecord>() else {
                        continue;
                    };
                    let added = record.added_nodes();
                    for index in 0..added.length() {
                        if let Some(element) = added
                            .item(index)
                            .and_then(|node| node.dyn_into::<Element>().ok())
                        {
                            batch.added.push(element);
                        }
                    }
                }
                if !batch.added.is_empty() {
                    let _ = sender.unbounded_send(batch);
                }
            },
        );

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer.observe_with_options(body, &init)?;

        Ok((
            Self {
                observer,
                _callback: callback,
            },
            receiver,
        ))
    }
}

impl Drop for BodyObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
