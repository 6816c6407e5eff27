use std::cell::RefCell;

use mailwriter_core::ControlView;
use mailwriter_engine::{apply_view, ClickHandler, ControlSpec, HostDocument, Locator};
use mailwriter_logging::{mw_debug, mw_warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlDocument, HtmlElement};

type Listener = Closure<dyn FnMut(Event)>;

/// The live page, seen through `web-sys`.
pub(super) struct WebDocument {
    document: Document,
    /// Click listeners of controls still in the page. Released when their
    /// control is removed or found disconnected.
    listeners: RefCell<Vec<(Element, Listener)>>,
}

impl WebDocument {
    pub(super) fn new(document: Document) -> Self {
        Self {
            document,
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl HostDocument for WebDocument {
    type Node = Element;

    fn query(&self, locator: &Locator) -> Option<Element> {
        self.document.query_selector(locator.css()).ok().flatten()
    }

    fn query_all(&self, locator: &Locator) -> Vec<Element> {
        let Ok(found) = self.document.query_selector_all(locator.css()) else {
            return Vec::new();
        };
        (0..found.length())
            .filter_map(|index| found.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn matches_within(&self, node: &Element, locator: &Locator) -> bool {
        node.matches(locator.css()).unwrap_or(false)
            || matches!(node.query_selector(locator.css()), Ok(Some(_)))
    }

    fn text_content(&self, node: &Element) -> String {
        match node.dyn_ref::<HtmlElement>() {
            Some(element) => element.inner_text(),
            None => node.text_content().unwrap_or_default(),
        }
    }

    fn create_control(&self, spec: &ControlSpec, view: ControlView) -> Option<Element> {
        let control = self.document.create_element("div").ok()?;
        control.set_class_name(&spec.class_name);
        control.set_attribute("role", &spec.role).ok()?;
        control.set_attribute("data-tooltip", &spec.tooltip).ok()?;
        control.set_attribute(&spec.marker_attribute, "").ok()?;
        if let Some(element) = control.dyn_ref::<HtmlElement>() {
            let _ = element
                .style()
                .set_property("margin-right", &spec.margin_right);
        }
        apply_view(self, &control, view);
        Some(control)
    }

    fn set_label(&self, node: &Element, label: &str) {
        node.set_text_content(Some(label));
    }

    fn set_disabled(&self, node: &Element, disabled: bool) {
        let result = if disabled {
            node.set_attribute("aria-disabled", "true")
        } else {
            node.remove_attribute("aria-disabled")
        };
        if let Err(err) = result {
            mw_warn!("Could not update control state: {:?}", err);
        }
    }

    fn is_disabled(&self, node: &Element) -> bool {
        node.get_attribute("aria-disabled").as_deref() == Some("true")
    }

    fn on_click(&self, node: &Element, handler: ClickHandler<Element>) {
        let target = node.clone();
        let listener = Listener::new(move |_event: Event| {
            spawn_local(handler(target.clone()));
        });
        let mut listeners = self.listeners.borrow_mut();
        // Controls the host page dropped along with their compose window.
        listeners.retain(|(element, listener)| {
            if element.is_connected() {
                return true;
            }
            release(element, listener);
            false
        });
        if node
            .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
            .is_ok()
        {
            listeners.push((node.clone(), listener));
        }
    }

    fn prepend_child(&self, parent: &Element, child: &Element) -> bool {
        parent
            .insert_before(child, parent.first_child().as_ref())
            .is_ok()
    }

    fn remove(&self, node: &Element) {
        node.remove();
        self.listeners.borrow_mut().retain(|(element, listener)| {
            if element != node {
                return true;
            }
            release(element, listener);
            false
        });
    }

    fn focus(&self, node: &Element) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            let _ = element.focus();
        }
    }

    fn insert_text(&self, text: &str) -> bool {
        let Some(document) = self.document.dyn_ref::<HtmlDocument>() else {
            mw_debug!("Page is not an HTML document");
            return false;
        };
        document
            .exec_command_with_show_ui_and_value("insertText", false, text)
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

fn release(element: &Element, listener: &Listener) {
    let _ = element.remove_event_listener_with_callback("click", listener.as_ref().unchecked_ref());
}
