use std::cell::RefCell;
use std::collections::HashMap;

use ego_tree::{NodeId, NodeRef, Tree};
use futures_util::future::LocalBoxFuture;
use mailwriter_core::ControlView;
use scraper::node::{Node, Text};
use scraper::{ElementRef, Html};

use crate::control::ControlSpec;
use crate::host::{ClickHandler, HostDocument};
use crate::locator::Locator;
use crate::watcher::MutationBatch;

/// Headless host page backed by a parsed HTML tree.
///
/// Insertions made through [`MemoryDocument::insert_markup`] and
/// [`HostDocument::prepend_child`] are recorded and handed out as
/// [`MutationBatch`]es, the same way a browser observer reports them. Clicks,
/// focus, caret position and alerts are tracked so a whole request cycle can
/// run without a browser.
pub struct MemoryDocument {
    inner: RefCell<Inner>,
}

struct Inner {
    html: Html,
    handlers: HashMap<NodeId, ClickHandler<NodeId>>,
    added: Vec<NodeId>,
    focused: Option<NodeId>,
    /// Character offset into the focused region's text.
    caret: Option<usize>,
    alerts: Vec<String>,
}

impl MemoryDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            inner: RefCell::new(Inner {
                html: Html::parse_document(markup),
                handlers: HashMap::new(),
                added: Vec::new(),
                focused: None,
                caret: None,
                alerts: Vec::new(),
            }),
        }
    }

    /// First element matching a CSS selector, for driving the page in tests.
    pub fn find(&self, css: &str) -> Option<NodeId> {
        let locator = Locator::parse(css).ok()?;
        self.query(&locator)
    }

    pub fn count(&self, css: &str) -> usize {
        Locator::parse(css)
            .map(|locator| self.query_all(&locator).len())
            .unwrap_or(0)
    }

    /// Parses `markup` and appends it under `parent`, recording the new
    /// top-level nodes as one mutation batch entry each.
    pub fn insert_markup(&self, parent: NodeId, markup: &str) -> Vec<NodeId> {
        let fragment = Html::parse_fragment(markup);
        let mut inner = self.inner.borrow_mut();
        let mut inserted = Vec::new();
        for child in fragment.root_element().children() {
            if let Some(id) = graft(&mut inner.html.tree, parent, child) {
                inserted.push(id);
            }
        }
        inner.added.extend(inserted.iter().copied());
        inserted
    }

    /// Removes a node the way the host page would, e.g. when a compose
    /// window is closed.
    pub fn detach(&self, node: NodeId) {
        self.remove(&node);
    }

    /// Drains everything inserted since the last call.
    pub fn take_mutations(&self) -> Option<MutationBatch<NodeId>> {
        let added = std::mem::take(&mut self.inner.borrow_mut().added);
        if added.is_empty() {
            None
        } else {
            Some(MutationBatch { added })
        }
    }

    /// Simulates a user click. Returns the handler's future, or `None` when
    /// the node has no handler or is disabled.
    pub fn click(&self, node: NodeId) -> Option<LocalBoxFuture<'static, ()>> {
        if !self.is_attached(node) || self.is_disabled(&node) {
            return None;
        }
        let handler = self.inner.borrow().handlers.get(&node).cloned()?;
        Some(handler(node))
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.inner.borrow().focused
    }

    /// Focuses `node` and puts the caret `offset` characters into its text.
    pub fn place_caret(&self, node: NodeId, offset: usize) {
        let mut inner = self.inner.borrow_mut();
        inner.focused = Some(node);
        inner.caret = Some(offset);
    }

    pub fn caret(&self) -> Option<usize> {
        self.inner.borrow().caret
    }

    pub fn alerts(&self) -> Vec<String> {
        self.inner.borrow().alerts.clone()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        let inner = self.inner.borrow();
        inner.html.tree.get(node)?.parent().map(|parent| parent.id())
    }

    pub fn first_child_element(&self, node: NodeId) -> Option<NodeId> {
        let inner = self.inner.borrow();
        let node = inner.html.tree.get(node)?;
        node.children()
            .find(|child| child.value().is_element())
            .map(|child| child.id())
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        let inner = self.inner.borrow();
        let node = inner.html.tree.get(node)?;
        node.value()
            .as_element()
            .and_then(|element| element.attr(name))
            .map(ToOwned::to_owned)
    }

    /// Whether `node` is still reachable from the document root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        attached(&self.inner.borrow().html.tree, node)
    }

    /// Click handlers currently registered.
    pub fn handler_count(&self) -> usize {
        self.inner.borrow().handlers.len()
    }

    /// Sets or clears one attribute in place. `id` and `class` are cached by
    /// the element and must not be changed this way.
    fn set_attr(&self, node: NodeId, name: &str, value: Option<&str>) {
        debug_assert!(name != "id" && name != "class");
        // Attribute names are parsed the same under any parent, so a throwaway
        // `div` yields the qualified name.
        let key = value.and_then(|_| {
            let template = Html::parse_fragment(&element_markup(
                "div",
                &[(name.to_string(), String::new())],
                "",
            ));
            first_element(&template)?
                .as_element()?
                .attrs
                .first()
                .map(|(key, _)| key.clone())
        });

        let mut inner = self.inner.borrow_mut();
        let Some(mut node) = inner.html.tree.get_mut(node) else {
            return;
        };
        let Node::Element(element) = node.value() else {
            return;
        };
        element.attrs.retain(|(attr, _)| attr.local.as_ref() != name);
        if let (Some(key), Some(value)) = (key, value) {
            element.attrs.push((key, value.into()));
            // `Element::attr` binary-searches.
            element.attrs.sort_unstable_by(|lhs, rhs| lhs.0.cmp(&rhs.0));
        }
    }

    fn replace_text(&self, node: NodeId, text: &str) {
        let mut inner = self.inner.borrow_mut();
        let children: Vec<NodeId> = match inner.html.tree.get(node) {
            Some(node) => node.children().map(|child| child.id()).collect(),
            None => return,
        };
        for child in children {
            if let Some(mut child) = inner.html.tree.get_mut(child) {
                child.detach();
            }
        }
        if let Some(mut node) = inner.html.tree.get_mut(node) {
            node.append(Node::Text(Text { text: text.into() }));
        }
    }
}

impl HostDocument for MemoryDocument {
    type Node = NodeId;

    fn query(&self, locator: &Locator) -> Option<NodeId> {
        let inner = self.inner.borrow();
        // Walk from the root so detached nodes are never reported.
        let found = inner
            .html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|element| locator.selector().matches(element))
            .map(|element| element.id());
        found
    }

    fn query_all(&self, locator: &Locator) -> Vec<NodeId> {
        let inner = self.inner.borrow();
        let found = inner
            .html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| locator.selector().matches(element))
            .map(|element| element.id())
            .collect();
        found
    }

    fn matches_within(&self, node: &NodeId, locator: &Locator) -> bool {
        let inner = self.inner.borrow();
        let Some(node) = inner.html.tree.get(*node) else {
            return false;
        };
        let matched = node
            .descendants()
            .filter_map(ElementRef::wrap)
            .any(|element| locator.selector().matches(&element));
        matched
    }

    fn text_content(&self, node: &NodeId) -> String {
        let inner = self.inner.borrow();
        inner
            .html
            .tree
            .get(*node)
            .map(node_text)
            .unwrap_or_default()
    }

    fn create_control(&self, spec: &ControlSpec, view: ControlView) -> Option<NodeId> {
        let markup = control_markup(spec, view);
        let fragment = Html::parse_fragment(&markup);
        let source = fragment
            .root_element()
            .children()
            .find(|child| child.value().is_element())?;
        let mut inner = self.inner.borrow_mut();
        let id = inner.html.tree.orphan(source.value().clone()).id();
        for child in source.children() {
            graft(&mut inner.html.tree, id, child);
        }
        Some(id)
    }

    fn set_label(&self, node: &NodeId, label: &str) {
        self.replace_text(*node, label);
    }

    fn set_disabled(&self, node: &NodeId, disabled: bool) {
        let value = disabled.then_some("true");
        self.set_attr(*node, "aria-disabled", value);
    }

    fn is_disabled(&self, node: &NodeId) -> bool {
        self.attr(*node, "aria-disabled").as_deref() == Some("true")
    }

    fn on_click(&self, node: &NodeId, handler: ClickHandler<NodeId>) {
        let mut inner = self.inner.borrow_mut();
        let Inner { html, handlers, .. } = &mut *inner;
        // Controls the host page dropped along with their compose window.
        handlers.retain(|id, _| attached(&html.tree, *id));
        handlers.insert(*node, handler);
    }

    fn prepend_child(&self, parent: &NodeId, child: &NodeId) -> bool {
        if parent == child {
            return false;
        }
        let mut inner = self.inner.borrow_mut();
        let Some(mut parent) = inner.html.tree.get_mut(*parent) else {
            return false;
        };
        parent.prepend_id(*child);
        inner.added.push(*child);
        true
    }

    fn remove(&self, node: &NodeId) {
        let mut inner = self.inner.borrow_mut();
        if let Some(mut target) = inner.html.tree.get_mut(*node) {
            target.detach();
        }
        inner.handlers.remove(node);
        if inner.focused == Some(*node) {
            inner.focused = None;
            inner.caret = None;
        }
    }

    fn focus(&self, node: &NodeId) {
        let end = self.text_content(node).chars().count();
        let mut inner = self.inner.borrow_mut();
        if inner.focused != Some(*node) {
            inner.focused = Some(*node);
            inner.caret = Some(end);
        }
    }

    fn insert_text(&self, text: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(region) = inner.focused else {
            return false;
        };
        let Some(region_ref) = inner.html.tree.get(region) else {
            return false;
        };
        let segments: Vec<(NodeId, usize)> = region_ref
            .descendants()
            .filter_map(|node| {
                let text = node.value().as_text()?;
                Some((node.id(), text.text.chars().count()))
            })
            .collect();
        let length: usize = segments.iter().map(|(_, count)| count).sum();
        let offset = inner.caret.unwrap_or(length).min(length);

        match text_node_at(&segments, offset) {
            Some((target, within)) => {
                let Some(mut target) = inner.html.tree.get_mut(target) else {
                    return false;
                };
                let suffix = {
                    let Node::Text(current) = target.value() else {
                        return false;
                    };
                    let existing = current.text.to_string();
                    let split = existing
                        .char_indices()
                        .nth(within)
                        .map(|(index, _)| index)
                        .unwrap_or(existing.len());
                    current.text = existing[..split].into();
                    existing[split..].to_string()
                };
                let mut inserted = target.insert_after(Node::Text(Text { text: text.into() }));
                if !suffix.is_empty() {
                    inserted.insert_after(Node::Text(Text {
                        text: suffix.as_str().into(),
                    }));
                }
            }
            None => {
                let Some(mut region) = inner.html.tree.get_mut(region) else {
                    return false;
                };
                region.append(Node::Text(Text { text: text.into() }));
            }
        }

        inner.caret = Some(offset + text.chars().count());
        true
    }

    fn alert(&self, message: &str) {
        self.inner.borrow_mut().alerts.push(message.to_string());
    }
}

fn attached(tree: &Tree<Node>, node: NodeId) -> bool {
    let root = tree.root().id();
    let Some(node) = tree.get(node) else {
        return false;
    };
    node.id() == root || node.ancestors().any(|ancestor| ancestor.id() == root)
}

/// The text node holding character `offset` of a region, with the offset
/// inside it. A caret on a boundary belongs to the earlier node.
fn text_node_at(segments: &[(NodeId, usize)], offset: usize) -> Option<(NodeId, usize)> {
    let mut start = 0;
    for &(id, count) in segments {
        if offset <= start + count {
            return Some((id, offset - start));
        }
        start += count;
    }
    None
}

/// Copies `source` and its subtree under `parent`.
fn graft(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>) -> Option<NodeId> {
    let id = tree.get_mut(parent)?.append(source.value().clone()).id();
    for child in source.children() {
        graft(tree, id, child);
    }
    Some(id)
}

fn first_element(fragment: &Html) -> Option<Node> {
    fragment
        .root_element()
        .children()
        .find(|child| child.value().is_element())
        .map(|child| child.value().clone())
}

fn node_text(node: NodeRef<'_, Node>) -> String {
    match node.value() {
        Node::Text(text) => text.text.to_string(),
        _ => node
            .descendants()
            .filter_map(|descendant| descendant.value().as_text())
            .map(|text| &*text.text)
            .collect(),
    }
}

fn control_markup(spec: &ControlSpec, view: ControlView) -> String {
    let mut attrs = vec![
        ("class".to_string(), spec.class_name.clone()),
        ("role".to_string(), spec.role.clone()),
        ("data-tooltip".to_string(), spec.tooltip.clone()),
        (
            "style".to_string(),
            format!("margin-right: {}", spec.margin_right),
        ),
        (spec.marker_attribute.clone(), String::new()),
    ];
    if !view.enabled {
        attrs.push(("aria-disabled".to_string(), "true".to_string()));
    }
    element_markup("div", &attrs, view.label)
}

fn element_markup(name: &str, attrs: &[(String, String)], text: &str) -> String {
    let mut markup = format!("<{name}");
    for (attr, value) in attrs {
        markup.push_str(&format!(" {attr}=\"{}\"", escape(value)));
    }
    markup.push('>');
    markup.push_str(&escape(text));
    markup.push_str(&format!("</{name}>"));
    markup
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
