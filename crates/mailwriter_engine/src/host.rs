use std::rc::Rc;

use futures_util::future::LocalBoxFuture;
use mailwriter_core::ControlView;

use crate::control::ControlSpec;
use crate::locator::Locator;

/// Callback fired when the injected control is clicked. Receives the clicked node.
pub type ClickHandler<N> = Rc<dyn Fn(N) -> LocalBoxFuture<'static, ()>>;

/// The host page's document tree as seen by the controller.
///
/// The host owns the tree and may mutate it between any two calls, so every
/// lookup is answered against the current state and absence is never an error.
pub trait HostDocument {
    type Node: Clone + 'static;

    /// First element in document order matching `locator`.
    fn query(&self, locator: &Locator) -> Option<Self::Node>;

    /// Every element matching `locator`, in document order.
    fn query_all(&self, locator: &Locator) -> Vec<Self::Node>;

    /// Whether `node` itself or any of its descendants matches `locator`.
    fn matches_within(&self, node: &Self::Node, locator: &Locator) -> bool;

    fn text_content(&self, node: &Self::Node) -> String;

    /// Builds a detached control element. `None` if the host refused.
    fn create_control(&self, spec: &ControlSpec, view: ControlView) -> Option<Self::Node>;

    fn set_label(&self, node: &Self::Node, label: &str);

    fn set_disabled(&self, node: &Self::Node, disabled: bool);

    fn is_disabled(&self, node: &Self::Node) -> bool;

    fn on_click(&self, node: &Self::Node, handler: ClickHandler<Self::Node>);

    /// Inserts `child` as the first child of `parent`.
    fn prepend_child(&self, parent: &Self::Node, child: &Self::Node) -> bool;

    fn remove(&self, node: &Self::Node);

    fn focus(&self, node: &Self::Node);

    /// Inserts `text` at the caret of the focused editable region, keeping
    /// whatever content is already there.
    fn insert_text(&self, text: &str) -> bool;

    /// Blocking, user-visible notice.
    fn alert(&self, message: &str);
}

/// Pushes a view onto the control.
pub fn apply_view<D>(document: &D, control: &D::Node, view: ControlView)
where
    D: HostDocument + ?Sized,
{
    document.set_label(control, view.label);
    document.set_disabled(control, !view.enabled);
}
