use std::rc::Rc;

use mailwriter_core::ControlView;
use mailwriter_logging::{mw_debug, mw_info, mw_warn};

use crate::control::ControlSpec;
use crate::host::{ClickHandler, HostDocument};
use crate::locator::{Locator, LocatorError, LocatorList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    Injected,
    /// No compose surface is ready; nothing was attached.
    ToolbarNotFound,
    /// The host refused to create or attach the control.
    HostRejected,
}

/// One injection pass. Implementations must be idempotent.
pub trait Injector {
    fn inject(&self) -> InjectOutcome;
}

/// Keeps exactly one control at the front of the current compose toolbar.
pub struct ControlInjector<D: HostDocument> {
    document: Rc<D>,
    toolbar: LocatorList,
    marker: Locator,
    spec: ControlSpec,
    handler: ClickHandler<D::Node>,
}

impl<D: HostDocument> ControlInjector<D> {
    pub fn new(
        document: Rc<D>,
        toolbar: LocatorList,
        spec: ControlSpec,
        handler: ClickHandler<D::Node>,
    ) -> Result<Self, LocatorError> {
        let marker = spec.marker_locator()?;
        Ok(Self {
            document,
            toolbar,
            marker,
            spec,
            handler,
        })
    }

    /// Removes every marked control currently in the page.
    fn remove_existing(&self) -> usize {
        let existing = self.document.query_all(&self.marker);
        for control in &existing {
            self.document.remove(control);
        }
        existing.len()
    }
}

impl<D: HostDocument> Injector for ControlInjector<D> {
    fn inject(&self) -> InjectOutcome {
        let removed = self.remove_existing();
        if removed > 0 {
            mw_debug!("Removed {} existing control(s)", removed);
        }

        let Some(toolbar) = self.toolbar.resolve(self.document.as_ref()) else {
            mw_info!("Toolbar not found");
            return InjectOutcome::ToolbarNotFound;
        };

        mw_info!("Toolbar found, creating AI button");
        let Some(control) = self.document.create_control(&self.spec, ControlView::IDLE) else {
            mw_warn!("Host refused to create the control");
            return InjectOutcome::HostRejected;
        };
        self.document.on_click(&control, Rc::clone(&self.handler));

        if !self.document.prepend_child(&toolbar, &control) {
            mw_warn!("Host refused to attach the control to the toolbar");
            return InjectOutcome::HostRejected;
        }
        InjectOutcome::Injected
    }
}

impl<I: Injector + ?Sized> Injector for Rc<I> {
    fn inject(&self) -> InjectOutcome {
        self.as_ref().inject()
    }
}
