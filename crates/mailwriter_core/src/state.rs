use crate::view_model::ControlView;

/// Phase of one click's request/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    #[default]
    Idle,
    Pending,
    Success,
    Failed,
}

/// Per-click state owned by a single handler invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestCycle {
    phase: RequestPhase,
}

impl RequestCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    /// True from the click until the cycle settles back to idle.
    pub fn is_busy(&self) -> bool {
        self.phase != RequestPhase::Idle
    }

    pub fn view(&self) -> ControlView {
        if self.is_busy() {
            ControlView::BUSY
        } else {
            ControlView::IDLE
        }
    }

    pub(crate) fn set_phase(&mut self, phase: RequestPhase) {
        self.phase = phase;
    }
}
