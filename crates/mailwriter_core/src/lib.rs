//! Mail writer core: pure request-cycle state machine and view-model helpers.
mod effect;
mod msg;
mod request;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use request::{GenerationRequest, DEFAULT_TONE};
pub use state::{RequestCycle, RequestPhase};
pub use update::update;
pub use view_model::{ControlView, BUSY_LABEL, FAILURE_ALERT, IDLE_LABEL};
