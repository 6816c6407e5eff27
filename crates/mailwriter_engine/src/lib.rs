//! Mail writer engine: compose-surface detection, control injection and the
//! reply request cycle, written against an abstract host document.
mod augmenter;
mod constants;
mod control;
mod generate;
mod host;
mod injector;
mod locator;
mod memory;
mod orchestrator;
mod settings;
mod watcher;

pub use augmenter::Augmenter;
pub use constants::*;
pub use control::ControlSpec;
#[cfg(not(target_arch = "wasm32"))]
pub use generate::ReqwestReplyGenerator;
pub use generate::{GenerateError, ReplyGenerator};
pub use host::{apply_view, ClickHandler, HostDocument};
pub use injector::{ControlInjector, InjectOutcome, Injector};
pub use locator::{Locator, LocatorError, LocatorList, LocatorSet, TargetKind};
pub use memory::MemoryDocument;
pub use orchestrator::{ClickOutcome, RequestOrchestrator};
pub use settings::{AugmentSettings, SettingsError};
pub use watcher::{MutationBatch, MutationWatcher};
