use std::rc::Rc;

use log::LevelFilter;
use mailwriter_engine::{Augmenter, SettingsError};
use mailwriter_logging::{initialize_for_browser, mw_error, mw_info};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::settings::embedded_settings;

mod dom;
mod network;
mod observer;

use dom::WebDocument;
use network::GlooReplyGenerator;
use observer::BodyObserver;

#[derive(Debug, thiserror::Error)]
enum StartError {
    #[error("document is unavailable")]
    NoDocument,
    #[error("page has no body to observe")]
    NoBody,
    #[error("mutation observer failed: {0}")]
    Observer(String),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    initialize_for_browser(LevelFilter::Info);
    mw_info!("Email Writer Extension - Content Script Loaded");
    spawn_local(async {
        if let Err(err) = run().await {
            mw_error!("Mail writer stopped: {}", err);
        }
    });
}

async fn run() -> Result<(), StartError> {
    let settings = embedded_settings();
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(StartError::NoDocument)?;
    let body = document.body().ok_or(StartError::NoBody)?;

    let host = Rc::new(WebDocument::new(document));
    let generator = Rc::new(GlooReplyGenerator::new(settings.endpoint.clone()));
    let augmenter = Augmenter::new(host, generator, &settings)?;

    let (observer, batches) =
        BodyObserver::observe(&body).map_err(|err| StartError::Observer(format!("{err:?}")))?;
    augmenter.run(batches, gloo_timers::future::sleep).await;
    drop(observer);
    Ok(())
}
