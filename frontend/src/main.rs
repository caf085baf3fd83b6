use std::rc::Rc;

mod analytics;
mod api;
mod app;
mod charts;
mod components;
mod controller;
mod debounce;
mod error;
mod format;
mod model;
mod settings;
mod state;
mod toast;

use app::{App, AppProps};
use settings::Settings;

fn main() {
    let settings = Settings::from_environment();
    wasm_logger::init(wasm_logger::Config::new(settings.log_level));

    log::info!("Expense tracker starting");
    log::debug!("Settings: {:?}", settings);

    yew::Renderer::<App>::with_props(AppProps {
        settings: Rc::new(settings),
    })
    .render();
}
