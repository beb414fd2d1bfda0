//! Warehouse Frontend Entry Point

mod app;
mod browser;
mod components;
mod context;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    browser::init_logger();

    let config = browser::load_config();
    let surface = browser::current_surface(&config);
    mount_to_body(move || view! { <App config=config surface=surface /> });
}
