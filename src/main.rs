//! Tierdesk Frontend Entry Point

mod allocations;
mod api;
mod app;
mod comparison;
mod components;
mod config;
mod context;
mod error;
mod format;
mod graph;
mod models;
mod offers;
mod pages;
mod pricing;
mod quantities;
mod store;
mod tiers;

use app::App;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::load();
    let log = match console_logger::init(&config.log_level, config.log_buffer_lines) {
        Ok(handle) => Some(handle),
        Err(e) => {
            web_sys::console::warn_1(&format!("Logger already installed: {}", e).into());
            None
        }
    };
    tracing::info!("Starting with API base {}", config.api_base);

    mount_to_body(move || view! { <App config=config.clone() log=log.clone() /> });
}
