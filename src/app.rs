//! Tierdesk Frontend App
//!
//! Root component: builds the shared services and renders the page for the
//! current path.

use console_logger::LogHandle;
use leptos::prelude::*;
use reactive_stores::Store;

use crate::api::provide_data_service;
use crate::components::{LogPanel, PageNav, ToastHost};
use crate::config::AppConfig;
use crate::context::{AppContext, ToastQueue};
use crate::pages::{ContractsPage, OptimizationPage, Page, PricingPage, ProductsPage};
use crate::store::AppState;

#[component]
pub fn App(config: AppConfig, log: Option<LogHandle>) -> impl IntoView {
    let (reload_trigger, set_reload_trigger) = signal(0u32);
    let toasts = ToastQueue::new(config.toast_duration_ms, config.toast_limit);

    // Provide context to all children
    provide_context(AppContext::new((reload_trigger, set_reload_trigger), toasts, config.graph));
    provide_context(Store::new(AppState::default()));
    provide_data_service(config.api_base.clone());
    if let Some(log) = log {
        provide_context(log);
    }

    let path = window().location().pathname().unwrap_or_else(|_| "/".to_string());
    let page = Page::from_path(&path);
    tracing::info!("Rendering {:?} for {}", page, path);

    view! {
        <div class="app-layout">
            <PageNav page=page />
            <main class="main-content">
                {match page {
                    Page::Contracts(process_id) => view! { <ContractsPage process_id=process_id /> }.into_any(),
                    Page::Pricing => view! { <PricingPage /> }.into_any(),
                    Page::Products => view! { <ProductsPage /> }.into_any(),
                    Page::Optimization => view! { <OptimizationPage /> }.into_any(),
                }}
            </main>
            <LogPanel />
            <ToastHost />
        </div>
    }
}
