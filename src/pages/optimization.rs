//! Optimization Page
//!
//! Volume planning across products, the per-item provider comparison, and
//! the cost of current against edited allocations.

use std::collections::BTreeMap;

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::apply_loaded;
use crate::api::use_data_service;
use crate::components::{ComparisonPanel, CostBreakdownPanel, OptimizationForm, QuantityPanel};
use crate::context::use_app_context;
use crate::models::{Item, Product, Provider};
use crate::quantities::initial_quantities;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn OptimizationPage() -> impl IntoView {
    let ctx = use_app_context();
    let api = use_data_service();
    let store = use_app_store();
    let quantities = RwSignal::new(BTreeMap::<u32, u64>::new());

    Effect::new(move |_| {
        ctx.reload_trigger.track();
        spawn_local(async move {
            let (products, providers, items) =
                futures::join!(api.load::<Product>(), api.load::<Provider>(), api.load::<Item>());
            apply_loaded(&ctx, "products", products, |v| {
                quantities.set(initial_quantities(&v));
                store.products().set(v);
            });
            apply_loaded(&ctx, "providers", providers, |v| store.providers().set(v));
            apply_loaded(&ctx, "items", items, |v| store.items().set(v));
        });
    });

    view! {
        <div class="page optimization-page">
            <div class="page-header">
                <h1>"Optimization"</h1>
            </div>
            <QuantityPanel quantities=quantities />
            <OptimizationForm />
            <CostBreakdownPanel quantities=quantities />
            <ComparisonPanel quantities=quantities />
        </div>
    }
}
