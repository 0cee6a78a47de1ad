//! Optimization Form
//!
//! Product and item selection, quantity entry, and the cost comparison
//! returned by the backend.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_data_service;
use crate::context::{use_app_context, ToastKind};
use crate::error::ApiError;
use crate::format::{currency, thousands, unit_price};
use crate::models::OptimizationResult;
use crate::quantities::parse_quantity;
use crate::store::{use_app_store, AppStateStoreFields};

#[derive(Clone, PartialEq)]
enum RunState {
    Idle,
    Loading,
    Done(OptimizationResult),
}

#[component]
pub fn OptimizationForm() -> impl IntoView {
    let ctx = use_app_context();
    let api = use_data_service();
    let store = use_app_store();

    let product = RwSignal::new(String::new());
    let item = RwSignal::new(String::new());
    let quantity = RwSignal::new(String::new());
    let quantity_error = RwSignal::new(None::<String>);
    let state = RwSignal::new(RunState::Idle);

    let products = Memo::new(move |_| {
        store.products().with(|ps| ps.iter().filter(|p| p.status == "active").cloned().collect::<Vec<_>>())
    });
    // Active items of the selected product
    let items = Memo::new(move |_| {
        let Ok(product_id) = product.get().parse::<u32>() else { return Vec::new() };
        let item_ids = products.with(|ps| ps.iter().find(|p| p.id == product_id).map(|p| p.item_ids.clone()).unwrap_or_default());
        store.items().with(|all| {
            all.iter()
                .filter(|i| i.status == "active" && item_ids.contains(&i.id))
                .cloned()
                .collect::<Vec<_>>()
        })
    });
    let ready = move || !product.get().is_empty() && !item.get().is_empty() && state.get() != RunState::Loading;

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Ok(item_id) = item.get().parse::<u32>() else {
            ctx.toasts.error(&ApiError::validation("Please select both a product and an item"));
            return;
        };
        let qty = match parse_quantity(&quantity.get()) {
            Ok(q) => q,
            Err(e) => {
                quantity_error.set(Some(e.to_string()));
                return;
            }
        };
        state.set(RunState::Loading);
        spawn_local(async move {
            match api.calculate_optimization(item_id, qty).await {
                Ok(result) if result.offers.is_empty() => {
                    let message = result
                        .message
                        .clone()
                        .unwrap_or_else(|| "No pricing offers found for the selected item and quantity.".to_string());
                    ctx.toasts.show(message, ToastKind::Info);
                    state.set(RunState::Idle);
                }
                Ok(result) => {
                    tracing::info!("Optimization for item {} x {}: {} offers", item_id, qty, result.offers.len());
                    state.set(RunState::Done(result));
                }
                Err(e) => {
                    ctx.toasts.error(&e);
                    state.set(RunState::Idle);
                }
            }
        });
    };

    view! {
        <section class="panel optimization-panel">
            <h2 class="panel-title">"Pricing optimization"</h2>
            <form class="optimization-form" on:submit=on_submit>
                <label class="form-label">
                    "Product"
                    <select
                        class="form-select"
                        prop:value=move || product.get()
                        on:change=move |ev| {
                            product.set(event_target_value(&ev));
                            item.set(String::new());
                            state.set(RunState::Idle);
                        }
                    >
                        <option value="">"-- Select a Product --"</option>
                        <For
                            each=move || products.get()
                            key=|p| p.id
                            children=|p| view! { <option value=p.id.to_string()>{p.name.clone()}</option> }
                        />
                    </select>
                </label>
                <label class="form-label">
                    "Item"
                    <select
                        class="form-select"
                        disabled=move || product.get().is_empty()
                        prop:value=move || item.get()
                        on:change=move |ev| {
                            item.set(event_target_value(&ev));
                            state.set(RunState::Idle);
                        }
                    >
                        <option value="">"-- Select an Item --"</option>
                        <For
                            each=move || items.get()
                            key=|i| i.id
                            children=|i| view! { <option value=i.id.to_string()>{i.item_name.clone()}</option> }
                        />
                    </select>
                </label>
                <label class="form-label">
                    "Quantity"
                    <input
                        type="number"
                        min="1"
                        class=move || if quantity_error.get().is_some() { "form-input input-error" } else { "form-input" }
                        prop:value=move || quantity.get()
                        on:input=move |ev| {
                            quantity.set(event_target_value(&ev));
                            quantity_error.set(None);
                        }
                    />
                </label>
                <Show when=move || quantity_error.get().is_some()>
                    <p class="field-error">{move || quantity_error.get().unwrap_or_default()}</p>
                </Show>
                <button type="submit" class="btn-primary" disabled=move || !ready()>"Run optimization"</button>
            </form>
            {move || match state.get() {
                RunState::Idle => view! {
                    <p class="empty-message">"Select a product, an item and a quantity to compare providers"</p>
                }
                .into_any(),
                RunState::Loading => view! { <p class="loading">"Calculating…"</p> }.into_any(),
                RunState::Done(result) => view! { <ResultsView result=result /> }.into_any(),
            }}
        </section>
    }
}

#[component]
fn ResultsView(result: OptimizationResult) -> impl IntoView {
    let best = result.best_offer().cloned();
    let best_id = best.as_ref().map(|o| o.offer_id);
    let rows = result
        .offers
        .iter()
        .map(|offer| {
            let is_best = Some(offer.offer_id) == best_id;
            let savings = result.savings_for(offer);
            view! {
                <tr class={if is_best { "best-row" } else { "" }}>
                    <td>
                        {offer.provider_name.clone()}
                        {is_best.then(|| view! { <span class="badge badge-best">"BEST"</span> })}
                    </td>
                    <td>{format!("Tier {}", offer.tier_number)}</td>
                    <td class="num">{unit_price(offer.price_per_unit)}</td>
                    <td class="num">{currency(offer.total_cost)}</td>
                    <td class="num savings">
                        {if savings > 0.0 { format!("-{}", currency(savings)) } else { "-".to_string() }}
                    </td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <div class="results">
            <div class="results-summary">
                <div class="stat">
                    <p class="stat-label">"Best Provider"</p>
                    <p class="stat-value">{best.as_ref().map(|o| o.provider_name.clone()).unwrap_or_default()}</p>
                </div>
                <div class="stat">
                    <p class="stat-label">"Best Total Cost"</p>
                    <p class="stat-value">{best.as_ref().map(|o| currency(o.total_cost)).unwrap_or_default()}</p>
                </div>
                <div class="stat">
                    <p class="stat-label">"Potential Savings"</p>
                    <p class="stat-value savings">{currency(result.summary.max_savings)}</p>
                    <p class="stat-hint">"vs. highest cost"</p>
                </div>
            </div>
            <p class="results-caption">
                {format!("{} x {} across {} providers", result.item_name, thousands(result.quantity), result.summary.total_providers)}
            </p>
            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Provider"</th>
                        <th>"Tier"</th>
                        <th class="num">"Price / unit"</th>
                        <th class="num">"Total cost"</th>
                        <th class="num">"Savings"</th>
                    </tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>
        </div>
    }
}
