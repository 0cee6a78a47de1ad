//! Quantity Panel
//!
//! Per-product volumes, the resulting tier of every provider, and the
//! server-side tier status (with manual overrides).

use std::collections::BTreeMap;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_data_service;
use crate::context::use_app_context;
use crate::format::{currency, thousands};
use crate::models::{ProviderTiers, TierStatus};
use crate::pricing::summarize_tiers;
use crate::quantities::{parse_units, positive_quantities, quantity_for, total_quantity};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn QuantityPanel(quantities: RwSignal<BTreeMap<u32, u64>>) -> impl IntoView {
    let store = use_app_store();
    let total = Memo::new(move |_| quantities.with(total_quantity));

    view! {
        <section class="panel quantity-panel">
            <h2 class="panel-title">"Product quantities"</h2>
            <Show
                when=move || store.products().with(|ps| !ps.is_empty())
                fallback=|| view! { <p class="empty-message">"No products available"</p> }
            >
                <div class="quantity-grid">
                    <For
                        each=move || store.products().get()
                        key=|p| p.id
                        children=move |product| {
                            let product_id = product.id;
                            let from_config = product.proxy_quantity.unwrap_or(0) > 0;
                            let current = move || quantities.with(|q| quantity_for(q, product_id));
                            view! {
                                <div class={if from_config { "quantity-card from-config" } else { "quantity-card" }}>
                                    <div class="quantity-card-header">
                                        <label>{product.name.clone()}</label>
                                        {from_config.then(|| view! { <span class="badge badge-config">"From Config"</span> })}
                                    </div>
                                    <input
                                        type="number"
                                        min="0"
                                        placeholder="0"
                                        class="form-input"
                                        prop:value=move || current().to_string()
                                        on:change=move |ev| {
                                            let units = parse_units(&event_target_value(&ev));
                                            quantities.update(|q| {
                                                q.insert(product_id, units);
                                            });
                                        }
                                    />
                                    <div class="quantity-card-footer">
                                        <span class="muted">{format!("{} items", product.item_ids.len())}</span>
                                        <span class="quantity-files">{move || format!("{} files", thousands(current()))}</span>
                                    </div>
                                </div>
                            }
                        }
                    />
                </div>
            </Show>
            <TierSummary total=total />
            <TierStatusPanel quantities=quantities />
        </section>
    }
}

/// Tier each provider lands in for the aggregated quantity
#[component]
fn TierSummary(#[prop(into)] total: Signal<u64>) -> impl IntoView {
    let api = use_data_service();
    let store = use_app_store();
    let provider_tiers = RwSignal::new(Vec::<(String, ProviderTiers)>::new());

    // Thresholds change rarely; fetch once per provider list
    Effect::new(move |_| {
        let providers = store.providers().get();
        spawn_local(async move {
            let fetched = futures::future::join_all(providers.iter().map(|p| api.tier_thresholds(p.id))).await;
            let loaded = providers
                .iter()
                .zip(fetched)
                .map(|(p, result)| {
                    let tiers = result.unwrap_or_else(|e| {
                        tracing::warn!("Tier thresholds unavailable for {}: {}", p.company_name, e);
                        ProviderTiers::default()
                    });
                    (p.company_name.clone(), tiers)
                })
                .collect();
            provider_tiers.set(loaded);
        });
    });

    let summaries = move || {
        let total = total.get();
        provider_tiers.with(|all| {
            all.iter()
                .map(|(name, tiers)| summarize_tiers(name, tiers, total))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="tier-summary">
            <div class="tier-summary-header">
                <h3>"Current Tier Status"</h3>
                <span class="muted">"Total Files: "</span>
                <span class="tier-summary-total">{move || thousands(total.get())}</span>
            </div>
            <p class="hint">"Based on aggregated quantities across all products"</p>
            <div class="tier-summary-grid">
                {move || summaries()
                    .into_iter()
                    .map(|s| view! {
                        <div class="tier-summary-card">
                            <div class="tier-summary-provider">{s.provider_name}</div>
                            <div class="tier-summary-row">
                                <span class="muted">"Tier"</span>
                                <span class="tier-summary-tier">{format!("T{}", s.tier)}</span>
                            </div>
                            {s.base_price.map(|price| view! {
                                <div class="tier-summary-row">
                                    <span class="muted">"Base"</span>
                                    <span class="tier-summary-price">{currency(price)}</span>
                                </div>
                            })}
                        </div>
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

/// Calculated, override and effective tier per provider, from the backend
#[component]
fn TierStatusPanel(quantities: RwSignal<BTreeMap<u32, u64>>) -> impl IntoView {
    let ctx = use_app_context();
    let api = use_data_service();
    let status = RwSignal::new(BTreeMap::<String, TierStatus>::new());
    let (loading, set_loading) = signal(false);

    let refresh = move |_| {
        let body = quantities.with_untracked(positive_quantities);
        set_loading.set(true);
        spawn_local(async move {
            match api.tier_status(&body).await {
                Ok(data) => status.set(data),
                Err(e) => ctx.toasts.error(&e),
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="tier-status">
            <div class="tier-status-header">
                <h3>"Provider tier status"</h3>
                <button type="button" class="btn-secondary" disabled=move || loading.get() on:click=refresh>
                    {move || if loading.get() { "Checking…" } else { "Check tier status" }}
                </button>
            </div>
            <Show when=move || !status.with(BTreeMap::is_empty)>
                <div class="tier-status-grid">
                    {move || status
                        .get()
                        .into_iter()
                        .map(|(provider, s)| view! { <TierStatusCard provider=provider status=s /> })
                        .collect_view()}
                </div>
            </Show>
        </div>
    }
}

#[component]
fn TierStatusCard(provider: String, status: TierStatus) -> impl IntoView {
    let overridden = status.override_tier.is_some();

    view! {
        <div class={if overridden { "tier-status-card overridden" } else { "tier-status-card" }}>
            <h4>{provider}</h4>
            <div class="tier-status-row">
                <span class="muted">"Calculated Tier:"</span>
                <span>{format!("Tier {}", status.calculated_tier)}</span>
            </div>
            {status.override_tier.map(|tier| view! {
                <div class="tier-status-row override">
                    <span>"Override Tier:"</span>
                    <span>{format!("Tier {}", tier)}</span>
                </div>
            })}
            <div class="tier-status-row effective">
                <span class="muted">"Effective Tier:"</span>
                <strong>{format!("Tier {}", status.effective_tier)}</strong>
            </div>
            <div class="tier-status-row">
                <span class="muted">"Credit Files:"</span>
                <span>{thousands(status.total_credit_files)}</span>
            </div>
            {status.override_notes.clone().filter(|_| overridden).map(|notes| view! {
                <p class="tier-status-note">{notes}</p>
            })}
            {overridden.then(|| view! { <p class="tier-status-warning">"Manual override active"</p> })}
        </div>
    }
}
