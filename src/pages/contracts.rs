//! Contracts Page
//!
//! Process navigator on top; providers and the current process's items,
//! with their per-tier offers, below.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::apply_loaded;
use crate::api::use_data_service;
use crate::components::{
    DeleteConfirmButton, FormMode, ItemModal, ProcessModal, ProcessNavigator, ProviderModal, StatusBadge,
};
use crate::context::use_app_context;
use crate::format::unit_price;
use crate::models::{Item, Offer, Process, Provider};
use crate::store::{offers_by_provider, provider_name, use_app_store, AppStateStoreFields};

#[derive(Clone, PartialEq)]
enum OpenModal {
    Process(FormMode<Process>),
    Provider(FormMode<Provider>),
    Item(FormMode<Item>),
}

#[component]
pub fn ContractsPage(process_id: Option<u32>) -> impl IntoView {
    let ctx = use_app_context();
    let api = use_data_service();
    let store = use_app_store();
    let modal = RwSignal::new(None::<OpenModal>);

    Effect::new(move |_| {
        ctx.reload_trigger.track();
        spawn_local(async move {
            let (processes, edges, providers, items, offers) = futures::join!(
                api.load::<Process>(),
                api.process_graph(),
                api.load::<Provider>(),
                api.load::<Item>(),
                api.load::<Offer>(),
            );
            apply_loaded(&ctx, "processes", processes, |v| store.processes().set(v));
            apply_loaded(&ctx, "process graph", edges, |v| store.edges().set(v));
            apply_loaded(&ctx, "providers", providers, |v| store.providers().set(v));
            apply_loaded(&ctx, "items", items, |v| store.items().set(v));
            apply_loaded(&ctx, "offers", offers, |v| store.offers().set(v));
        });
    });

    let current_process = Memo::new(move |_| {
        process_id.and_then(|id| store.processes().with(|ps| ps.iter().find(|p| p.id == id).cloned()))
    });
    let close = Callback::new(move |_: ()| modal.set(None));
    let saved = Callback::new(move |_: ()| {
        modal.set(None);
        ctx.reload();
    });

    let delete_provider = move |provider: Provider| {
        spawn_local(async move {
            match api.delete::<Provider>(provider.id).await {
                Ok(()) => {
                    ctx.toasts.success(format!("Provider \"{}\" deleted", provider.company_name));
                    ctx.reload();
                }
                Err(e) => ctx.toasts.error(&e),
            }
        });
    };
    let delete_item = move |item: Item| {
        spawn_local(async move {
            match api.delete::<Item>(item.id).await {
                Ok(()) => {
                    ctx.toasts.success(format!("Item \"{}\" deleted", item.item_name));
                    ctx.reload();
                }
                Err(e) => ctx.toasts.error(&e),
            }
        });
    };

    // Items of the current process; every item when none is selected
    let visible_items = Memo::new(move |_| {
        store.items().with(|items| {
            items
                .iter()
                .filter(|i| process_id.is_none() || i.process_id == process_id)
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    view! {
        <div class="page contracts-page">
            <ProcessNavigator current=Signal::derive(move || process_id) />

            <div class="page-header">
                <h1>
                    {move || current_process.get().map(|p| p.name).unwrap_or_else(|| "All processes".to_string())}
                </h1>
                <div class="page-actions">
                    {move || current_process.get().map(|p| view! {
                        <button
                            type="button"
                            class="btn-secondary"
                            on:click=move |_| modal.set(Some(OpenModal::Process(FormMode::Edit(p.clone()))))
                        >
                            "Edit process"
                        </button>
                    })}
                    <button
                        type="button"
                        class="btn-secondary"
                        on:click=move |_| modal.set(Some(OpenModal::Process(FormMode::Create)))
                    >
                        "Add process"
                    </button>
                </div>
            </div>

            <section class="panel">
                <div class="panel-header">
                    <h2 class="panel-title">"Providers"</h2>
                    <button
                        type="button"
                        class="btn-primary"
                        on:click=move |_| modal.set(Some(OpenModal::Provider(FormMode::Create)))
                    >
                        "Add provider"
                    </button>
                </div>
                <Show
                    when=move || store.providers().with(|ps| !ps.is_empty())
                    fallback=|| view! { <p class="empty-message">"No providers yet"</p> }
                >
                    <div class="card-grid">
                        <For
                            each=move || store.providers().get()
                            key=|p| (p.id, p.company_name.clone(), p.status.clone(), p.details.clone())
                            children=move |provider| {
                                let edit = provider.clone();
                                let remove = provider.clone();
                                view! {
                                    <div class="card provider-card">
                                        <div class="card-header">
                                            <h3>{provider.company_name.clone()}</h3>
                                            <StatusBadge status=provider.status.clone() />
                                        </div>
                                        <p class="card-details">{provider.details.clone().unwrap_or_default()}</p>
                                        <div class="card-actions">
                                            <button
                                                type="button"
                                                class="btn-link"
                                                on:click=move |_| modal.set(Some(OpenModal::Provider(FormMode::Edit(edit.clone()))))
                                            >
                                                "Edit"
                                            </button>
                                            <DeleteConfirmButton
                                                button_class="btn-danger-link"
                                                on_confirm=move |_| delete_provider(remove.clone())
                                            />
                                        </div>
                                    </div>
                                }
                            }
                        />
                    </div>
                </Show>
            </section>

            <section class="panel">
                <div class="panel-header">
                    <h2 class="panel-title">"Items"</h2>
                    <button
                        type="button"
                        class="btn-primary"
                        on:click=move |_| modal.set(Some(OpenModal::Item(FormMode::Create)))
                    >
                        "Add item"
                    </button>
                </div>
                <Show
                    when=move || !visible_items.with(Vec::is_empty)
                    fallback=|| view! { <p class="empty-message">"No items for this process"</p> }
                >
                    <div class="card-grid">
                        {move || visible_items
                            .get()
                            .into_iter()
                            .map(|item| {
                                let edit = item.clone();
                                let remove = item.clone();
                                view! {
                                    <div class="card item-card">
                                        <div class="card-header">
                                            <h3>{item.item_name.clone()}</h3>
                                            <StatusBadge status=item.status.clone() />
                                        </div>
                                        <p class="card-details">{item.description.clone().unwrap_or_default()}</p>
                                        <ItemOffers item_id=item.id />
                                        <div class="card-actions">
                                            <button
                                                type="button"
                                                class="btn-link"
                                                on:click=move |_| modal.set(Some(OpenModal::Item(FormMode::Edit(edit.clone()))))
                                            >
                                                "Edit"
                                            </button>
                                            <DeleteConfirmButton
                                                button_class="btn-danger-link"
                                                on_confirm=move |_| delete_item(remove.clone())
                                            />
                                        </div>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                </Show>
            </section>

            {move || modal.get().map(|open| match open {
                OpenModal::Process(mode) => view! { <ProcessModal mode=mode on_close=close on_saved=saved /> }.into_any(),
                OpenModal::Provider(mode) => view! { <ProviderModal mode=mode on_close=close on_saved=saved /> }.into_any(),
                OpenModal::Item(mode) => view! {
                    <ItemModal mode=mode process_id=process_id on_close=close on_saved=saved />
                }
                .into_any(),
            })}
        </div>
    }
}

/// Offers of one item grouped by provider, one line per tier
#[component]
fn ItemOffers(item_id: u32) -> impl IntoView {
    let store = use_app_store();

    move || {
        let groups = store.offers().with(|offers| offers_by_provider(offers, item_id));
        if groups.is_empty() {
            return view! { <p class="hint">"No offers"</p> }.into_any();
        }
        let providers = store.providers().get();
        view! {
            <div class="item-offers">
                {groups
                    .into_iter()
                    .map(|(provider_id, offers)| view! {
                        <div class="item-offer-group">
                            <span class="item-offer-provider">{provider_name(&providers, provider_id)}</span>
                            <ul class="item-offer-tiers">
                                {offers
                                    .into_iter()
                                    .map(|o| view! {
                                        <li>{format!("Tier {}: {}", o.tier_number, unit_price(o.price_per_unit))}</li>
                                    })
                                    .collect_view()}
                            </ul>
                        </div>
                    })
                    .collect_view()}
            </div>
        }
        .into_any()
    }
}
