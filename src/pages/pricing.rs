//! Pricing Page
//!
//! Providers, items and offers as tables, with an offer form and filters.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::apply_loaded;
use crate::api::use_data_service;
use crate::components::{DeleteConfirmButton, FormMode, ItemModal, OfferModal, ProviderModal, StatusBadge};
use crate::context::use_app_context;
use crate::format::{thousands, unit_price};
use crate::models::{Item, Offer, Provider};
use crate::store::{item_name, provider_name, use_app_store, AppStateStoreFields};

#[derive(Clone, PartialEq)]
enum OpenModal {
    Offer(FormMode<Offer>),
    Provider(FormMode<Provider>),
    Item(FormMode<Item>),
}

#[component]
pub fn PricingPage() -> impl IntoView {
    let ctx = use_app_context();
    let api = use_data_service();
    let store = use_app_store();
    let modal = RwSignal::new(None::<OpenModal>);

    let filter_item = RwSignal::new(String::new());
    let filter_provider = RwSignal::new(String::new());
    let shown_offers = RwSignal::new(Vec::<Offer>::new());

    Effect::new(move |_| {
        ctx.reload_trigger.track();
        spawn_local(async move {
            let (providers, items, offers) = futures::join!(api.load::<Provider>(), api.load::<Item>(), api.load::<Offer>());
            apply_loaded(&ctx, "providers", providers, |v| store.providers().set(v));
            apply_loaded(&ctx, "items", items, |v| store.items().set(v));
            apply_loaded(&ctx, "offers", offers, |v| store.offers().set(v));
        });
    });

    // Filtered view comes from the server so it reflects writes immediately
    Effect::new(move |_| {
        ctx.reload_trigger.track();
        let item_id = filter_item.get().parse::<u32>().ok();
        let provider_id = filter_provider.get().parse::<u32>().ok();
        spawn_local(async move {
            match api.offers_filtered(item_id, provider_id).await {
                Ok(offers) => shown_offers.set(offers),
                Err(e) => ctx.toasts.error(&e),
            }
        });
    });

    let close = Callback::new(move |_: ()| modal.set(None));
    let saved = Callback::new(move |_: ()| {
        modal.set(None);
        ctx.reload();
    });

    let delete_offer = move |id: u32| {
        spawn_local(async move {
            match api.delete::<Offer>(id).await {
                Ok(()) => {
                    ctx.toasts.success("Offer deleted");
                    ctx.reload();
                }
                Err(e) => ctx.toasts.error(&e),
            }
        });
    };
    let delete_provider = move |id: u32| {
        spawn_local(async move {
            match api.delete::<Provider>(id).await {
                Ok(()) => {
                    ctx.toasts.success("Provider deleted");
                    ctx.reload();
                }
                Err(e) => ctx.toasts.error(&e),
            }
        });
    };
    let delete_item = move |id: u32| {
        spawn_local(async move {
            match api.delete::<Item>(id).await {
                Ok(()) => {
                    ctx.toasts.success("Item deleted");
                    ctx.reload();
                }
                Err(e) => ctx.toasts.error(&e),
            }
        });
    };

    view! {
        <div class="page pricing-page">
            <div class="page-header">
                <h1>"Pricing"</h1>
                <p class="counts">
                    {move || format!(
                        "{} providers · {} items · {} offers",
                        thousands(store.providers().with(Vec::len) as u64),
                        thousands(store.items().with(Vec::len) as u64),
                        thousands(store.offers().with(Vec::len) as u64),
                    )}
                </p>
            </div>

            <section class="panel">
                <h2 class="panel-title">"Providers"</h2>
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"Company"</th>
                            <th>"Details"</th>
                            <th>"Status"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || store.providers().get()
                            key=|p| (p.id, p.company_name.clone(), p.status.clone())
                            children=move |p| {
                                let id = p.id;
                                let edit = p.clone();
                                view! {
                                    <tr>
                                        <td>{p.company_name.clone()}</td>
                                        <td class="muted">{p.details.clone().unwrap_or_default()}</td>
                                        <td><StatusBadge status=p.status.clone() /></td>
                                        <td class="row-actions">
                                            <button
                                                type="button"
                                                class="btn-link"
                                                on:click=move |_| modal.set(Some(OpenModal::Provider(FormMode::Edit(edit.clone()))))
                                            >
                                                "Edit"
                                            </button>
                                            <DeleteConfirmButton button_class="btn-danger-link" on_confirm=move |_| delete_provider(id) />
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </section>

            <section class="panel">
                <h2 class="panel-title">"Items"</h2>
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"Item"</th>
                            <th>"Description"</th>
                            <th class="num">"Offers"</th>
                            <th>"Status"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || store.items().get()
                            key=|i| (i.id, i.item_name.clone(), i.status.clone())
                            children=move |i| {
                                let item_id = i.id;
                                let edit = i.clone();
                                view! {
                                    <tr>
                                        <td>{i.item_name.clone()}</td>
                                        <td class="muted">{i.description.clone().unwrap_or_default()}</td>
                                        <td class="num">
                                            {move || store.offers().with(|o| o.iter().filter(|o| o.item_id == item_id).count())}
                                        </td>
                                        <td><StatusBadge status=i.status.clone() /></td>
                                        <td class="row-actions">
                                            <button
                                                type="button"
                                                class="btn-link"
                                                on:click=move |_| modal.set(Some(OpenModal::Item(FormMode::Edit(edit.clone()))))
                                            >
                                                "Edit"
                                            </button>
                                            <DeleteConfirmButton button_class="btn-danger-link" on_confirm=move |_| delete_item(item_id) />
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </section>

            <section class="panel">
                <div class="panel-header">
                    <h2 class="panel-title">"Offers"</h2>
                    <div class="filters">
                        <select
                            class="form-select"
                            prop:value=move || filter_item.get()
                            on:change=move |ev| filter_item.set(event_target_value(&ev))
                        >
                            <option value="">"All items"</option>
                            <For
                                each=move || store.items().get()
                                key=|i| i.id
                                children=|i| view! { <option value=i.id.to_string()>{i.item_name.clone()}</option> }
                            />
                        </select>
                        <select
                            class="form-select"
                            prop:value=move || filter_provider.get()
                            on:change=move |ev| filter_provider.set(event_target_value(&ev))
                        >
                            <option value="">"All providers"</option>
                            <For
                                each=move || store.providers().get()
                                key=|p| p.id
                                children=|p| view! { <option value=p.id.to_string()>{p.company_name.clone()}</option> }
                            />
                        </select>
                    </div>
                    <button type="button" class="btn-primary" on:click=move |_| modal.set(Some(OpenModal::Offer(FormMode::Create)))>
                        "Add offer"
                    </button>
                </div>
                <Show
                    when=move || !shown_offers.with(Vec::is_empty)
                    fallback=|| view! { <p class="empty-message">"No offers match"</p> }
                >
                    <table class="data-table">
                        <thead>
                            <tr>
                                <th>"Item"</th>
                                <th>"Provider"</th>
                                <th>"Tier"</th>
                                <th class="num">"Price / unit"</th>
                                <th>"Status"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || {
                                let items = store.items().get();
                                let providers = store.providers().get();
                                shown_offers
                                    .get()
                                    .into_iter()
                                    .map(|offer| {
                                        let id = offer.id;
                                        let edit = offer.clone();
                                        view! {
                                            <tr>
                                                <td>{item_name(&items, offer.item_id)}</td>
                                                <td>{provider_name(&providers, offer.provider_id)}</td>
                                                <td>{format!("Tier {}", offer.tier_number)}</td>
                                                <td class="num">{unit_price(offer.price_per_unit)}</td>
                                                <td><StatusBadge status=offer.status.clone() /></td>
                                                <td class="row-actions">
                                                    <button
                                                        type="button"
                                                        class="btn-link"
                                                        on:click=move |_| modal.set(Some(OpenModal::Offer(FormMode::Edit(edit.clone()))))
                                                    >
                                                        "Edit"
                                                    </button>
                                                    <DeleteConfirmButton
                                                        button_class="btn-danger-link"
                                                        on_confirm=move |_| delete_offer(id)
                                                    />
                                                </td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </tbody>
                    </table>
                </Show>
            </section>

            {move || modal.get().map(|open| match open {
                OpenModal::Offer(mode) => view! { <OfferModal mode=mode on_close=close on_saved=saved /> }.into_any(),
                OpenModal::Provider(mode) => view! { <ProviderModal mode=mode on_close=close on_saved=saved /> }.into_any(),
                OpenModal::Item(mode) => view! {
                    <ItemModal mode=mode process_id=None on_close=close on_saved=saved />
                }
                .into_any(),
            })}
        </div>
    }
}
