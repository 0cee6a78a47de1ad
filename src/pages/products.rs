//! Products Page
//!
//! Product table, product form with multipliers, and the forecast panel of
//! the selected product.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::apply_loaded;
use crate::api::use_data_service;
use crate::components::{DeleteConfirmButton, FormMode, ForecastPanel, ProductModal, StatusBadge};
use crate::context::use_app_context;
use crate::format::thousands;
use crate::models::{Item, Offer, Process, Product, Provider};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn ProductsPage() -> impl IntoView {
    let ctx = use_app_context();
    let api = use_data_service();
    let store = use_app_store();
    let modal = RwSignal::new(None::<FormMode<Product>>);
    let selected = RwSignal::new(None::<u32>);

    Effect::new(move |_| {
        ctx.reload_trigger.track();
        spawn_local(async move {
            let (products, items, offers, providers, processes) = futures::join!(
                api.load::<Product>(),
                api.load::<Item>(),
                api.load::<Offer>(),
                api.load::<Provider>(),
                api.load::<Process>(),
            );
            apply_loaded(&ctx, "products", products, |v| store.products().set(v));
            apply_loaded(&ctx, "items", items, |v| store.items().set(v));
            apply_loaded(&ctx, "offers", offers, |v| store.offers().set(v));
            apply_loaded(&ctx, "providers", providers, |v| store.providers().set(v));
            apply_loaded(&ctx, "processes", processes, |v| store.processes().set(v));
        });
    });

    let close = Callback::new(move |_: ()| modal.set(None));
    let saved = Callback::new(move |_: ()| {
        modal.set(None);
        ctx.reload();
    });

    let delete_product = move |product: Product| {
        spawn_local(async move {
            match api.delete::<Product>(product.id).await {
                Ok(()) => {
                    ctx.toasts.success(format!("Product \"{}\" deleted", product.name));
                    if selected.get_untracked() == Some(product.id) {
                        selected.set(None);
                    }
                    ctx.reload();
                }
                Err(e) => ctx.toasts.error(&e),
            }
        });
    };

    let selected_product = Memo::new(move |_| {
        selected.get().and_then(|id| store.products().with(|ps| ps.iter().find(|p| p.id == id).cloned()))
    });

    view! {
        <div class="page products-page">
            <div class="page-header">
                <h1>"Products"</h1>
                <button type="button" class="btn-primary" on:click=move |_| modal.set(Some(FormMode::Create))>
                    "Add product"
                </button>
            </div>

            <section class="panel">
                <Show
                    when=move || store.products().with(|ps| !ps.is_empty())
                    fallback=|| view! { <p class="empty-message">"No products yet"</p> }
                >
                    <table class="data-table">
                        <thead>
                            <tr>
                                <th>"Product"</th>
                                <th>"Description"</th>
                                <th class="num">"Items"</th>
                                <th class="num">"Proxy quantity"</th>
                                <th>"Status"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || store.products().get()
                                key=|p| (p.id, p.name.clone(), p.item_ids.len(), p.status.clone(), p.proxy_quantity)
                                children=move |product| {
                                    let id = product.id;
                                    let edit = product.clone();
                                    let remove = product.clone();
                                    view! {
                                        <tr
                                            class=move || if selected.get() == Some(id) { "selected" } else { "" }
                                            on:click=move |_| selected.set(Some(id))
                                        >
                                            <td>{product.name.clone()}</td>
                                            <td class="muted">{product.description.clone().unwrap_or_default()}</td>
                                            <td class="num">{product.item_ids.len()}</td>
                                            <td class="num">{product.proxy_quantity.map(thousands).unwrap_or_default()}</td>
                                            <td><StatusBadge status=product.status.clone() /></td>
                                            <td class="row-actions">
                                                <button
                                                    type="button"
                                                    class="btn-link"
                                                    on:click=move |ev| {
                                                        ev.stop_propagation();
                                                        modal.set(Some(FormMode::Edit(edit.clone())));
                                                    }
                                                >
                                                    "Edit"
                                                </button>
                                                <DeleteConfirmButton
                                                    button_class="btn-danger-link"
                                                    on_confirm=move |_| delete_product(remove.clone())
                                                />
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </Show>
            </section>

            {move || selected_product.get().map(|p| view! { <ForecastPanel product_id=p.id product_name=p.name /> })}

            {move || modal.get().map(|mode| view! { <ProductModal mode=mode on_close=close on_saved=saved /> })}
        </div>
    }
}
