//! Product Modal
//!
//! Product form with item selection, per-item price multipliers and the
//! provider split of every process the selected items belong to.

use std::collections::BTreeMap;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::allocations::{allocation_payload, rebuild_groups, validate_allocations, AllocationGroup};
use crate::api::{use_data_service, ProductInput};
use crate::components::{FormMode, Modal, StatusSelect};
use crate::context::use_app_context;
use crate::error::ApiError;
use crate::models::{AllocationMode, PriceMultiplier, Product};
use crate::pricing::{multiplier_label, multiplier_payload, parse_multiplier, PriceTone, MAX_MULTIPLIER, MIN_MULTIPLIER};
use crate::store::{process_name, use_app_store, AppStateStoreFields};

/// Multipliers of a product keyed by item id; unparsable keys are skipped
pub fn multipliers_by_item(product: &Product) -> BTreeMap<u32, PriceMultiplier> {
    product
        .price_multipliers
        .iter()
        .filter_map(|(key, m)| key.parse::<u32>().ok().map(|id| (id, m.clone())))
        .collect()
}

#[component]
pub fn ProductModal(
    mode: FormMode<Product>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_saved: Callback<()>,
) -> impl IntoView {
    let ctx = use_app_context();
    let api = use_data_service();
    let store = use_app_store();
    let existing = mode.existing().cloned();

    let name = RwSignal::new(existing.as_ref().map(|p| p.name.clone()).unwrap_or_default());
    let description = RwSignal::new(existing.as_ref().and_then(|p| p.description.clone()).unwrap_or_default());
    let status = RwSignal::new(existing.as_ref().map(|p| p.status.clone()).unwrap_or_else(|| "active".to_string()));
    let selected = RwSignal::new(existing.as_ref().map(|p| p.item_ids.clone()).unwrap_or_default());
    let multipliers = RwSignal::new(existing.as_ref().map(multipliers_by_item).unwrap_or_default());
    let saved_allocations = StoredValue::new(existing.as_ref().map(|p| p.allocations.clone()).unwrap_or_default());
    let allocations = RwSignal::new(Vec::<AllocationGroup>::new());
    let (saving, set_saving) = signal(false);

    // Regroup whenever the selection or the catalog changes
    Effect::new(move |_| {
        let ids = selected.get();
        let groups = store.items().with(|items| {
            store.offers().with(|offers| {
                store.providers().with(|providers| {
                    let previous = allocations.get_untracked();
                    saved_allocations.with_value(|saved| rebuild_groups(&previous, &ids, items, offers, providers, saved))
                })
            })
        });
        allocations.set(groups);
    });

    let title = mode.title("Product");
    let mode = StoredValue::new(mode);

    let toggle_item = move |item_id: u32, checked: bool| {
        selected.update(|ids| {
            ids.retain(|id| *id != item_id);
            if checked {
                ids.push(item_id);
            }
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let product_name = name.get().trim().to_string();
        if product_name.is_empty() {
            ctx.toasts.error(&ApiError::validation("Product name is required"));
            return;
        }
        if let Err(e) = allocations.with(|groups| validate_allocations(groups)) {
            ctx.toasts.error(&e);
            return;
        }
        let item_ids = selected.get();
        let chosen: BTreeMap<u32, PriceMultiplier> = multipliers.with(|all| {
            all.iter()
                .filter(|(id, _)| item_ids.contains(id))
                .map(|(id, m)| (*id, m.clone()))
                .collect()
        });
        let input = ProductInput {
            name: product_name,
            description: description.get(),
            status: status.get(),
            item_ids,
            price_multipliers: multiplier_payload(&chosen),
            allocations: allocations.with(|groups| allocation_payload(groups)),
        };
        let mode = mode.get_value();
        set_saving.set(true);
        spawn_local(async move {
            let result = match &mode {
                FormMode::Create => api.create::<Product, _>(&input).await.map(|_| ()),
                FormMode::Edit(product) => api.update::<Product, _>(product.id, &input).await,
            };
            set_saving.set(false);
            match result {
                Ok(()) => {
                    ctx.toasts.success(mode.saved_message("Product"));
                    on_saved.run(());
                }
                Err(e) => ctx.toasts.error(&e),
            }
        });
    };

    view! {
        <Modal title=title on_close=on_close wide=true>
            <form class="modal-form" on:submit=on_submit>
                <label class="form-label">
                    "Product name"
                    <input
                        type="text"
                        class="form-input"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                </label>
                <label class="form-label">
                    "Description"
                    <textarea
                        class="form-input"
                        rows="2"
                        prop:value=move || description.get()
                        on:input=move |ev| description.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <label class="form-label">"Status" <StatusSelect value=status /></label>

                <h3 class="section-title">"Items"</h3>
                <div class="checkbox-list">
                    <For
                        each=move || store.items().get()
                        key=|i| i.id
                        children=move |item| {
                            let item_id = item.id;
                            view! {
                                <label class="checkbox-row">
                                    <input
                                        type="checkbox"
                                        prop:checked=move || selected.with(|ids| ids.contains(&item_id))
                                        on:change=move |ev| toggle_item(item_id, event_target_checked(&ev))
                                    />
                                    {item.item_name.clone()}
                                </label>
                            }
                        }
                    />
                </div>

                <h3 class="section-title">"Price multipliers"</h3>
                <Show
                    when=move || !selected.with(Vec::is_empty)
                    fallback=|| view! { <p class="hint">"Select items to set multipliers"</p> }
                >
                    <div class="multiplier-list">
                        <For
                            each=move || selected.get()
                            key=|id| *id
                            children=move |item_id| view! { <MultiplierRow item_id=item_id multipliers=multipliers /> }
                        />
                    </div>
                </Show>

                <h3 class="section-title">"Provider allocations"</h3>
                <Show
                    when=move || !allocations.with(Vec::is_empty)
                    fallback=|| view! { <p class="hint">"Select items to configure provider allocations"</p> }
                >
                    <For
                        each=move || allocations.with(|groups| groups.iter().map(|g| g.process_id).collect::<Vec<_>>())
                        key=|process_id| *process_id
                        children=move |process_id| view! { <AllocationBlock process_id=process_id allocations=allocations /> }
                    />
                </Show>

                <div class="modal-actions">
                    <button type="button" class="btn-secondary" on:click=move |_| on_close.run(())>"Cancel"</button>
                    <button type="submit" class="btn-primary" disabled=move || saving.get()>"Save"</button>
                </div>
            </form>
        </Modal>
    }
}

/// Multiplier and notes for one item, with a live label
#[component]
fn MultiplierRow(item_id: u32, multipliers: RwSignal<BTreeMap<u32, PriceMultiplier>>) -> impl IntoView {
    let store = use_app_store();
    let name = store.items().with(|items| crate::store::item_name(items, item_id));
    let initial = multipliers.with_untracked(|m| m.get(&item_id).cloned().unwrap_or_default());
    let current = move || multipliers.with(|m| m.get(&item_id).map(|e| e.multiplier).unwrap_or(1.0));

    view! {
        <div class="multiplier-row">
            <span class="multiplier-item">{name}</span>
            <input
                type="number"
                step="0.01"
                min=MIN_MULTIPLIER.to_string()
                max=MAX_MULTIPLIER.to_string()
                class="form-input multiplier-input"
                prop:value=initial.multiplier.to_string()
                on:input=move |ev| {
                    let value = parse_multiplier(&event_target_value(&ev));
                    multipliers.update(|m| m.entry(item_id).or_default().multiplier = value);
                }
                on:change=move |ev| {
                    let input: web_sys::HtmlInputElement = event_target(&ev);
                    input.set_value(&current().to_string());
                }
            />
            <span class=move || format!("multiplier-label {}", PriceTone::of(current()).css_class())>
                {move || multiplier_label(current())}
            </span>
            <input
                type="text"
                class="form-input multiplier-notes"
                placeholder="Notes"
                prop:value=initial.notes.clone()
                on:input=move |ev| {
                    let notes = event_target_value(&ev);
                    multipliers.update(|m| m.entry(item_id).or_default().notes = notes);
                }
            />
        </div>
    }
}

fn read_group<T>(allocations: RwSignal<Vec<AllocationGroup>>, process_id: Option<u32>, f: impl FnOnce(&AllocationGroup) -> T) -> Option<T> {
    allocations.with(|groups| groups.iter().find(|g| g.process_id == process_id).map(f))
}

fn update_group(allocations: RwSignal<Vec<AllocationGroup>>, process_id: Option<u32>, f: impl FnOnce(&mut AllocationGroup)) {
    allocations.update(|groups| {
        if let Some(group) = groups.iter_mut().find(|g| g.process_id == process_id) {
            f(group);
        }
    });
}

/// Percentage/units split of one process group across its providers
#[component]
fn AllocationBlock(process_id: Option<u32>, allocations: RwSignal<Vec<AllocationGroup>>) -> impl IntoView {
    let store = use_app_store();
    let title = move || store.processes().with(|ps| process_name(ps, process_id));
    let mode = move || read_group(allocations, process_id, |g| g.mode).unwrap_or_default();
    let providers = move || read_group(allocations, process_id, |g| g.providers.clone()).unwrap_or_default();
    let total = move || read_group(allocations, process_id, AllocationGroup::total).unwrap_or(0.0);
    let balanced = move || read_group(allocations, process_id, AllocationGroup::is_balanced).unwrap_or(true);
    let set_mode = move |next: AllocationMode| update_group(allocations, process_id, |g| g.set_mode(next));

    view! {
        <div class="allocation-block">
            <div class="allocation-header">
                <h4>{title}</h4>
                <div class="mode-toggle">
                    <button
                        type="button"
                        class=move || if mode() == AllocationMode::Percentage { "mode-btn active" } else { "mode-btn" }
                        on:click=move |_| set_mode(AllocationMode::Percentage)
                    >
                        "%"
                    </button>
                    <button
                        type="button"
                        class=move || if mode() == AllocationMode::Units { "mode-btn active" } else { "mode-btn" }
                        on:click=move |_| set_mode(AllocationMode::Units)
                    >
                        "Units"
                    </button>
                </div>
            </div>
            <Show
                when=move || !providers().is_empty()
                fallback=|| view! { <p class="hint">"No provider offers these items yet"</p> }
            >
                <For
                    each=providers
                    key=|(id, _)| *id
                    children=move |(provider_id, name)| {
                        view! {
                            <div class="allocation-row">
                                <span class="allocation-provider">{name}</span>
                                <input
                                    type="number"
                                    min="0"
                                    class="form-input allocation-input"
                                    prop:value=move || {
                                        read_group(allocations, process_id, |g| g.value(provider_id)).unwrap_or(0.0).to_string()
                                    }
                                    on:change=move |ev| {
                                        let raw = event_target_value(&ev);
                                        update_group(allocations, process_id, |g| g.set_value(provider_id, &raw));
                                    }
                                />
                                <span class="allocation-suffix">{move || mode().suffix()}</span>
                                <Show when=move || mode() == AllocationMode::Percentage>
                                    <button
                                        type="button"
                                        class="btn-link"
                                        on:click=move |_| update_group(allocations, process_id, |g| {
                                            g.give_all_to(provider_id);
                                        })
                                    >
                                        "100% here"
                                    </button>
                                </Show>
                            </div>
                        }
                    }
                />
                <div class="allocation-total">
                    <span>"Total"</span>
                    <span>{move || format!("{} {}", total(), mode().suffix())}</span>
                </div>
                {move || (!balanced()).then(|| view! { <p class="validation-message">"Total allocation must equal 100%"</p> })}
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipliers_by_item_skips_bad_keys() {
        let mut product = Product {
            id: 1,
            name: "Loan".to_string(),
            description: None,
            status: "active".to_string(),
            item_ids: vec![4, 5],
            proxy_quantity: None,
            price_multipliers: BTreeMap::new(),
            allocations: BTreeMap::new(),
        };
        product.price_multipliers.insert("4".to_string(), PriceMultiplier { multiplier: 0.9, notes: String::new() });
        product.price_multipliers.insert("x".to_string(), PriceMultiplier::default());
        let map = multipliers_by_item(&product);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&4].multiplier, 0.9);
    }
}
