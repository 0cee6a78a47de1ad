//! Offer Editor Component
//!
//! Per-provider tier price inputs inside the item modal.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_data_service;
use crate::context::use_app_context;
use crate::models::{Provider, ProviderTiers};
use crate::offers::{tier_slots, OfferDraft};

#[component]
pub fn OfferEditor(
    draft: RwSignal<OfferDraft>,
    #[prop(into)] providers: Signal<Vec<Provider>>,
) -> impl IntoView {
    let ctx = use_app_context();
    let api = use_data_service();
    let (selected, set_selected) = signal(String::new());
    // Bumped when prices change from code, so inputs re-render with new values
    let version = RwSignal::new(0u32);

    let available = Memo::new(move |_| {
        let all = providers.get();
        draft.with(|d| d.available(&all).into_iter().cloned().collect::<Vec<_>>())
    });

    let add_provider = move |_| {
        let Ok(provider_id) = selected.get().parse::<u32>() else { return };
        let Some(provider) = providers.get_untracked().into_iter().find(|p| p.id == provider_id) else { return };
        set_selected.set(String::new());
        spawn_local(async move {
            let tiers = match api.tier_thresholds(provider.id).await {
                Ok(tiers) => tiers,
                Err(e) => {
                    ctx.toasts.error(&e);
                    ProviderTiers::default()
                }
            };
            draft.update(|d| d.add_provider(&provider, tier_slots(&tiers)));
        });
    };

    view! {
        <div class="offer-editor">
            <Show
                when=move || !available.get().is_empty()
                fallback=|| view! { <p class="hint">"All active providers have been added"</p> }
            >
                <div class="offer-editor-add">
                    <select
                        class="form-select"
                        prop:value=move || selected.get()
                        on:change=move |ev| set_selected.set(event_target_value(&ev))
                    >
                        <option value="">"Select provider…"</option>
                        <For
                            each=move || available.get()
                            key=|p| p.id
                            children=|p| view! { <option value=p.id.to_string()>{p.company_name.clone()}</option> }
                        />
                    </select>
                    <button type="button" class="btn-secondary" on:click=add_provider>"Add provider"</button>
                </div>
            </Show>

            <Show when=move || draft.with(|d| d.is_empty())>
                <p class="hint">"No providers added yet"</p>
            </Show>

            <div class="offer-editor-grid">
                <For
                    each=move || {
                        let v = version.get();
                        draft.with(|d| d.providers().iter().cloned().map(|p| (v, p)).collect::<Vec<_>>())
                    }
                    key=|(v, p)| (*v, p.provider_id)
                    children=move |(_, entry)| {
                        let provider_id = entry.provider_id;
                        let first_tier = entry.tiers.first().map(|t| t.tier);
                        view! {
                            <div class="offer-provider">
                                <div class="offer-provider-header">
                                    <h4>{entry.provider_name.clone()}</h4>
                                    <button
                                        type="button"
                                        class="btn-danger-link"
                                        on:click=move |_| draft.update(|d| d.remove_provider(provider_id))
                                    >
                                        "Remove"
                                    </button>
                                </div>
                                {entry.tiers.iter().map(|slot| {
                                    let tier = slot.tier;
                                    let current = entry.prices.get(&tier).map(|p| p.to_string()).unwrap_or_default();
                                    view! {
                                        <div class="offer-tier-row">
                                            <label class="offer-tier-label">{slot.label.clone()}</label>
                                            <span>"$"</span>
                                            <input
                                                type="number"
                                                step="0.000001"
                                                min="0"
                                                placeholder="0.0000"
                                                class="form-input"
                                                prop:value=current
                                                on:input=move |ev| {
                                                    let value = event_target_value(&ev);
                                                    draft.update(|d| d.set_price(provider_id, tier, &value));
                                                }
                                            />
                                            {(Some(tier) == first_tier).then(|| view! {
                                                <button
                                                    type="button"
                                                    class="btn-small"
                                                    on:click=move |_| {
                                                        let applied = draft.try_update(|d| d.apply_first_tier_to_all(provider_id)).unwrap_or(false);
                                                        if applied {
                                                            version.update(|v| *v += 1);
                                                        }
                                                    }
                                                >
                                                    "Apply All"
                                                </button>
                                            })}
                                        </div>
                                    }
                                }).collect_view()}
                            </div>
                        }
                    }
                />
            </div>

            <Show when=move || draft.with(|d| !d.is_empty() && !d.is_complete())>
                <p class="validation-msg">"Every tier needs a price greater than 0"</p>
            </Show>
        </div>
    }
}
