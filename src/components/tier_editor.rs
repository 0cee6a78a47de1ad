//! Tier Editor Component
//!
//! Threshold rows for a provider's pricing tiers.

use leptos::prelude::*;

use crate::pricing::BASE_TIER;
use crate::tiers::TierRows;

#[component]
pub fn TierEditor(rows: RwSignal<TierRows>) -> impl IntoView {
    view! {
        <div class="tier-editor">
            <div class="tier-editor-header">
                <span class="form-label">"Tier thresholds"</span>
                <button
                    type="button"
                    class="btn-link"
                    on:click=move |_| rows.update(|r| {
                        r.add_row();
                    })
                >
                    "+ Add tier"
                </button>
            </div>
            <For
                each=move || rows.get().rows().to_vec()
                key=|row| row.tier
                children=move |row| {
                    let tier = row.tier;
                    view! {
                        <div class="tier-row">
                            <span class="tier-label">{format!("Tier {}:", tier)}</span>
                            <span class="tier-op">"<"</span>
                            <input
                                type="number"
                                min="0"
                                class="tier-threshold"
                                prop:value=row.threshold.to_string()
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    rows.update(|r| r.set_threshold(tier, &value));
                                }
                            />
                            <span class="tier-unit">"units"</span>
                            {(tier != BASE_TIER).then(|| view! {
                                <button
                                    type="button"
                                    class="tier-remove"
                                    title="Remove tier"
                                    on:click=move |_| rows.update(|r| r.remove_row(tier))
                                >
                                    "×"
                                </button>
                            })}
                        </div>
                    }
                }
            />
        </div>
    }
}
