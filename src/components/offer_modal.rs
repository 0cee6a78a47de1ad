//! Offer Modal
//!
//! Single offer form used on the pricing page.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_data_service;
use crate::components::{FormMode, Modal, StatusSelect};
use crate::context::use_app_context;
use crate::error::{ApiError, ApiResult};
use crate::models::Offer;
use crate::offers::OfferInput;
use crate::pricing::BASE_TIER;
use crate::store::{use_app_store, AppStateStoreFields};

/// Validate raw form values into a request body
pub fn offer_input(item: &str, provider: &str, tier: &str, price: &str, status: String) -> ApiResult<OfferInput> {
    let item_id = item.parse::<u32>().map_err(|_| ApiError::validation("Select an item"))?;
    let provider_id = provider.parse::<u32>().map_err(|_| ApiError::validation("Select a provider"))?;
    let tier_number = tier
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|t| *t >= BASE_TIER)
        .ok_or_else(|| ApiError::validation("Tier number must be 1 or higher"))?;
    let price_per_unit = price
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| ApiError::validation("Price per unit must be greater than 0"))?;
    Ok(OfferInput { item_id, provider_id, process_id: None, tier_number, price_per_unit, status })
}

#[component]
pub fn OfferModal(
    mode: FormMode<Offer>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_saved: Callback<()>,
) -> impl IntoView {
    let ctx = use_app_context();
    let api = use_data_service();
    let store = use_app_store();
    let existing = mode.existing().cloned();

    let item = RwSignal::new(existing.as_ref().map(|o| o.item_id.to_string()).unwrap_or_default());
    let provider = RwSignal::new(existing.as_ref().map(|o| o.provider_id.to_string()).unwrap_or_default());
    let tier = RwSignal::new(existing.as_ref().map(|o| o.tier_number).unwrap_or(BASE_TIER).to_string());
    let price = RwSignal::new(existing.as_ref().map(|o| o.price_per_unit.to_string()).unwrap_or_default());
    let status = RwSignal::new(existing.as_ref().map(|o| o.status.clone()).unwrap_or_else(|| "active".to_string()));
    let (saving, set_saving) = signal(false);

    let title = mode.title("Offer");
    let mode = StoredValue::new(mode);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let mut input = match offer_input(&item.get(), &provider.get(), &tier.get(), &price.get(), status.get()) {
            Ok(input) => input,
            Err(e) => {
                ctx.toasts.error(&e);
                return;
            }
        };
        let mode = mode.get_value();
        input.process_id = mode.existing().and_then(|o| o.process_id);
        set_saving.set(true);
        spawn_local(async move {
            let result = match &mode {
                FormMode::Create => api.create::<Offer, _>(&input).await.map(|_| ()),
                FormMode::Edit(offer) => api.update::<Offer, _>(offer.id, &input).await,
            };
            set_saving.set(false);
            match result {
                Ok(()) => {
                    ctx.toasts.success(mode.saved_message("Offer"));
                    on_saved.run(());
                }
                Err(e) => ctx.toasts.error(&e),
            }
        });
    };

    view! {
        <Modal title=title on_close=on_close>
            <form class="modal-form" on:submit=on_submit>
                <label class="form-label">
                    "Item"
                    <select
                        class="form-select"
                        prop:value=move || item.get()
                        on:change=move |ev| item.set(event_target_value(&ev))
                    >
                        <option value="">"Select item…"</option>
                        <For
                            each=move || store.items().get()
                            key=|i| i.id
                            children=|i| view! { <option value=i.id.to_string()>{i.item_name.clone()}</option> }
                        />
                    </select>
                </label>
                <label class="form-label">
                    "Provider"
                    <select
                        class="form-select"
                        prop:value=move || provider.get()
                        on:change=move |ev| provider.set(event_target_value(&ev))
                    >
                        <option value="">"Select provider…"</option>
                        <For
                            each=move || store.providers().get()
                            key=|p| p.id
                            children=|p| view! { <option value=p.id.to_string()>{p.company_name.clone()}</option> }
                        />
                    </select>
                </label>
                <div class="form-row">
                    <label class="form-label">
                        "Tier"
                        <input
                            type="number"
                            min="1"
                            class="form-input"
                            prop:value=move || tier.get()
                            on:input=move |ev| tier.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="form-label">
                        "Price per unit"
                        <input
                            type="number"
                            step="0.000001"
                            min="0"
                            class="form-input"
                            prop:value=move || price.get()
                            on:input=move |ev| price.set(event_target_value(&ev))
                        />
                    </label>
                </div>
                <label class="form-label">"Status" <StatusSelect value=status /></label>
                <div class="modal-actions">
                    <button type="button" class="btn-secondary" on:click=move |_| on_close.run(())>"Cancel"</button>
                    <button type="submit" class="btn-primary" disabled=move || saving.get()>"Save"</button>
                </div>
            </form>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_input_valid() {
        let input = offer_input("3", "7", "2", "0.125", "active".to_string()).unwrap();
        assert_eq!((input.item_id, input.provider_id, input.tier_number), (3, 7, 2));
        assert_eq!(input.price_per_unit, 0.125);
    }

    #[test]
    fn test_offer_input_rejects_bad_values() {
        assert!(offer_input("", "7", "1", "1", "active".to_string()).unwrap_err().is_validation());
        assert!(offer_input("3", "7", "0", "1", "active".to_string()).is_err());
        assert!(offer_input("3", "7", "1", "0", "active".to_string()).is_err());
        assert!(offer_input("3", "7", "1", "abc", "active".to_string()).is_err());
    }
}
