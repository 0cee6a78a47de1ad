//! Cost Comparison
//!
//! Cost of the allocations saved on products, and a side-by-side comparison
//! against an editable plan. Both are costed by the backend at the product
//! quantities entered above.

use std::collections::BTreeMap;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{use_data_service, DataService};
use crate::comparison::{delta_label, seed_plan, set_plan_value, share_label, tier_badge_class, AllocationPlan, DeltaTone};
use crate::context::{use_app_context, ToastKind};
use crate::error::ApiResult;
use crate::format::{currency, thousands, unit_price};
use crate::models::{AllocationMode, CostComparison, CostResult, ProductAllocationDetail, ProductCost, ProviderCost};
use crate::quantities::positive_quantities;

const NO_QUANTITIES: &str = "Enter a quantity for at least one product";

fn units(value: f64) -> String {
    thousands(value.max(0.0).round() as u64)
}

// ========================
// Current Cost
// ========================

#[component]
pub fn CostBreakdownPanel(quantities: RwSignal<BTreeMap<u32, u64>>) -> impl IntoView {
    let ctx = use_app_context();
    let api = use_data_service();
    let result = RwSignal::new(None::<CostResult>);
    let (loading, set_loading) = signal(false);

    let load = move |_: leptos::ev::MouseEvent| {
        let q = quantities.with_untracked(positive_quantities);
        if q.is_empty() {
            ctx.toasts.show(NO_QUANTITIES, ToastKind::Info);
            return;
        }
        set_loading.set(true);
        spawn_local(async move {
            match api.current_cost(&q).await {
                Ok(cost) => result.set(Some(cost)),
                Err(e) => ctx.toasts.error(&e),
            }
            set_loading.set(false);
        });
    };

    view! {
        <section class="panel cost-panel">
            <div class="panel-header">
                <h2 class="panel-title">"Current cost"</h2>
                <button type="button" class="btn-secondary" disabled=move || loading.get() on:click=load>
                    {move || if loading.get() { "Calculating…" } else { "Calculate" }}
                </button>
            </div>
            {move || match result.get() {
                None => view! { <p class="hint">"Cost of the allocations saved on each product"</p> }.into_any(),
                Some(cost) => view! {
                    <p class="stat-value">{currency(cost.total_cost)}</p>
                    <ProviderBreakdown breakdown=cost.provider_breakdown />
                }
                .into_any(),
            }}
        </section>
    }
}

/// One card per provider with its tier and the items it was allocated
#[component]
fn ProviderBreakdown(breakdown: BTreeMap<String, ProviderCost>) -> impl IntoView {
    if breakdown.is_empty() {
        return view! { <p class="empty-message">"No allocations found"</p> }.into_any();
    }
    let cards = breakdown
        .into_iter()
        .map(|(name, cost)| {
            let tier = cost.tier_info.effective_tier;
            let rows = cost
                .rows
                .into_iter()
                .map(|row| view! {
                    <div class="allocation-bar">
                        <div class="allocation-bar-header">
                            <span class="allocation-item">{row.item_name}</span>
                            <span class="muted">
                                {format!(
                                    "{} files × {} (Tier {})",
                                    units(row.allocated_units),
                                    unit_price(row.price_per_unit),
                                    row.calculated_tier,
                                )}
                            </span>
                        </div>
                        <span class="allocation-cost">{currency(row.total_cost)}</span>
                    </div>
                })
                .collect_view();
            view! {
                <div class="provider-cost-card">
                    <div class="provider-cost-header">
                        <div>
                            <h3>{name}</h3>
                            <span class={tier_badge_class(tier)}>{format!("Tier {}", tier)}</span>
                        </div>
                        <div class="provider-cost-total">
                            <div class="stat-value">{currency(cost.total_cost)}</div>
                            <div class="muted">{format!("{} credit files", units(cost.total_units))}</div>
                        </div>
                    </div>
                    {rows}
                </div>
            }
        })
        .collect_view();
    view! { <div class="provider-cost-grid">{cards}</div> }.into_any()
}

// ========================
// Comparison
// ========================

#[derive(Clone, PartialEq)]
enum CompareState {
    Idle,
    Loading,
    Done(CostComparison),
}

/// Compare once; when nothing was planned yet and the optimized side came
/// back empty, plan from the current allocations and compare again
async fn compare(api: DataService, quantities: &BTreeMap<u32, u64>, plan: AllocationPlan) -> ApiResult<(CostComparison, AllocationPlan)> {
    let result = api.compare_allocations(quantities, &plan).await?;
    match seed_plan(&plan, &result) {
        Some(seeded) => {
            let again = api.compare_allocations(quantities, &seeded).await?;
            Ok((again, seeded))
        }
        None => Ok((result, plan)),
    }
}

#[component]
pub fn ComparisonPanel(quantities: RwSignal<BTreeMap<u32, u64>>) -> impl IntoView {
    let ctx = use_app_context();
    let api = use_data_service();
    let state = RwSignal::new(CompareState::Idle);
    let plan = RwSignal::new(AllocationPlan::new());

    let run = move || {
        let q = quantities.with_untracked(positive_quantities);
        if q.is_empty() {
            ctx.toasts.show(NO_QUANTITIES, ToastKind::Info);
            return;
        }
        let sent = plan.get_untracked();
        state.set(CompareState::Loading);
        spawn_local(async move {
            match compare(api, &q, sent).await {
                Ok((result, used)) => {
                    tracing::info!("Compared allocations: delta {:.2}", result.delta.amount);
                    plan.set(used);
                    state.set(CompareState::Done(result));
                }
                Err(e) => {
                    ctx.toasts.error(&e);
                    state.set(CompareState::Idle);
                }
            }
        });
    };
    let rerun = Callback::new(move |_: ()| run());

    view! {
        <section class="panel comparison-panel">
            <div class="panel-header">
                <h2 class="panel-title">"Current vs. edited allocations"</h2>
                <div class="panel-actions">
                    <button
                        type="button"
                        class="btn-secondary"
                        disabled=move || state.get() == CompareState::Loading
                        on:click=move |_| {
                            plan.set(AllocationPlan::new());
                            run();
                        }
                    >
                        "Reset plan"
                    </button>
                    <button
                        type="button"
                        class="btn-primary"
                        disabled=move || state.get() == CompareState::Loading
                        on:click=move |_| run()
                    >
                        "Compare"
                    </button>
                </div>
            </div>
            {move || match state.get() {
                CompareState::Idle => view! {
                    <p class="hint">"Compare the saved allocations with an edited plan at the quantities above"</p>
                }
                .into_any(),
                CompareState::Loading => view! { <p class="loading">"Calculating…"</p> }.into_any(),
                CompareState::Done(result) => view! { <ComparisonColumns result=result plan=plan on_change=rerun /> }.into_any(),
            }}
        </section>
    }
}

#[component]
fn ComparisonColumns(result: CostComparison, plan: RwSignal<AllocationPlan>, #[prop(into)] on_change: Callback<()>) -> impl IntoView {
    let CostComparison { current, optimized, delta } = result;
    let tone = DeltaTone::of(&delta);

    view! {
        <div class="comparison-grid">
            <div class="comparison-column comparison-base">
                <h3>"Current"</h3>
                <p class="stat-label">"Total cost"</p>
                <p class="stat-value">{currency(current.total_cost)}</p>
                <h4 class="section-title">"Allocations"</h4>
                <AllocationTree details=current.allocation_details />
                <h4 class="section-title">"Providers used"</h4>
                <ProviderBadges breakdown=current.provider_breakdown />
                <ProductCosts breakdown=current.product_breakdown />
            </div>
            <div class={format!("comparison-column comparison-plan {}", tone.css_class())}>
                <h3>"Edited plan"</h3>
                <p class="stat-label">"Total cost"</p>
                <p class="stat-value">{currency(optimized.total_cost)}</p>
                <p class={tone.css_class()}>{delta_label(&delta)}</p>
                <h4 class="section-title">"Allocations"</h4>
                <PlanEditor plan=plan on_change=on_change />
                <h4 class="section-title">"Providers used"</h4>
                <ProviderBadges breakdown=optimized.provider_breakdown.clone() />
                <ProductCosts breakdown=optimized.product_breakdown />
            </div>
        </div>
        <h3 class="section-title">"Provider breakdown of the edited plan"</h3>
        <ProviderBreakdown breakdown=optimized.provider_breakdown />
    }
}

/// Read-only product → item → provider shares
#[component]
fn AllocationTree(details: BTreeMap<String, ProductAllocationDetail>) -> impl IntoView {
    if details.is_empty() {
        return view! { <p class="muted">"No allocation details"</p> }.into_any();
    }
    details
        .into_values()
        .map(|product| {
            let items = product
                .items
                .into_values()
                .map(|item| {
                    let mode = item.allocation.mode;
                    let shares = item
                        .allocation
                        .providers
                        .into_iter()
                        .map(|share| {
                            let name = share.provider_name.unwrap_or_else(|| format!("Provider #{}", share.provider_id));
                            view! {
                                <span class="share-chip">
                                    <span>{name}</span>
                                    <span class="muted">{share_label(mode, share.value)}</span>
                                </span>
                            }
                        })
                        .collect_view();
                    view! {
                        <div class="allocation-tree-item">
                            <div class="allocation-item">{item.item_name}</div>
                            <div>{shares}</div>
                        </div>
                    }
                })
                .collect_view();
            view! {
                <div class="allocation-tree-product">
                    <div class="allocation-product">{product.product_name}</div>
                    {items}
                </div>
            }
        })
        .collect_view()
        .into_any()
}

/// Editable shares of the plan; every change is costed again
#[component]
fn PlanEditor(plan: RwSignal<AllocationPlan>, on_change: Callback<()>) -> impl IntoView {
    let snapshot = plan.get_untracked();
    if snapshot.is_empty() {
        return view! { <p class="muted">"No allocations"</p> }.into_any();
    }
    snapshot
        .into_iter()
        .map(|(product_id, product)| {
            let items = product
                .items
                .into_iter()
                .map(|(item_id, item)| {
                    let mode = item.mode;
                    let step = if mode == AllocationMode::Percentage { "1" } else { "1000" };
                    let inputs = item
                        .allocations
                        .into_iter()
                        .map(|share| {
                            let provider_id = share.provider_id;
                            let name = share.provider_name.unwrap_or_else(|| format!("Provider #{}", provider_id));
                            let (product_id, item_id) = (product_id.clone(), item_id.clone());
                            view! {
                                <div class="plan-row">
                                    <span class="plan-provider">{name}</span>
                                    <input
                                        type="number"
                                        min="0"
                                        step=step
                                        class="form-input plan-input"
                                        prop:value=share.value.to_string()
                                        on:change=move |ev| {
                                            let raw = event_target_value(&ev);
                                            let changed = plan
                                                .try_update(|p| set_plan_value(p, &product_id, &item_id, provider_id, &raw))
                                                .unwrap_or(false);
                                            if changed {
                                                on_change.run(());
                                            }
                                        }
                                    />
                                    <span class="muted">{if step == "1" { "%" } else { "files" }}</span>
                                </div>
                            }
                        })
                        .collect_view();
                    view! {
                        <div class="allocation-tree-item">
                            <div class="allocation-item">{item.item_name}</div>
                            {inputs}
                        </div>
                    }
                })
                .collect_view();
            view! {
                <div class="allocation-tree-product">
                    <div class="allocation-product">{product.product_name}</div>
                    {items}
                </div>
            }
        })
        .collect_view()
        .into_any()
}

#[component]
fn ProviderBadges(breakdown: BTreeMap<String, ProviderCost>) -> impl IntoView {
    if breakdown.is_empty() {
        return view! { <p class="muted">"No providers used"</p> }.into_any();
    }
    breakdown
        .into_iter()
        .map(|(name, cost)| {
            let tier = cost.tier_info.effective_tier;
            view! {
                <span class="provider-badge">
                    <span>{name}</span>
                    <span class={tier_badge_class(tier)}>{format!("T{}", tier)}</span>
                </span>
            }
        })
        .collect_view()
        .into_any()
}

#[component]
fn ProductCosts(breakdown: BTreeMap<String, ProductCost>) -> impl IntoView {
    (!breakdown.is_empty()).then(|| {
        let rows = breakdown
            .into_values()
            .map(|p| view! {
                <div class="product-cost-row">
                    <span class="muted">{p.product_name}</span>
                    <span>{currency(p.cost)}</span>
                </div>
            })
            .collect_view();
        view! {
            <div class="product-costs">
                <h4 class="section-title">"Products"</h4>
                {rows}
            </div>
        }
    })
}
