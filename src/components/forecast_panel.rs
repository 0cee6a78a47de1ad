//! Forecast Panel
//!
//! Monthly forecast and actual volumes of one product, side by side.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{use_data_service, ActualInput, DataService, ForecastInput};
use crate::components::DeleteConfirmButton;
use crate::context::use_app_context;
use crate::error::{ApiError, ApiResult};
use crate::format::{period, thousands};
use crate::models::{Actual, Forecast};

/// One month: forecast and actual as `(record id, units)`
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodRow {
    pub year: i32,
    pub month: u32,
    pub forecast: Option<(u32, u64)>,
    pub actual: Option<(u32, u64)>,
}

/// Join forecasts and actuals by month, newest first
pub fn merge_periods(forecasts: &[Forecast], actuals: &[Actual]) -> Vec<PeriodRow> {
    fn row_for(rows: &mut Vec<PeriodRow>, year: i32, month: u32) -> usize {
        match rows.iter().position(|r| r.year == year && r.month == month) {
            Some(i) => i,
            None => {
                rows.push(PeriodRow { year, month, forecast: None, actual: None });
                rows.len() - 1
            }
        }
    }

    let mut rows: Vec<PeriodRow> = Vec::new();
    for f in forecasts {
        let i = row_for(&mut rows, f.year, f.month);
        rows[i].forecast = Some((f.id, f.units));
    }
    for a in actuals {
        let i = row_for(&mut rows, a.year, a.month);
        rows[i].actual = Some((a.id, a.units));
    }
    rows.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
    rows
}

/// Validate a year/month/units triple from the form
pub fn parse_period(year: &str, month: &str, units: &str) -> ApiResult<(i32, u32, u64)> {
    let year = year
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|y| (1900..=2999).contains(y))
        .ok_or_else(|| ApiError::validation("Enter a valid year"))?;
    let month = month
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| ApiError::validation("Month must be between 1 and 12"))?;
    let units = units
        .trim()
        .parse::<u64>()
        .map_err(|_| ApiError::validation("Units must be a whole number"))?;
    Ok((year, month, units))
}

#[derive(Clone, Copy, PartialEq)]
enum EntryKind {
    Forecast,
    Actual,
}

async fn load_periods(api: DataService, product_id: u32) -> ApiResult<Vec<PeriodRow>> {
    let (forecasts, actuals) = futures::join!(api.forecasts_for_product(product_id), api.actuals_for_product(product_id));
    Ok(merge_periods(&forecasts?, &actuals?))
}

#[component]
pub fn ForecastPanel(product_id: u32, #[prop(into)] product_name: String) -> impl IntoView {
    let ctx = use_app_context();
    let api = use_data_service();
    let rows = RwSignal::new(Vec::<PeriodRow>::new());
    let (refresh, set_refresh) = signal(0u32);

    let year = RwSignal::new(js_sys::Date::new_0().get_full_year().to_string());
    let month = RwSignal::new(String::new());
    let units = RwSignal::new(String::new());
    let kind = RwSignal::new(EntryKind::Forecast);

    Effect::new(move |_| {
        refresh.track();
        spawn_local(async move {
            match load_periods(api, product_id).await {
                Ok(loaded) => rows.set(loaded),
                Err(e) => ctx.toasts.error(&e),
            }
        });
    });

    let on_add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (y, m, u) = match parse_period(&year.get(), &month.get(), &units.get()) {
            Ok(parsed) => parsed,
            Err(e) => {
                ctx.toasts.error(&e);
                return;
            }
        };
        let entry_kind = kind.get();
        spawn_local(async move {
            let result = match entry_kind {
                EntryKind::Forecast => api
                    .create::<Forecast, _>(&ForecastInput { product_id, year: y, month: m, forecast_units: u })
                    .await
                    .map(|_| ()),
                EntryKind::Actual => api
                    .create::<Actual, _>(&ActualInput { product_id, year: y, month: m, actual_units: u })
                    .await
                    .map(|_| ()),
            };
            match result {
                Ok(()) => {
                    units.set(String::new());
                    set_refresh.update(|v| *v += 1);
                }
                Err(e) => ctx.toasts.error(&e),
            }
        });
    };

    let remove = move |entry_kind: EntryKind, id: u32| {
        spawn_local(async move {
            let result = match entry_kind {
                EntryKind::Forecast => api.delete::<Forecast>(id).await,
                EntryKind::Actual => api.delete::<Actual>(id).await,
            };
            match result {
                Ok(()) => set_refresh.update(|v| *v += 1),
                Err(e) => ctx.toasts.error(&e),
            }
        });
    };

    let cell = move |entry_kind: EntryKind, value: Option<(u32, u64)>| match value {
        Some((id, n)) => view! {
            <td class="num">
                {thousands(n)}
                <DeleteConfirmButton button_class="btn-icon" label="×" on_confirm=move |_| remove(entry_kind, id) />
            </td>
        }
        .into_any(),
        None => view! { <td class="num muted">"—"</td> }.into_any(),
    };

    view! {
        <section class="forecast-panel">
            <h3>"Volumes: " {product_name}</h3>
            <form class="forecast-form" on:submit=on_add>
                <select
                    class="form-select"
                    on:change=move |ev| {
                        kind.set(if event_target_value(&ev) == "actual" { EntryKind::Actual } else { EntryKind::Forecast })
                    }
                >
                    <option value="forecast">"Forecast"</option>
                    <option value="actual">"Actual"</option>
                </select>
                <input
                    type="number"
                    class="form-input"
                    placeholder="Year"
                    prop:value=move || year.get()
                    on:input=move |ev| year.set(event_target_value(&ev))
                />
                <input
                    type="number"
                    min="1"
                    max="12"
                    class="form-input"
                    placeholder="Month"
                    prop:value=move || month.get()
                    on:input=move |ev| month.set(event_target_value(&ev))
                />
                <input
                    type="number"
                    min="0"
                    class="form-input"
                    placeholder="Units"
                    prop:value=move || units.get()
                    on:input=move |ev| units.set(event_target_value(&ev))
                />
                <button type="submit" class="btn-primary">"Add"</button>
            </form>
            <Show
                when=move || !rows.with(Vec::is_empty)
                fallback=|| view! { <p class="empty-message">"No forecasts or actuals recorded"</p> }
            >
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"Period"</th>
                            <th class="num">"Forecast"</th>
                            <th class="num">"Actual"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || rows.get()
                            key=|r| (r.year, r.month, r.forecast, r.actual)
                            children=move |row| view! {
                                <tr>
                                    <td>{period(row.year, row.month)}</td>
                                    {cell(EntryKind::Forecast, row.forecast)}
                                    {cell(EntryKind::Actual, row.actual)}
                                </tr>
                            }
                        />
                    </tbody>
                </table>
            </Show>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_periods_joins_and_sorts() {
        let forecasts = vec![
            Forecast { id: 1, product_id: 9, year: 2025, month: 3, units: 100 },
            Forecast { id: 2, product_id: 9, year: 2025, month: 4, units: 120 },
        ];
        let actuals = vec![
            Actual { id: 7, product_id: 9, year: 2025, month: 3, units: 95 },
            Actual { id: 8, product_id: 9, year: 2024, month: 12, units: 80 },
        ];
        let rows = merge_periods(&forecasts, &actuals);
        assert_eq!(rows.len(), 3);
        assert_eq!((rows[0].year, rows[0].month), (2025, 4));
        assert_eq!(rows[1].forecast, Some((1, 100)));
        assert_eq!(rows[1].actual, Some((7, 95)));
        assert_eq!(rows[2].forecast, None);
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(parse_period("2025", "4", "1200").unwrap(), (2025, 4, 1200));
        assert!(parse_period("2025", "13", "1").unwrap_err().is_validation());
        assert!(parse_period("abc", "1", "1").is_err());
        assert!(parse_period("2025", "1", "-5").is_err());
    }
}
