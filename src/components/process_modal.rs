//! Process Modal
//!
//! Create, edit or delete a process and manage its outgoing transitions.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{use_data_service, ProcessInput};
use crate::components::{DeleteConfirmButton, FormMode, Modal};
use crate::context::use_app_context;
use crate::error::ApiError;
use crate::models::{Process, ProcessEdge};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn ProcessModal(
    mode: FormMode<Process>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_saved: Callback<()>,
) -> impl IntoView {
    let ctx = use_app_context();
    let api = use_data_service();
    let existing = mode.existing().cloned();

    let name = RwSignal::new(existing.as_ref().map(|p| p.name.clone()).unwrap_or_default());
    let description = RwSignal::new(existing.as_ref().and_then(|p| p.description.clone()).unwrap_or_default());
    let (saving, set_saving) = signal(false);

    let title = mode.title("Process");
    let mode = StoredValue::new(mode);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let input = ProcessInput {
            process_name: name.get().trim().to_string(),
            description: description.get(),
        };
        if input.process_name.is_empty() {
            ctx.toasts.error(&ApiError::validation("Process name is required"));
            return;
        }
        let mode = mode.get_value();
        set_saving.set(true);
        spawn_local(async move {
            let result = match &mode {
                FormMode::Create => api.create::<Process, _>(&input).await.map(|_| ()),
                FormMode::Edit(process) => api.update::<Process, _>(process.id, &input).await,
            };
            set_saving.set(false);
            match result {
                Ok(()) => {
                    ctx.toasts.success(mode.saved_message("Process"));
                    on_saved.run(());
                }
                Err(e) => ctx.toasts.error(&e),
            }
        });
    };

    let on_delete = move |_| {
        let Some(process) = mode.with_value(|m| m.existing().cloned()) else { return };
        spawn_local(async move {
            match api.delete::<Process>(process.id).await {
                Ok(()) => {
                    ctx.toasts.success(format!("Process \"{}\" deleted", process.name));
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
                    "Process name"
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
                        rows="3"
                        prop:value=move || description.get()
                        on:input=move |ev| description.set(event_target_value(&ev))
                    ></textarea>
                </label>
                {existing.as_ref().map(|p| view! { <EdgeEditor process_id=p.id /> })}
                <div class="modal-actions">
                    {existing.is_some().then(|| view! {
                        <DeleteConfirmButton button_class="btn-danger" label="Delete process" on_confirm=on_delete />
                    })}
                    <button type="button" class="btn-secondary" on:click=move |_| on_close.run(())>"Cancel"</button>
                    <button type="submit" class="btn-primary" disabled=move || saving.get()>"Save"</button>
                </div>
            </form>
        </Modal>
    }
}

/// Outgoing transitions of one process. Changes are sent immediately.
#[component]
fn EdgeEditor(process_id: u32) -> impl IntoView {
    let ctx = use_app_context();
    let api = use_data_service();
    let store = use_app_store();
    let (target, set_target) = signal(String::new());

    let outgoing = Memo::new(move |_| {
        store.edges().with(|edges| {
            edges.iter().filter(|e| e.from_process_id == process_id).copied().collect::<Vec<_>>()
        })
    });
    let candidates = Memo::new(move |_| {
        let linked = outgoing.get();
        store.processes().with(|all| {
            all.iter()
                .filter(|p| p.id != process_id && !linked.iter().any(|e| e.to_process_id == p.id))
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    let apply = move |edge: ProcessEdge, add: bool| {
        spawn_local(async move {
            let result = if add {
                api.add_process_edge(edge).await
            } else {
                api.remove_process_edge(edge).await
            };
            match result {
                Ok(()) => {
                    store.edges().update(|edges| {
                        if add {
                            edges.push(edge);
                        } else {
                            edges.retain(|e| *e != edge);
                        }
                    });
                    ctx.reload();
                }
                Err(e) => ctx.toasts.error(&e),
            }
        });
    };

    let on_add = move |_| {
        let Ok(to) = target.get().parse::<u32>() else { return };
        set_target.set(String::new());
        apply(ProcessEdge { from_process_id: process_id, to_process_id: to }, true);
    };

    view! {
        <div class="edge-editor">
            <h3 class="section-title">"Next processes"</h3>
            <ul class="edge-list">
                <For
                    each=move || outgoing.get()
                    key=|e| e.to_process_id
                    children=move |edge| {
                        let label = store.processes().with(|all| {
                            all.iter()
                                .find(|p| p.id == edge.to_process_id)
                                .map(|p| p.name.clone())
                                .unwrap_or_else(|| format!("Process #{}", edge.to_process_id))
                        });
                        view! {
                            <li class="edge-row">
                                <span>"→ " {label}</span>
                                <button type="button" class="btn-danger-link" on:click=move |_| apply(edge, false)>
                                    "Remove"
                                </button>
                            </li>
                        }
                    }
                />
            </ul>
            <Show when=move || !candidates.get().is_empty()>
                <div class="edge-add">
                    <select
                        class="form-select"
                        prop:value=move || target.get()
                        on:change=move |ev| set_target.set(event_target_value(&ev))
                    >
                        <option value="">"Select process…"</option>
                        <For
                            each=move || candidates.get()
                            key=|p| p.id
                            children=|p| view! { <option value=p.id.to_string()>{p.name.clone()}</option> }
                        />
                    </select>
                    <button type="button" class="btn-secondary" on:click=on_add>"Add transition"</button>
                </div>
            </Show>
        </div>
    }
}
