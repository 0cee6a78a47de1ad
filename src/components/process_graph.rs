//! Process Navigator
//!
//! SVG diagram of the process graph with drag-to-pan, and a plain list
//! view as the alternative. Clicking a process opens its contracts page.

use leptos::html;
use leptos::prelude::*;
use leptos_pan::{create_pan_signals, is_home, make_on_mousedown, make_on_mousemove, make_on_mouseup, reset, set_home, transform};

use crate::context::use_app_context;
use crate::graph::{auto_layout, edge_path, home_offset_x, pan_bounds, truncate_label};
use crate::store::{use_app_store, AppStateStoreFields};

/// Full page navigation to a process
fn open_process(process_id: u32) {
    let url = format!("/contracts/{}", process_id);
    if let Err(e) = window().location().set_href(&url) {
        tracing::error!("Navigation to {} failed: {:?}", url, e);
    }
}

#[component]
pub fn ProcessNavigator(#[prop(into)] current: Signal<Option<u32>>) -> impl IntoView {
    let (menu_view, set_menu_view) = signal(false);

    view! {
        <nav class="process-nav">
            <div class="process-nav-toolbar">
                <button
                    type="button"
                    class="graph-toggle"
                    title=move || if menu_view.get() { "Switch to Graph View" } else { "Switch to Menu View" }
                    on:click=move |_| set_menu_view.update(|v| *v = !*v)
                >
                    {move || if menu_view.get() { "Graph" } else { "Menu" }}
                </button>
            </div>
            <Show when=move || menu_view.get() fallback=move || view! { <ProcessGraphView current=current /> }>
                <ProcessMenu current=current />
            </Show>
        </nav>
    }
}

#[component]
pub fn ProcessGraphView(#[prop(into)] current: Signal<Option<u32>>) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let cfg = ctx.graph;
    let pan = create_pan_signals();
    let container = NodeRef::<html::Div>::new();
    let hovered = RwSignal::new(None::<String>);

    let layout = Memo::new(move |_| {
        let ids: Vec<u32> = store.processes().with(|ps| ps.iter().map(|p| p.id).collect());
        store.edges().with(|edges| auto_layout(&ids, edges, &cfg))
    });

    // New layout or container: refresh pan limits and jump home
    Effect::new(move |_| {
        let positions = layout.get();
        let width = container
            .get()
            .map(|el| el.client_width() as f64)
            .filter(|w| *w > 0.0)
            .unwrap_or(cfg.canvas_width);
        pan.viewport.set((width, cfg.canvas_height));
        pan.bounds.set(pan_bounds(positions.values(), &cfg));
        set_home(&pan, (home_offset_x(width, &cfg), 0.0));
    });

    let on_mousedown = make_on_mousedown(pan, ".graph-node");
    let on_mousemove = make_on_mousemove(pan);
    let on_mouseup = make_on_mouseup(pan);

    let edges_view = move || {
        let positions = layout.get();
        store.edges().with(|edges| {
            edges
                .iter()
                .filter_map(|e| {
                    let from = *positions.get(&e.from_process_id)?;
                    let to = *positions.get(&e.to_process_id)?;
                    Some(view! {
                        <path class="graph-edge" d=edge_path(from, to, &cfg) fill="none" marker-end="url(#arrowhead)" />
                    })
                })
                .collect_view()
        })
    };

    let nodes_view = move || {
        let positions = layout.get();
        let active = current.get();
        store.processes().with(|processes| {
            processes
                .iter()
                .filter_map(|p| {
                    let pos = *positions.get(&p.id)?;
                    let id = p.id;
                    let truncated = truncate_label(&p.name, cfg.node_width);
                    let full_name = truncated.as_ref().map(|_| p.name.clone());
                    let label = truncated.unwrap_or_else(|| p.name.clone());
                    let is_current = active == Some(id);
                    Some(view! {
                        <g
                            class={if is_current { "graph-node graph-node-active" } else { "graph-node" }}
                            data-process-id=id.to_string()
                            on:click=move |_| {
                                if !is_current {
                                    open_process(id);
                                }
                            }
                            on:mouseenter=move |_| hovered.set(full_name.clone())
                            on:mouseleave=move |_| hovered.set(None)
                        >
                            <rect
                                x=pos.x.to_string()
                                y=pos.y.to_string()
                                width=cfg.node_width.to_string()
                                height=cfg.node_height.to_string()
                                rx="12"
                            />
                            <text
                                x=(pos.x + cfg.node_width / 2.0).to_string()
                                y=(pos.y + cfg.node_height / 2.0 + 5.0).to_string()
                                text-anchor="middle"
                                pointer-events="none"
                            >
                                {label}
                            </text>
                        </g>
                    })
                })
                .collect_view()
        })
    };

    view! {
        <div
            class="graph-container"
            class:dragging=move || pan.dragging.get()
            node_ref=container
            on:mousedown=on_mousedown
            on:mousemove=on_mousemove
            on:mouseup=on_mouseup
            on:mouseleave=on_mouseup
        >
            <Show when=move || !is_home(&pan)>
                <button type="button" class="graph-home-btn" title="Reset to default view" on:click=move |_| reset(&pan)>
                    "⌂"
                </button>
            </Show>
            <Show when=move || hovered.get().is_some()>
                <div class="graph-tooltip">{move || hovered.get().unwrap_or_default()}</div>
            </Show>
            <Show
                when=move || store.processes().with(|ps| !ps.is_empty())
                fallback=|| view! { <p class="empty-message">"No processes defined"</p> }
            >
                <svg class="process-graph" width="100%" height=cfg.canvas_height.to_string()>
                    <defs>
                        <marker id="arrowhead" markerWidth="10" markerHeight="7" refX="10" refY="3.5" orient="auto">
                            <polygon points="0 0, 10 3.5, 0 7" />
                        </marker>
                    </defs>
                    <g transform=move || transform(&pan)>
                        <g class="graph-edges">{edges_view}</g>
                        <g class="graph-nodes">{nodes_view}</g>
                    </g>
                </svg>
            </Show>
        </div>
    }
}

#[component]
pub fn ProcessMenu(#[prop(into)] current: Signal<Option<u32>>) -> impl IntoView {
    let store = use_app_store();

    view! {
        <ul class="process-menu">
            <For
                each=move || store.processes().get()
                key=|p| p.id
                children=move |p| {
                    let id = p.id;
                    view! {
                        <li>
                            <a
                                href=format!("/contracts/{}", id)
                                class=move || if current.get() == Some(id) { "process-menu-item active" } else { "process-menu-item" }
                            >
                                {p.name.clone()}
                            </a>
                        </li>
                    }
                }
            />
        </ul>
    }
}
