//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::config::GraphConfig;
use crate::error::ApiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn css_class(self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
            ToastKind::Warning => "toast toast-warning",
            ToastKind::Info => "toast toast-info",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub message: String,
    pub kind: ToastKind,
}

/// Append, then drop the oldest entries beyond `limit`
fn push_bounded(list: &mut Vec<Toast>, toast: Toast, limit: usize) {
    list.push(toast);
    let excess = list.len().saturating_sub(limit.max(1));
    list.drain(..excess);
}

/// Transient notifications, auto-dismissed after a delay
#[derive(Clone, Copy)]
pub struct ToastQueue {
    pub items: RwSignal<Vec<Toast>>,
    next_id: RwSignal<u32>,
    duration_ms: u32,
    limit: usize,
}

impl ToastQueue {
    pub fn new(duration_ms: u32, limit: usize) -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(1),
            duration_ms,
            limit,
        }
    }

    pub fn show(&self, message: impl Into<String>, kind: ToastKind) {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        let toast = Toast { id, message: message.into(), kind };
        let limit = self.limit;
        self.items.update(|list| push_bounded(list, toast, limit));

        let queue = *self;
        spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(queue.duration_ms).await;
            queue.dismiss(id);
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Success);
    }

    pub fn error(&self, err: &ApiError) {
        tracing::error!(status = ?err.status(), "{}", err);
        let kind = if err.is_validation() { ToastKind::Warning } else { ToastKind::Error };
        self.show(err.to_string(), kind);
    }

    pub fn dismiss(&self, id: u32) {
        self.items.update(|list| list.retain(|t| t.id != id));
    }
}

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Trigger to reload page data from backend - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to reload page data from backend - write
    set_reload_trigger: WriteSignal<u32>,
    pub toasts: ToastQueue,
    pub graph: GraphConfig,
}

impl AppContext {
    pub fn new(reload_trigger: (ReadSignal<u32>, WriteSignal<u32>), toasts: ToastQueue, graph: GraphConfig) -> Self {
        Self {
            reload_trigger: reload_trigger.0,
            set_reload_trigger: reload_trigger.1,
            toasts,
            graph,
        }
    }

    /// Trigger a reload of page data
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toast(id: u32) -> Toast {
        Toast { id, message: format!("m{}", id), kind: ToastKind::Info }
    }

    #[test]
    fn test_push_bounded_keeps_newest() {
        let mut list = Vec::new();
        push_bounded(&mut list, toast(1), 1);
        push_bounded(&mut list, toast(2), 1);
        assert_eq!(list.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2]);

        push_bounded(&mut list, toast(3), 3);
        assert_eq!(list.len(), 2);
    }
}
