//! UI Components
//!
//! Reusable Leptos components.

mod comparison_view;
mod delete_confirm_button;
mod forecast_panel;
mod item_modal;
mod log_panel;
mod modal;
mod offer_editor;
mod offer_modal;
mod optimization_form;
mod page_nav;
mod process_graph;
mod process_modal;
mod product_modal;
mod provider_modal;
mod quantity_panel;
mod status_badge;
mod tier_editor;
mod toast_host;

pub use comparison_view::{ComparisonPanel, CostBreakdownPanel};
pub use delete_confirm_button::DeleteConfirmButton;
pub use forecast_panel::ForecastPanel;
pub use item_modal::ItemModal;
pub use log_panel::LogPanel;
pub use modal::{FormMode, Modal};
pub use offer_editor::OfferEditor;
pub use offer_modal::OfferModal;
pub use optimization_form::OptimizationForm;
pub use page_nav::PageNav;
pub use process_graph::ProcessNavigator;
pub use process_modal::ProcessModal;
pub use product_modal::ProductModal;
pub use provider_modal::ProviderModal;
pub use quantity_panel::QuantityPanel;
pub use status_badge::{StatusBadge, StatusSelect};
pub use tier_editor::TierEditor;
pub use toast_host::ToastHost;
