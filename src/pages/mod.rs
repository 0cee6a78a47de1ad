//! Pages
//!
//! One component per server route. The host serves the same bundle on every
//! path; the page is picked from `location.pathname`.

mod contracts;
mod pricing;
mod products;
mod optimization;

pub use contracts::ContractsPage;
pub use pricing::PricingPage;
pub use products::ProductsPage;
pub use optimization::OptimizationPage;

use crate::context::AppContext;
use crate::error::ApiResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// `/contracts` or `/contracts/{process_id}`
    Contracts(Option<u32>),
    Pricing,
    Products,
    Optimization,
}

impl Page {
    pub fn from_path(path: &str) -> Self {
        let mut parts = path.trim_matches('/').split('/').filter(|s| !s.is_empty());
        match parts.next() {
            Some("contracts") => Page::Contracts(parts.next().and_then(|id| id.parse().ok())),
            Some("pricing") => Page::Pricing,
            Some("products") => Page::Products,
            _ => Page::Optimization,
        }
    }

    /// Path of the navigation entry this page belongs to
    pub fn section(self) -> &'static str {
        match self {
            Page::Contracts(_) => "/contracts",
            Page::Pricing => "/pricing",
            Page::Products => "/products",
            Page::Optimization => "/optimization",
        }
    }
}

/// Store a loaded collection, or report why it failed
pub(crate) fn apply_loaded<T>(ctx: &AppContext, what: &str, result: ApiResult<T>, set: impl FnOnce(T)) {
    match result {
        Ok(value) => set(value),
        Err(e) => {
            tracing::warn!("Loading {} failed", what);
            ctx.toasts.error(&e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_from_path() {
        assert_eq!(Page::from_path("/contracts"), Page::Contracts(None));
        assert_eq!(Page::from_path("/contracts/12"), Page::Contracts(Some(12)));
        assert_eq!(Page::from_path("/contracts/abc/"), Page::Contracts(None));
        assert_eq!(Page::from_path("/pricing/"), Page::Pricing);
        assert_eq!(Page::from_path("/products"), Page::Products);
        assert_eq!(Page::from_path("/"), Page::Optimization);
        assert_eq!(Page::from_path("/unknown"), Page::Optimization);
    }
}
