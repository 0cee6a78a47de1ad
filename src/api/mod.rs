//! REST Client
//!
//! `DataService` wraps the backend's JSON CRUD convention
//! (`/api/{entity}` and `/api/{entity}/{id}`), organized by domain.

mod http;
mod catalog;
mod processes;
mod products;
mod optimization;

use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
pub use http::{query_string, Method};

// Re-export all public items
pub use catalog::*;
pub use processes::*;
pub use products::*;
pub use optimization::*;

/// A record type reachable under `/api/{PATH}`
pub trait Entity: DeserializeOwned + Clone + 'static {
    const PATH: &'static str;
}

/// Handle to the backend. Cheap to copy into closures.
#[derive(Clone, Copy)]
pub struct DataService {
    base: StoredValue<String>,
}

impl DataService {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: StoredValue::new(base.into()) }
    }

    /// Absolute URL for a path relative to the API base
    pub fn url(&self, path: &str) -> String {
        self.base.with_value(|base| join_url(base, path))
    }

    /// Send and decode; `None` when the server returned no content
    pub async fn fetch<T: DeserializeOwned>(&self, method: Method, path: &str, body: Option<String>) -> ApiResult<Option<T>> {
        match http::send(method, &self.url(path), body).await? {
            None => Ok(None),
            Some(text) if text.trim().is_empty() => Ok(None),
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        }
    }

    /// Send and ignore whatever comes back
    pub async fn execute(&self, method: Method, path: &str, body: Option<String>) -> ApiResult<()> {
        http::send(method, &self.url(path), body).await.map(|_| ())
    }

    // ========================
    // Generic CRUD
    // ========================

    pub async fn load<E: Entity>(&self) -> ApiResult<Vec<E>> {
        self.fetch::<Vec<E>>(Method::Get, E::PATH, None).await.map(Option::unwrap_or_default)
    }

    pub async fn get<E: Entity>(&self, id: u32) -> ApiResult<E> {
        self.fetch::<E>(Method::Get, &format!("{}/{}", E::PATH, id), None)
            .await?
            .ok_or_else(|| ApiError::Decode(format!("empty response for {} {}", E::PATH, id)))
    }

    pub async fn create<E: Entity, B: Serialize>(&self, body: &B) -> ApiResult<E> {
        let json = serde_json::to_string(body)?;
        self.fetch::<E>(Method::Post, E::PATH, Some(json))
            .await?
            .ok_or_else(|| ApiError::Decode(format!("empty response creating {}", E::PATH)))
    }

    pub async fn update<E: Entity, B: Serialize>(&self, id: u32, body: &B) -> ApiResult<()> {
        let json = serde_json::to_string(body)?;
        self.execute(Method::Put, &format!("{}/{}", E::PATH, id), Some(json)).await
    }

    pub async fn delete<E: Entity>(&self, id: u32) -> ApiResult<()> {
        self.execute(Method::Delete, &format!("{}/{}", E::PATH, id), None).await
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Provide the service to all children
pub fn provide_data_service(base: impl Into<String>) -> DataService {
    let service = DataService::new(base);
    provide_context(service);
    service
}

pub fn use_data_service() -> DataService {
    expect_context::<DataService>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("/api", "providers"), "/api/providers");
        assert_eq!(join_url("/api/", "/items/3/providers"), "/api/items/3/providers");
        assert_eq!(join_url("https://h/api", "offers?x=1"), "https://h/api/offers?x=1");
    }
}
