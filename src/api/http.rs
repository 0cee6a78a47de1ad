//! HTTP Transport
//!
//! `fetch` wrapper returning the response body, or `None` for successful
//! 204 / `Content-Length: 0` responses. Any non-2xx status is an error.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Issue a request; `body` is sent as JSON
pub async fn send(method: Method, url: &str, body: Option<String>) -> ApiResult<Option<String>> {
    tracing::debug!(target: "http", "{} {}", method.as_str(), url);

    let init = web_sys::RequestInit::new();
    init.set_method(method.as_str());
    if let Some(body) = &body {
        init.set_body(&wasm_bindgen::JsValue::from_str(body));
    }

    let request = web_sys::Request::new_with_str_and_init(url, &init)?;
    if body.is_some() {
        request.headers().set("Content-Type", "application/json")?;
    }

    let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".to_string()))?;
    let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()
        .map_err(|_| ApiError::Decode("fetch did not return a Response".to_string()))?;

    let status = response.status();
    let content_length = response.headers().get("Content-Length").ok().flatten();
    match classify(status, content_length.as_deref()) {
        ResponseKind::Empty => {
            tracing::debug!(target: "http", "{} {} -> {} (no content)", method.as_str(), url, status);
            Ok(None)
        }
        ResponseKind::Body => {
            let text = JsFuture::from(response.text()?).await?.as_string().unwrap_or_default();
            Ok(Some(text))
        }
        ResponseKind::Failed => {
            let text = JsFuture::from(response.text()?).await?.as_string().unwrap_or_default();
            let detail = error_detail(status, &text);
            tracing::warn!(target: "http", "{} {} -> {}: {}", method.as_str(), url, status, detail);
            Err(ApiError::Http { status, detail })
        }
    }
}

/// How a response should be handled before its body is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Non-2xx, whatever the body
    Failed,
    /// 2xx with nothing to decode
    Empty,
    Body,
}

pub fn classify(status: u16, content_length: Option<&str>) -> ResponseKind {
    if !(200..300).contains(&status) {
        ResponseKind::Failed
    } else if status == 204 || content_length.map(str::trim) == Some("0") {
        ResponseKind::Empty
    } else {
        ResponseKind::Body
    }
}

/// Server `detail` field, else the raw body, else a generic status message
pub fn error_detail(status: u16, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        match map.get("detail") {
            Some(serde_json::Value::String(s)) if !s.is_empty() => return s.clone(),
            Some(serde_json::Value::Null) | None => {}
            Some(other) => return other.to_string(),
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.starts_with('{') {
        format!("Request failed with status {}", status)
    } else {
        trimmed.to_string()
    }
}

/// `?a=1&b=x%20y`, skipping `None` values; empty string when nothing is set
pub fn query_string(params: &[(&str, Option<String>)]) -> String {
    let parts: Vec<String> = params
        .iter()
        .filter_map(|(k, v)| {
            v.as_ref()
                .map(|v| format!("{}={}", k, utf8_percent_encode(v, NON_ALPHANUMERIC)))
        })
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_content_detection() {
        assert_eq!(classify(204, None), ResponseKind::Empty);
        assert_eq!(classify(200, Some("0")), ResponseKind::Empty);
        assert_eq!(classify(201, Some(" 0 ")), ResponseKind::Empty);
        assert_eq!(classify(200, Some("17")), ResponseKind::Body);
        assert_eq!(classify(200, None), ResponseKind::Body);
    }

    #[test]
    fn test_error_status_with_empty_body_fails() {
        assert_eq!(classify(500, Some("0")), ResponseKind::Failed);
        assert_eq!(classify(404, Some("0")), ResponseKind::Failed);
        assert_eq!(classify(400, None), ResponseKind::Failed);
        assert_eq!(classify(304, Some("0")), ResponseKind::Failed);
        assert_eq!(error_detail(404, ""), "Request failed with status 404");
    }

    #[test]
    fn test_error_detail_prefers_server_message() {
        assert_eq!(error_detail(404, r#"{"detail":"Item with ID 9 not found"}"#), "Item with ID 9 not found");
        assert_eq!(error_detail(422, r#"{"detail":[{"msg":"field required"}]}"#), r#"[{"msg":"field required"}]"#);
    }

    #[test]
    fn test_error_detail_fallbacks() {
        assert_eq!(error_detail(502, "Bad Gateway"), "Bad Gateway");
        assert_eq!(error_detail(500, ""), "Request failed with status 500");
        assert_eq!(error_detail(400, r#"{"error":"nope"}"#), "Request failed with status 400");
    }

    #[test]
    fn test_query_string() {
        let q = query_string(&[("item_id", Some("4".into())), ("provider_id", None), ("name", Some("a b".into()))]);
        assert_eq!(q, "?item_id=4&name=a%20b");
        assert_eq!(query_string(&[("x", None)]), "");
    }
}
