//! End-to-end tests for the storefront.
//!
//! Tests drive the complete axum application in process with
//! `tower::ServiceExt::oneshot`, carrying the session cookie between requests
//! the way a browser would. No server or network is involved.
//!
//! ```rust,ignore
//! let mut shopper = TestShopper::new();
//! shopper.post("/cart/add", &[("product_id", "1")]).await;
//! assert_eq!(shopper.get("/cart/count").await.json["count"], 1);
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;

use atelier_storefront::config::StorefrontConfig;
use atelier_storefront::state::AppState;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use tower::ServiceExt;

/// A response with its body decoded.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed body, `Null` when the body is not JSON.
    pub json: serde_json::Value,
    pub text: String,
}

impl TestResponse {
    /// Target of a redirect response.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// One browser: an application plus the cookie it was handed.
pub struct TestShopper {
    app: Router,
    state: AppState,
    cookie: Option<String>,
}

impl Default for TestShopper {
    fn default() -> Self {
        Self::new()
    }
}

impl TestShopper {
    /// A shopper against a storefront with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_env(&[])
    }

    /// A shopper against a storefront configured from `vars`.
    #[must_use]
    pub fn with_env(vars: &[(&str, &str)]) -> Self {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let config = StorefrontConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        let state = AppState::new(config).unwrap();

        Self {
            app: atelier_storefront::app(state.clone()),
            state,
            cookie: None,
        }
    }

    /// Another browser on the same storefront, without a cookie.
    #[must_use]
    pub fn another(&self) -> Self {
        Self {
            app: self.app.clone(),
            state: self.state.clone(),
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post(&mut self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form)
            .finish();
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

        TestResponse {
            status,
            headers,
            json,
            text,
        }
    }
}

/// A checkout form with every field filled in.
#[must_use]
pub fn complete_checkout_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("email", "collector@example.com"),
        ("first_name", "Aino"),
        ("last_name", "Laine"),
        ("address", "Esplanadi 1"),
        ("city", "Helsinki"),
        ("postal_code", "00100"),
        ("country", "Finland"),
        ("phone", "+358 40 123 4567"),
        ("card_number", "4242 4242 4242 4242"),
        ("card_name", "Aino Laine"),
        ("expiry", "12/28"),
        ("cvv", "123"),
    ]
}
