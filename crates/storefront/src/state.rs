//! Application state shared across handlers.

use std::sync::Arc;

use atelier_core::ShopperId;
use moka::future::Cache;

use crate::catalog::{Catalog, CatalogError};
use crate::config::{CheckoutSettings, StorefrontConfig};
use crate::session::SessionHandle;

/// Upper bound on live shopper sessions held in memory.
const MAX_SESSIONS: u64 = 100_000;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, configuration and the live shopper sessions.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    sessions: Cache<ShopperId, SessionHandle>,
}

impl AppState {
    /// Create application state with the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled catalog is invalid.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        Ok(Self::with_catalog(config, Catalog::builtin()?))
    }

    /// Create application state around an already loaded catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_idle(config.session_idle_timeout)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                sessions,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the checkout settings.
    #[must_use]
    pub fn checkout_settings(&self) -> &CheckoutSettings {
        &self.inner.config.checkout
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// The session for `id`, created empty on first use.
    pub async fn session(&self, id: ShopperId) -> SessionHandle {
        self.inner
            .sessions
            .get_with(id, async move { SessionHandle::new(id) })
            .await
    }
}
