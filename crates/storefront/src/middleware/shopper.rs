//! Shopper session extractor.
//!
//! Resolves the cookie session to the shopper's [`SessionHandle`], assigning
//! a fresh shopper id on the first request.

use atelier_core::ShopperId;
use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use super::session::keys;
use crate::error::AppError;
use crate::session::SessionHandle;
use crate::state::AppState;

/// Extractor yielding the current shopper's session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Shopper(session): Shopper) -> impl IntoResponse {
///     let count = session.lock().await.cart().total_item_count();
///     format!("{count} items")
/// }
/// ```
pub struct Shopper(pub SessionHandle);

impl FromRequestParts<AppState> for Shopper {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let shopper_id = match session.get::<ShopperId>(keys::SHOPPER_ID).await? {
            Some(id) => id,
            None => {
                let id = ShopperId::new();
                session.insert(keys::SHOPPER_ID, id).await?;
                tracing::debug!(shopper_id = %id, "New shopper");
                id
            }
        };

        Ok(Self(state.session(shopper_id).await))
    }
}
