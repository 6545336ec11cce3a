//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Navigation (JSON page)
//! GET  /                       - Home
//! GET  /gallery?category=...   - Gallery, optionally filtered
//! GET  /about                  - Studio information
//! GET  /product/{id}           - Product detail (unknown id: 303 to /gallery)
//! GET  /cart                   - Cart
//! GET  /checkout               - Checkout (empty cart: 303 to /cart)
//! GET  /{anything else}        - Home (includes GET on the cart POST paths)
//!
//! # Cart
//! POST /cart/add               - Add one unit (returns cart page)
//! POST /cart/update            - Set quantity (returns cart page)
//! POST /cart/remove            - Remove line (returns cart page)
//! GET  /cart/count             - Cart count badge
//!
//! # Checkout
//! POST /checkout               - Submit form (returns checkout page)
//! ```

pub mod cart;
pub mod checkout;
pub mod navigate;

use axum::{
    Json, Router,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};

use crate::error::Result;
use crate::router::{Resolved, Route};
use crate::session::SessionHandle;
use crate::state::AppState;

/// Navigate the shopper to `route` and build the response.
///
/// Redirects are `303 See Other` so the browser follows with a `GET`.
pub(crate) async fn render(
    state: &AppState,
    session: &SessionHandle,
    route: &Route,
) -> Result<Response> {
    let resolved = session
        .lock()
        .await
        .navigate(route, state.catalog(), state.checkout_settings());

    Ok(match resolved {
        Resolved::Render(page) => Json(page).into_response(),
        Resolved::Redirect(to) => {
            tracing::debug!(from = %route, to = %to, "Redirecting");
            Redirect::to(&to.path()).into_response()
        }
    })
}

/// Create the cart routes router.
///
/// Registered with full paths so `GET /cart` stays a navigation request. A
/// `GET` on a mutation endpoint is navigation too, and lands on home.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart/add", post(cart::add).get(navigate::navigate))
        .route("/cart/update", post(cart::update).get(navigate::navigate))
        .route("/cart/remove", post(cart::remove).get(navigate::navigate))
        .route("/cart/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(navigate::home))
        .route("/checkout", get(navigate::checkout).post(checkout::submit))
        .merge(cart_routes())
        // Everything else is a navigation request
        .route("/{*path}", get(navigate::navigate))
}
