//! Cart route handlers.
//!
//! Each mutation applies one intent to the shopper's session and answers
//! with the cart page, the way the storefront navigates to the cart after
//! every change.

use std::sync::Arc;

use atelier_core::{ProductId, QuantityUpdate};
use axum::{Form, Json, extract::State, response::Response};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::render;
use crate::catalog::Product;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::Shopper;
use crate::router::Route;
use crate::state::AppState;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Update cart form data.
///
/// `quantity` is kept as text so non-integer input can be ignored rather
/// than rejected.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart badge payload.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

fn lookup(state: &AppState, id: &ProductId) -> Result<Arc<Product>> {
    state
        .catalog()
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// `POST /cart/add`
#[instrument(skip(state, session), fields(shopper_id = %session.id()))]
pub async fn add(
    State(state): State<AppState>,
    Shopper(session): Shopper,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = lookup(&state, &form.product_id)?;

    let quantity = session.lock().await.add_to_cart(product);
    tracing::info!(product_id = %form.product_id, %quantity, "Added to cart");
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", form.product_id.as_str())]),
    );

    render(&state, &session, &Route::Cart).await
}

/// `POST /cart/update`
#[instrument(skip(state, session), fields(shopper_id = %session.id()))]
pub async fn update(
    State(state): State<AppState>,
    Shopper(session): Shopper,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let product = lookup(&state, &form.product_id)?;

    match QuantityUpdate::parse(&form.quantity) {
        Ok(update) => {
            session.lock().await.update_quantity(&product, update);
            tracing::debug!(product_id = %form.product_id, ?update, "Quantity updated");
        }
        Err(e) => {
            tracing::warn!(product_id = %form.product_id, error = %e, "Ignoring quantity update");
        }
    }

    render(&state, &session, &Route::Cart).await
}

/// `POST /cart/remove`
#[instrument(skip(state, session), fields(shopper_id = %session.id()))]
pub async fn remove(
    State(state): State<AppState>,
    Shopper(session): Shopper,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let product = lookup(&state, &form.product_id)?;

    session.lock().await.remove_from_cart(&product);
    add_breadcrumb(
        "cart",
        "Removed from cart",
        Some(&[("product_id", form.product_id.as_str())]),
    );

    render(&state, &session, &Route::Cart).await
}

/// `GET /cart/count`
#[instrument(skip(session), fields(shopper_id = %session.id()))]
pub async fn count(Shopper(session): Shopper) -> Json<CartCount> {
    let count = session.lock().await.cart().total_item_count();
    Json(CartCount { count })
}
