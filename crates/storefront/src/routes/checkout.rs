//! Checkout submission.

use axum::{Form, extract::State, response::Response};
use tracing::instrument;

use super::render;
use crate::checkout::CheckoutForm;
use crate::error::{Result, add_breadcrumb};
use crate::middleware::Shopper;
use crate::router::Route;
use crate::state::AppState;

/// `POST /checkout`
///
/// Moves the checkout to `Processing` and answers with the checkout page.
/// Confirmation follows after the settlement delay.
#[instrument(skip(state, session, form), fields(shopper_id = %session.id()))]
pub async fn submit(
    State(state): State<AppState>,
    Shopper(session): Shopper,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let checkout_id = session
        .submit_checkout(&form, state.checkout_settings())
        .await
        .inspect_err(|e| tracing::info!(error = %e, "Checkout refused"))?;

    tracing::info!(%checkout_id, "Checkout submitted");
    add_breadcrumb("checkout", "Checkout submitted", None);

    render(&state, &session, &Route::Checkout).await
}
