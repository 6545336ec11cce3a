//! Shopper sessions.
//!
//! A [`ShopperSession`] owns one shopper's cart and checkout instance. Screens
//! only ever see snapshots of it; every change arrives as an intent method
//! here. [`SessionHandle`] wraps a session in a mutex so the settlement task
//! can finish a checkout after the request that started it has returned.

use std::sync::Arc;

use atelier_core::{CheckoutId, CheckoutStatus, Quantity, QuantityUpdate, ShopperId};
use tokio::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span};

use crate::cart::Cart;
use crate::catalog::{Catalog, Product};
use crate::checkout::{Checkout, CheckoutError, CheckoutForm};
use crate::config::CheckoutSettings;
use crate::router::{self, Resolved, Route, ShopperView};

/// One shopper's state.
#[derive(Debug, Default)]
pub struct ShopperSession {
    cart: Cart,
    checkout: Option<Checkout>,
    notice: Option<String>,
}

impl ShopperSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn checkout(&self) -> Option<&Checkout> {
        self.checkout.as_ref()
    }

    /// Add one unit of `product` and queue an "Added ..." notice.
    pub fn add_to_cart(&mut self, product: Arc<Product>) -> Quantity {
        let notice = format!("Added {} to cart", product.title);
        let quantity = self.cart.add_item(product);
        self.notice = Some(notice);
        quantity
    }

    /// Change the quantity of `product`'s line. Below one removes it.
    pub fn update_quantity(&mut self, product: &Product, update: QuantityUpdate) {
        if update == QuantityUpdate::Remove {
            self.remove_from_cart(product);
        } else {
            self.cart.apply(&product.id, update);
        }
    }

    /// Remove `product`'s line, queueing a notice if there was one.
    pub fn remove_from_cart(&mut self, product: &Product) {
        if self.cart.get(&product.id).is_some() {
            self.cart.remove_item(&product.id);
            self.notice = Some(format!("Removed {} from cart", product.title));
        }
    }

    /// Navigate to `route`.
    ///
    /// Runs the checkout lifecycle before resolving:
    /// - leaving checkout drops an `Idle` or `Complete` instance, and a
    ///   `Processing` one too when `cancel_on_leave` is set (its settlement
    ///   is cancelled and the cart left as it was)
    /// - entering checkout with items and no instance starts a fresh one
    ///
    /// A queued notice is attached to the rendered page and consumed.
    pub fn navigate(
        &mut self,
        route: &Route,
        catalog: &Catalog,
        settings: &CheckoutSettings,
    ) -> Resolved {
        if *route == Route::Checkout {
            if self.checkout.is_none() && !self.cart.is_empty() {
                let checkout = Checkout::new();
                debug!(checkout_id = %checkout.id(), "Checkout started");
                self.checkout = Some(checkout);
            }
        } else {
            self.leave_checkout(settings.cancel_on_leave);
        }

        let resolved = router::resolve(
            route,
            catalog,
            ShopperView {
                cart: &self.cart,
                checkout: self.checkout.as_ref(),
            },
        );

        match resolved {
            Resolved::Render(mut page) => {
                page.notice = self.notice.take();
                Resolved::Render(page)
            }
            redirect @ Resolved::Redirect(_) => redirect,
        }
    }

    fn leave_checkout(&mut self, cancel_processing: bool) {
        let Some(checkout) = self.checkout.as_mut() else {
            return;
        };

        match checkout.status() {
            CheckoutStatus::Processing if !cancel_processing => {}
            CheckoutStatus::Processing => {
                checkout.cancel_settlement();
                info!(checkout_id = %checkout.id(), "Checkout cancelled on leave");
                self.checkout = None;
            }
            CheckoutStatus::Idle | CheckoutStatus::Complete => {
                self.checkout = None;
            }
        }
    }

    /// Submit the checkout form, moving the instance to `Processing`.
    ///
    /// Starts an instance if the shopper never opened the checkout screen.
    /// A refused submission leaves the session as it was.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if the cart is empty, a field is missing, or
    /// this instance was already submitted.
    pub fn submit_checkout(&mut self, form: &CheckoutForm) -> Result<CheckoutId, CheckoutError> {
        if let Some(checkout) = self.checkout.as_mut() {
            checkout.submit(form, &self.cart)?;
            return Ok(checkout.id());
        }

        let mut checkout = Checkout::new();
        checkout.submit(form, &self.cart)?;
        let id = checkout.id();
        self.checkout = Some(checkout);
        Ok(id)
    }

    /// Finish the checkout `id`, clearing the cart.
    ///
    /// Returns `false` if `id` is no longer the current instance or it is not
    /// `Processing`; the cart is untouched in that case.
    pub fn complete_checkout(&mut self, id: CheckoutId) -> bool {
        match self.checkout.as_mut() {
            Some(checkout) if checkout.id() == id => checkout.complete(&mut self.cart),
            _ => false,
        }
    }

    fn attach_settlement(&mut self, id: CheckoutId, token: CancellationToken) {
        if let Some(checkout) = self.checkout.as_mut().filter(|c| c.id() == id) {
            checkout.attach_settlement(token);
        }
    }
}

/// Shared handle to a [`ShopperSession`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: ShopperId,
    inner: Arc<Mutex<ShopperSession>>,
}

impl SessionHandle {
    #[must_use]
    pub fn new(id: ShopperId) -> Self {
        Self {
            id,
            inner: Arc::new(Mutex::new(ShopperSession::new())),
        }
    }

    #[must_use]
    pub const fn id(&self) -> ShopperId {
        self.id
    }

    /// Exclusive access to the session.
    pub async fn lock(&self) -> MutexGuard<'_, ShopperSession> {
        self.inner.lock().await
    }

    /// Submit the checkout form and schedule settlement.
    ///
    /// After `settings.settlement_delay` the instance moves to `Complete` and
    /// the cart is cleared, unless the settlement is cancelled first.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if the submission is refused; nothing is
    /// scheduled in that case.
    pub async fn submit_checkout(
        &self,
        form: &CheckoutForm,
        settings: &CheckoutSettings,
    ) -> Result<CheckoutId, CheckoutError> {
        let mut session = self.inner.lock().await;
        let checkout_id = session.submit_checkout(form)?;

        let token = CancellationToken::new();
        session.attach_settlement(checkout_id, token.clone());
        drop(session);

        let inner = Arc::clone(&self.inner);
        let delay = settings.settlement_delay;
        let span = info_span!("settlement", shopper_id = %self.id, %checkout_id);

        tokio::spawn(
            async move {
                tokio::select! {
                    () = token.cancelled() => {
                        debug!("Settlement cancelled");
                    }
                    () = tokio::time::sleep(delay) => {
                        if inner.lock().await.complete_checkout(checkout_id) {
                            info!("Checkout complete");
                        } else {
                            debug!("Settlement found no matching checkout");
                        }
                    }
                }
            }
            .instrument(span),
        );

        Ok(checkout_id)
    }
}
