//! Simulated checkout.
//!
//! A checkout instance walks `Idle -> Processing -> Complete`. Submission only
//! checks that every required field is filled in; the values are otherwise
//! opaque. Settlement is a fixed delay that always succeeds and clears the
//! cart as part of the final transition. The delay itself is scheduled by
//! [`crate::session::SessionHandle`], which owns the async side.

use std::fmt;

use atelier_core::{CheckoutId, CheckoutStatus};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::cart::Cart;

/// Form field names, in the order the form presents them.
pub const REQUIRED_FIELDS: &[&str] = &[
    "email",
    "first_name",
    "last_name",
    "address",
    "city",
    "postal_code",
    "country",
    "phone",
    "card_number",
    "card_name",
    "expiry",
    "cvv",
];

/// Reasons a checkout submission is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("cart is empty")]
    EmptyCart,
    #[error("checkout already {0}")]
    AlreadySubmitted(CheckoutStatus),
}

/// Shipping, contact and payment details.
///
/// Card fields are accepted as opaque strings and never validated.
/// `Debug` redacts the payment fields.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
    pub card_number: String,
    pub card_name: String,
    pub expiry: String,
    pub cvv: String,
}

impl fmt::Debug for CheckoutForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutForm")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("address", &self.address)
            .field("city", &self.city)
            .field("postal_code", &self.postal_code)
            .field("country", &self.country)
            .field("phone", &self.phone)
            .field("card_number", &"[REDACTED]")
            .field("card_name", &self.card_name)
            .field("expiry", &"[REDACTED]")
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

impl CheckoutForm {
    fn fields(&self) -> [(&'static str, &str); 12] {
        [
            ("email", &self.email),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("address", &self.address),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
            ("phone", &self.phone),
            ("card_number", &self.card_number),
            ("card_name", &self.card_name),
            ("expiry", &self.expiry),
            ("cvv", &self.cvv),
        ]
    }

    /// Names of required fields that are empty or whitespace-only.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// Check that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingFields`] listing each empty field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::MissingFields(missing))
        }
    }
}

/// What the shopper ordered, captured at submission.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    /// Where the confirmation goes.
    pub email: String,
    /// Cart contents at the moment of submission.
    pub cart: Cart,
    pub submitted_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// One checkout attempt.
#[derive(Debug)]
pub struct Checkout {
    id: CheckoutId,
    status: CheckoutStatus,
    order: Option<PlacedOrder>,
    settlement: Option<CancellationToken>,
}

impl Default for Checkout {
    fn default() -> Self {
        Self::new()
    }
}

impl Checkout {
    /// A fresh instance in `Idle`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: CheckoutId::new(),
            status: CheckoutStatus::Idle,
            order: None,
            settlement: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> CheckoutId {
        self.id
    }

    #[must_use]
    pub const fn status(&self) -> CheckoutStatus {
        self.status
    }

    /// The submitted order, once past `Idle`.
    #[must_use]
    pub const fn order(&self) -> Option<&PlacedOrder> {
        self.order.as_ref()
    }

    /// `Idle -> Processing`.
    ///
    /// Snapshots the cart; the cart itself is left alone until settlement.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::AlreadySubmitted`] unless the instance is `Idle`
    /// - [`CheckoutError::EmptyCart`] if there is nothing to buy
    /// - [`CheckoutError::MissingFields`] if the form is incomplete
    pub fn submit(&mut self, form: &CheckoutForm, cart: &Cart) -> Result<(), CheckoutError> {
        if !self.status.can_transition_to(CheckoutStatus::Processing) {
            return Err(CheckoutError::AlreadySubmitted(self.status));
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        form.validate()?;

        self.order = Some(PlacedOrder {
            email: form.email.trim().to_owned(),
            cart: cart.clone(),
            submitted_at: Utc::now(),
            completed_at: None,
        });
        self.status = CheckoutStatus::Processing;
        Ok(())
    }

    /// Register the token guarding the pending settlement.
    pub fn attach_settlement(&mut self, token: CancellationToken) {
        self.settlement = Some(token);
    }

    /// `Processing -> Complete`, clearing `cart`.
    ///
    /// Returns `false` without touching the cart if the instance is not
    /// `Processing`, so the cart is cleared at most once.
    pub fn complete(&mut self, cart: &mut Cart) -> bool {
        if !self.status.can_transition_to(CheckoutStatus::Complete) {
            return false;
        }

        cart.clear();
        self.status = CheckoutStatus::Complete;
        self.settlement = None;
        if let Some(order) = self.order.as_mut() {
            order.completed_at = Some(Utc::now());
        }
        true
    }

    /// Abort a pending settlement. No effect unless `Processing`.
    pub fn cancel_settlement(&mut self) {
        if let Some(token) = self.settlement.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::tests::product;

    pub(crate) fn filled_form() -> CheckoutForm {
        CheckoutForm {
            email: "collector@example.com".into(),
            first_name: "Aino".into(),
            last_name: "Laine".into(),
            address: "Esplanadi 1".into(),
            city: "Helsinki".into(),
            postal_code: "00100".into(),
            country: "Finland".into(),
            phone: "+358 40 123 4567".into(),
            card_number: "not even digits".into(),
            card_name: "Aino Laine".into(),
            expiry: "whenever".into(),
            cvv: "x".into(),
        }
    }

    fn cart_with_one() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(Arc::new(product("1", 1299, "Abstract")));
        cart
    }

    #[test]
    fn test_new_checkout_is_idle() {
        let checkout = Checkout::new();
        assert_eq!(checkout.status(), CheckoutStatus::Idle);
        assert!(checkout.order().is_none());
    }

    #[test]
    fn test_submit_then_complete_clears_cart_once() {
        let mut cart = cart_with_one();
        let mut checkout = Checkout::new();

        checkout.submit(&filled_form(), &cart).unwrap();
        assert_eq!(checkout.status(), CheckoutStatus::Processing);
        assert_eq!(cart.total_item_count(), 1, "cart untouched until settlement");

        assert!(checkout.complete(&mut cart));
        assert_eq!(checkout.status(), CheckoutStatus::Complete);
        assert_eq!(cart.total_item_count(), 0);

        let order = checkout.order().unwrap();
        assert_eq!(order.cart.total_item_count(), 1);
        assert!(order.completed_at.is_some());

        // A second completion must not clear a cart refilled in the meantime.
        cart.add_item(Arc::new(product("2", 10, "X")));
        assert!(!checkout.complete(&mut cart));
        assert_eq!(cart.total_item_count(), 1);
    }

    #[test]
    fn test_complete_from_idle_is_refused() {
        let mut cart = cart_with_one();
        let mut checkout = Checkout::new();
        assert!(!checkout.complete(&mut cart));
        assert_eq!(cart.total_item_count(), 1);
    }

    #[test]
    fn test_submit_reports_every_missing_field() {
        let cart = cart_with_one();
        let mut checkout = Checkout::new();
        let form = CheckoutForm {
            city: "   ".into(),
            cvv: String::new(),
            ..filled_form()
        };

        let err = checkout.submit(&form, &cart).unwrap_err();
        assert_eq!(err, CheckoutError::MissingFields(vec!["city", "cvv"]));
        assert_eq!(checkout.status(), CheckoutStatus::Idle);
    }

    #[test]
    fn test_empty_form_lists_all_fields() {
        assert_eq!(CheckoutForm::default().missing_fields(), REQUIRED_FIELDS);
    }

    #[test]
    fn test_submit_with_empty_cart_is_refused() {
        let mut checkout = Checkout::new();
        let err = checkout.submit(&filled_form(), &Cart::new()).unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
    }

    #[test]
    fn test_resubmission_is_refused() {
        let cart = cart_with_one();
        let mut checkout = Checkout::new();
        checkout.submit(&filled_form(), &cart).unwrap();

        let err = checkout.submit(&filled_form(), &cart).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::AlreadySubmitted(CheckoutStatus::Processing)
        );
    }

    #[test]
    fn test_cancel_settlement_fires_token() {
        let cart = cart_with_one();
        let mut checkout = Checkout::new();
        checkout.submit(&filled_form(), &cart).unwrap();

        let token = CancellationToken::new();
        checkout.attach_settlement(token.clone());
        checkout.cancel_settlement();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_debug_redacts_payment_fields() {
        let output = format!("{:?}", filled_form());
        assert!(output.contains("Helsinki"));
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("not even digits"));
        assert!(!output.contains("whenever"));
    }

    #[test]
    fn test_error_messages() {
        let err = CheckoutError::MissingFields(vec!["email", "cvv"]);
        assert_eq!(err.to_string(), "missing required fields: email, cvv");
        let err = CheckoutError::AlreadySubmitted(CheckoutStatus::Complete);
        assert_eq!(err.to_string(), "checkout already complete");
    }
}
