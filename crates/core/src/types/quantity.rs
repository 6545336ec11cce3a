//! Cart line quantities.
//!
//! A [`Quantity`] is always at least one. Requests to change a quantity go
//! through [`QuantityUpdate`], which turns raw input into either a new
//! quantity or a removal so a zero or negative count can never be stored.

use core::fmt;
use core::num::{IntErrorKind, NonZeroU32};

use serde::{Deserialize, Serialize};

/// Errors that can occur when interpreting quantity input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// A stored quantity must be at least one.
    #[error("quantity must be at least 1")]
    Zero,
    /// The input was not a whole number.
    #[error("quantity must be a whole number, got {0:?}")]
    NotAnInteger(String),
}

/// Number of units of one product in the cart. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] if `n` is zero.
    pub const fn new(n: u32) -> Result<Self, QuantityError> {
        match NonZeroU32::new(n) {
            Some(n) => Ok(Self(n)),
            None => Err(QuantityError::Zero),
        }
    }

    /// The raw count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// One more unit. Saturates at `u32::MAX`.
    #[must_use]
    pub const fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.get()
    }
}

/// What a quantity change request means for a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// Replace the line's quantity.
    Set(Quantity),
    /// Drop the line from the cart.
    Remove,
}

impl QuantityUpdate {
    /// Interpret a requested integer quantity.
    ///
    /// Anything below one removes the line. Values above `u32::MAX` are
    /// clamped.
    #[must_use]
    pub fn from_requested(requested: i64) -> Self {
        if requested < 1 {
            return Self::Remove;
        }
        let clamped = u32::try_from(requested).unwrap_or(u32::MAX);
        Quantity::new(clamped).map_or(Self::Remove, Self::Set)
    }

    /// Interpret raw quantity input, e.g. a form field.
    ///
    /// Surrounding whitespace is ignored. Integers too large for `i64` are
    /// handled like any other out-of-range request: clamped when positive,
    /// a removal when negative.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotAnInteger`] for anything that is not a
    /// whole number (`"1.5"`, `"two"`, `""`). Callers leave the cart untouched
    /// in that case.
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        match input.trim().parse::<i64>() {
            Ok(requested) => Ok(Self::from_requested(requested)),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Ok(Self::from_requested(i64::MAX)),
                IntErrorKind::NegOverflow => Ok(Self::Remove),
                _ => Err(QuantityError::NotAnInteger(input.to_owned())),
            },
        }
    }
}
