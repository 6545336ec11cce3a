//! Status enums.

use serde::{Deserialize, Serialize};

/// Progress of a simulated checkout.
///
/// ```text
/// Idle --submit--> Processing --settlement delay--> Complete
/// ```
///
/// There is no failure state: the simulated settlement always succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
    /// Form shown, waiting for submission.
    #[default]
    Idle,
    /// Form submitted, settlement delay running.
    Processing,
    /// Order confirmed and cart cleared.
    Complete,
}

impl CheckoutStatus {
    /// Whether `next` is a legal successor of `self`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Processing) | (Self::Processing, Self::Complete)
        )
    }
}

impl std::fmt::Display for CheckoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Processing => write!(f, "processing"),
            Self::Complete => write!(f, "complete"),
        }
    }
}
