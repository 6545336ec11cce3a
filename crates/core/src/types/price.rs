//! Type-safe price representation using decimal arithmetic.
//!
//! Monetary values are never represented as floats. Every amount is a
//! [`Decimal`] in the currency's standard unit (euros, not cents), which keeps
//! subtotals exact no matter how many lines are summed.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::quantity::Quantity;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., euros, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Whole-unit euro price, e.g. `Price::eur(1299)` is €1,299.
    #[must_use]
    pub fn eur(amount: i64) -> Self {
        Self::new(Decimal::from(amount), CurrencyCode::EUR)
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// The price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        Self::new(
            self.amount * Decimal::from(quantity.get()),
            self.currency_code,
        )
    }

    /// Percentage saved against a higher original price, rounded half up.
    ///
    /// Returns 0 when `original` is not above `self` or the currencies differ.
    #[must_use]
    pub fn percent_off(&self, original: &Self) -> u32 {
        if original.currency_code != self.currency_code || original.amount <= self.amount {
            return 0;
        }

        let ratio = (original.amount - self.amount) / original.amount * Decimal::ONE_HUNDRED;
        ratio
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(0)
    }

    /// Format for display: `€1,299`, `€12.50`.
    ///
    /// Whole amounts drop the decimals; anything else shows two places.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let abs = rounded.abs();
        let whole = abs.trunc();
        let fraction = abs - whole;

        let grouped = group_thousands(&whole.to_string());
        let symbol = self.currency_code.symbol();

        if fraction.is_zero() {
            format!("{sign}{symbol}{grouped}")
        } else {
            let cents = (fraction * Decimal::ONE_HUNDRED).to_u32().unwrap_or(0);
            format!("{sign}{symbol}{grouped}.{cents:02}")
        }
    }
}

/// Adding prices assumes a single currency; the catalog enforces that.
impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(self.currency_code, rhs.currency_code);
        Self::new(self.amount + rhs.amount, self.currency_code)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(CurrencyCode::default()), Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Insert `,` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// ISO 4217 currency codes.
///
/// The studio sells in euros only; the enum exists so amounts always carry
/// their unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    EUR,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::EUR => "€",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn qty(n: u32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    #[test]
    fn test_display_whole_amounts_group_thousands() {
        assert_eq!(Price::eur(799).display(), "€799");
        assert_eq!(Price::eur(1299).display(), "€1,299");
        assert_eq!(Price::eur(1_234_567).display(), "€1,234,567");
        assert_eq!(Price::eur(0).display(), "€0");
    }

    #[test]
    fn test_display_fractional_amounts_show_two_places() {
        let price = Price::new(Decimal::from_str("12.5").unwrap(), CurrencyCode::EUR);
        assert_eq!(price.display(), "€12.50");

        let price = Price::new(Decimal::from_str("1999.05").unwrap(), CurrencyCode::EUR);
        assert_eq!(price.display(), "€1,999.05");
    }

    #[test]
    fn test_times_is_exact() {
        let price = Price::new(Decimal::from_str("0.1").unwrap(), CurrencyCode::EUR);
        let total = price.times(qty(3));
        assert_eq!(total.amount, Decimal::from_str("0.3").unwrap());
    }

    #[test]
    fn test_sum_matches_scenario_subtotal() {
        let total: Price = [Price::eur(1299).times(qty(1)), Price::eur(1099).times(qty(2))]
            .into_iter()
            .sum();
        assert_eq!(total, Price::eur(3497));
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let total: Price = std::iter::empty().sum();
        assert!(total.is_zero());
    }

    #[test]
    fn test_percent_off() {
        assert_eq!(Price::eur(1299).percent_off(&Price::eur(1599)), 19);
        assert_eq!(Price::eur(1099).percent_off(&Price::eur(1399)), 21);
        assert_eq!(Price::eur(50).percent_off(&Price::eur(100)), 50);
    }

    #[test]
    fn test_percent_off_without_real_discount_is_zero() {
        assert_eq!(Price::eur(100).percent_off(&Price::eur(100)), 0);
        assert_eq!(Price::eur(100).percent_off(&Price::eur(90)), 0);
    }

    #[test]
    fn test_serializes_amount_as_string() {
        let json = serde_json::to_value(Price::eur(1299)).unwrap();
        assert_eq!(json["amount"], "1299");
        assert_eq!(json["currency_code"], "EUR");
    }
}
