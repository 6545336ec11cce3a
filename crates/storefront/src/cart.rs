//! Cart store.
//!
//! Holds the shopper's cart lines in the order products were first added.
//! Every mutation keeps two invariants: at most one line per product id, and
//! every line has a quantity of at least one. Totals are never stored; they
//! are recomputed from the lines on every call.

use std::sync::Arc;

use atelier_core::{Price, ProductId, Quantity, QuantityUpdate};

use crate::catalog::Product;

/// One product in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEntry {
    pub product: Arc<Product>,
    pub quantity: Quantity,
}

impl CartEntry {
    /// Price of this line (unit price × quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line or appends a new line with quantity 1.
    /// Returns the line's new quantity.
    pub fn add_item(&mut self, product: Arc<Product>) -> Quantity {
        if let Some(entry) = self.entry_mut(&product.id) {
            entry.quantity = entry.quantity.increment();
            return entry.quantity;
        }

        self.entries.push(CartEntry {
            product,
            quantity: Quantity::ONE,
        });
        Quantity::ONE
    }

    /// Apply a requested quantity to the line for `product_id`.
    ///
    /// A request below one removes the line. Unknown ids are ignored.
    pub fn set_quantity(&mut self, product_id: &ProductId, requested: i64) {
        self.apply(product_id, QuantityUpdate::from_requested(requested));
    }

    /// Apply an already interpreted quantity update.
    pub fn apply(&mut self, product_id: &ProductId, update: QuantityUpdate) {
        match update {
            QuantityUpdate::Remove => self.remove_item(product_id),
            QuantityUpdate::Set(quantity) => {
                if let Some(entry) = self.entry_mut(product_id) {
                    entry.quantity = quantity;
                }
            }
        }
    }

    /// Remove the line for `product_id`, if any.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.entries.retain(|entry| entry.product.id != *product_id);
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.quantity.get()))
            .sum()
    }

    /// Sum of price × quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Shipping charge. Shipping is free.
    #[must_use]
    pub fn shipping(&self) -> Price {
        Price::zero(self.subtotal().currency_code)
    }

    /// Amount due: subtotal plus shipping.
    #[must_use]
    pub fn total(&self) -> Price {
        self.subtotal() + self.shipping()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// The line for `product_id`, if any.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.product.id == *product_id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, product_id: &ProductId) -> Option<&mut CartEntry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.product.id == *product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::catalog::Catalog;
    use crate::catalog::tests::product;

    fn catalog_product(catalog: &Catalog, id: &str) -> Arc<Product> {
        Arc::clone(catalog.get(&ProductId::from(id)).unwrap())
    }

    fn assert_invariants(cart: &Cart) {
        let mut seen = std::collections::HashSet::new();
        for entry in cart.entries() {
            assert!(seen.insert(entry.product.id.clone()), "duplicate line");
            assert!(entry.quantity.get() >= 1);
        }
        let count: u64 = cart.entries().iter().map(|e| u64::from(e.quantity.get())).sum();
        assert_eq!(cart.total_item_count(), count);
        let subtotal: Price = cart.entries().iter().map(CartEntry::line_total).sum();
        assert_eq!(cart.subtotal(), subtotal);
    }

    #[test]
    fn test_scenario_one_and_two_of_four() {
        let catalog = Catalog::builtin().unwrap();
        let mut cart = Cart::new();
        cart.add_item(catalog_product(&catalog, "1"));
        cart.add_item(catalog_product(&catalog, "4"));
        cart.add_item(catalog_product(&catalog, "4"));

        assert_eq!(cart.total_item_count(), 3);
        assert_eq!(cart.subtotal(), Price::eur(3497));
        assert_eq!(cart.total(), Price::eur(3497));
        assert!(cart.shipping().is_zero());
    }

    #[test]
    fn test_adds_produce_one_line_per_id_with_add_count() {
        let products: Vec<Arc<Product>> = ["a", "b", "c"]
            .iter()
            .map(|id| Arc::new(product(id, 10, "X")))
            .collect();
        let sequence = [0, 1, 0, 2, 0, 1];

        let mut cart = Cart::new();
        let mut expected: HashMap<&str, u32> = HashMap::new();
        for &i in &sequence {
            cart.add_item(Arc::clone(&products[i]));
            *expected.entry(products[i].id.as_str()).or_default() += 1;
            assert_invariants(&cart);
        }

        assert_eq!(cart.entries().len(), 3);
        for entry in cart.entries() {
            assert_eq!(entry.quantity.get(), expected[entry.product.id.as_str()]);
        }
    }

    #[test]
    fn test_insertion_order_is_first_add_order() {
        let mut cart = Cart::new();
        for id in ["b", "a", "b", "c", "a"] {
            cart.add_item(Arc::new(product(id, 10, "X")));
        }
        let ids: Vec<&str> = cart.entries().iter().map(|e| e.product.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn test_subtotal_never_decreases_under_add() {
        let mut cart = Cart::new();
        let mut last = cart.subtotal();
        for (id, price) in [("a", 5), ("b", 700), ("a", 5), ("c", 1)] {
            cart.add_item(Arc::new(product(id, price, "X")));
            assert!(cart.subtotal().amount >= last.amount);
            last = cart.subtotal();
        }
    }

    #[test]
    fn test_subtotal_never_increases_under_remove_or_smaller_quantity() {
        let mut cart = Cart::new();
        let a = Arc::new(product("a", 100, "X"));
        for _ in 0..4 {
            cart.add_item(Arc::clone(&a));
        }
        cart.add_item(Arc::new(product("b", 50, "X")));

        let before = cart.subtotal();
        cart.set_quantity(&ProductId::from("a"), 2);
        assert!(cart.subtotal().amount <= before.amount);

        let before = cart.subtotal();
        cart.remove_item(&ProductId::from("b"));
        assert!(cart.subtotal().amount <= before.amount);
        assert_invariants(&cart);
    }

    #[test]
    fn test_set_quantity_replaces_value() {
        let mut cart = Cart::new();
        cart.add_item(Arc::new(product("a", 20, "X")));
        cart.set_quantity(&ProductId::from("a"), 5);

        assert_eq!(cart.get(&ProductId::from("a")).unwrap().quantity.get(), 5);
        assert_eq!(cart.subtotal(), Price::eur(100));
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let mut with_zero = Cart::new();
        let mut with_remove = Cart::new();
        for cart in [&mut with_zero, &mut with_remove] {
            cart.add_item(Arc::new(product("a", 20, "X")));
            cart.add_item(Arc::new(product("b", 30, "X")));
        }

        with_zero.set_quantity(&ProductId::from("a"), 0);
        with_remove.remove_item(&ProductId::from("a"));
        assert_eq!(with_zero, with_remove);
    }

    #[test]
    fn test_set_quantity_negative_removes() {
        let mut cart = Cart::new();
        cart.add_item(Arc::new(product("a", 20, "X")));
        cart.set_quantity(&ProductId::from("a"), -3);
        assert!(cart.is_empty());
        assert_invariants(&cart);
    }

    #[test]
    fn test_set_quantity_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(Arc::new(product("a", 20, "X")));
        let before = cart.clone();

        cart.set_quantity(&ProductId::from("zzz"), 4);
        cart.set_quantity(&ProductId::from("zzz"), 0);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut once = Cart::new();
        once.add_item(Arc::new(product("a", 20, "X")));
        once.add_item(Arc::new(product("b", 20, "X")));
        let mut twice = once.clone();

        once.remove_item(&ProductId::from("a"));
        twice.remove_item(&ProductId::from("a"));
        twice.remove_item(&ProductId::from("a"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clear_zeroes_totals() {
        let catalog = Catalog::builtin().unwrap();
        let mut cart = Cart::new();
        for product in catalog.products() {
            cart.add_item(Arc::clone(product));
        }
        cart.clear();

        assert_eq!(cart.total_item_count(), 0);
        assert!(cart.subtotal().is_zero());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart::new();
        assert_eq!(cart.total_item_count(), 0);
        assert!(cart.subtotal().is_zero());
        assert!(cart.total().is_zero());
    }
}
