//! The shopping cart state container.
//!
//! [`Cart`] holds the authoritative client-side view of what the shopper
//! intends to buy, across page navigations, until checkout completes. It is
//! mutated only through its methods and upholds two invariants:
//!
//! - every stored line has `quantity >= 1` (a line driven to zero is removed,
//!   never stored as zero)
//! - line ids are unique (adding an already-present product increments its
//!   quantity instead of appending a duplicate line)
//!
//! The cart itself does no I/O. Callers persist the serialized cart to a
//! session slot after every mutation; `stock` on each line is an advisory
//! copy taken at add-time and is never re-validated here.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// One product entry in the cart, with an associated quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Opaque product identifier, unique within the cart.
    pub id: ProductId,
    /// Display name, opaque to the store.
    pub name: String,
    /// Display image URL, opaque to the store.
    pub image: String,
    /// Unit price. Single-currency, no tax/shipping.
    pub price: Decimal,
    /// Always >= 1.
    pub quantity: u32,
    /// Advisory stock ceiling copied from the catalog at add-time.
    pub stock: u32,
}

impl CartLine {
    /// Price × quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// An item descriptor without a quantity, as handed to [`Cart::add`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub price: Decimal,
    pub stock: u32,
}

impl LineItem {
    fn into_line(self, quantity: u32) -> CartLine {
        CartLine {
            id: self.id,
            name: self.name,
            image: self.image,
            price: self.price,
            quantity,
            stock: self.stock,
        }
    }
}

/// Ordered collection of [`CartLine`], unique by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` of `item` to the cart.
    ///
    /// If a line with the same id exists its quantity is incremented;
    /// otherwise a new line is appended. The quantity is `NonZeroU32`, so a
    /// zero or negative amount is unrepresentable — callers decide how to
    /// map untrusted input before reaching the store.
    pub fn add(&mut self, item: LineItem, quantity: NonZeroU32) {
        match self.lines.iter_mut().find(|line| line.id == item.id) {
            Some(line) => line.quantity += quantity.get(),
            None => self.lines.push(item.into_line(quantity.get())),
        }
    }

    /// Add a single unit of `item`.
    pub fn add_one(&mut self, item: LineItem) {
        self.add(item, NonZeroU32::MIN);
    }

    /// Set the quantity of the line with `id`.
    ///
    /// A quantity of zero removes the line. An unknown id is a no-op.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|line| &line.id == id) {
            line.quantity = quantity;
        }
    }

    /// Remove the line with `id` if present; no-op otherwise.
    pub fn remove(&mut self, id: &ProductId) {
        self.lines.retain(|line| &line.id != id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Merge another cart into this one, summing quantities for lines that
    /// share an id and appending unseen lines in their original order.
    ///
    /// Used to reconcile an in-memory cart with a restored snapshot.
    pub fn merge(&mut self, other: Self) {
        for line in other.lines {
            match self.lines.iter_mut().find(|l| l.id == line.id) {
                Some(existing) => existing.quantity += line.quantity,
                None => self.lines.push(line),
            }
        }
    }

    /// Sum of all line quantities (not the number of lines). Drives the
    /// cart badge.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of price × quantity across lines, excluding tax and shipping.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, price: Decimal) -> LineItem {
        LineItem {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            image: format!("https://img.example/{id}.jpg"),
            price,
            stock: 10,
        }
    }

    fn qty(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_add_new_item_appends_one_line() {
        let mut cart = Cart::new();
        cart.add(item("A", Decimal::new(1000, 2)), qty(2));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(&ProductId::new("A")).unwrap().quantity, 2);
    }

    #[test]
    fn test_add_existing_item_increments_without_duplicating() {
        let mut cart = Cart::new();
        cart.add(item("A", Decimal::new(1000, 2)), qty(2));
        cart.add(item("A", Decimal::new(1000, 2)), qty(3));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(&ProductId::new("A")).unwrap().quantity, 5);
        assert_eq!(cart.total(), Decimal::new(5000, 2));
    }

    #[test]
    fn test_repeated_adds_sum_quantities() {
        let mut cart = Cart::new();
        for n in 1..=4 {
            cart.add(item("A", Decimal::new(250, 2)), qty(n));
        }

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(&ProductId::new("A")).unwrap().quantity, 10);
    }

    #[test]
    fn test_set_quantity_exact_and_idempotent() {
        let mut cart = Cart::new();
        cart.add(item("A", Decimal::new(999, 2)), qty(1));

        cart.set_quantity(&ProductId::new("A"), 7);
        cart.set_quantity(&ProductId::new("A"), 7);

        assert_eq!(cart.line(&ProductId::new("A")).unwrap().quantity, 7);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(item("A", Decimal::new(999, 2)), qty(3));

        cart.set_quantity(&ProductId::new("A"), 0);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(item("A", Decimal::new(999, 2)), qty(1));
        let before = cart.clone();

        cart.set_quantity(&ProductId::new("missing"), 5);

        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_keeps_other_lines() {
        let mut cart = Cart::new();
        cart.add(item("A", Decimal::new(1000, 2)), qty(1));
        cart.add(item("B", Decimal::new(500, 2)), qty(1));

        cart.remove(&ProductId::new("A"));

        assert_eq!(cart.len(), 1);
        assert!(cart.line(&ProductId::new("B")).is_some());
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(item("A", Decimal::new(1000, 2)), qty(1));
        let before = cart.clone();

        cart.remove(&ProductId::new("missing"));

        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add(item("A", Decimal::new(1000, 2)), qty(2));
        cart.add(item("B", Decimal::new(500, 2)), qty(1));

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_count_sums_quantities_not_lines() {
        let mut cart = Cart::new();
        cart.add(item("A", Decimal::new(1000, 2)), qty(2));
        cart.add(item("B", Decimal::new(500, 2)), qty(3));

        assert_eq!(cart.count(), 5);
    }

    #[test]
    fn test_total_is_exact() {
        let mut cart = Cart::new();
        cart.add(item("A", Decimal::new(999, 2)), qty(2));
        cart.add(item("B", Decimal::new(500, 2)), qty(1));

        assert_eq!(cart.total(), Decimal::new(2498, 2));
    }

    #[test]
    fn test_empty_cart_derivations() {
        let cart = Cart::new();
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_merge_sums_shared_lines_and_appends_rest() {
        let mut restored = Cart::new();
        restored.add(item("A", Decimal::new(1000, 2)), qty(1));
        restored.add(item("B", Decimal::new(500, 2)), qty(2));

        let mut current = Cart::new();
        current.add(item("A", Decimal::new(1000, 2)), qty(2));

        current.merge(restored);

        assert_eq!(current.len(), 2);
        assert_eq!(current.line(&ProductId::new("A")).unwrap().quantity, 3);
        assert_eq!(current.line(&ProductId::new("B")).unwrap().quantity, 2);
    }

    #[test]
    fn test_serde_round_trip_preserves_lines() {
        let mut cart = Cart::new();
        cart.add(item("A", Decimal::new(999, 2)), qty(2));
        cart.add(item("B", Decimal::new(1250, 2)), qty(1));

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, cart);
        assert_eq!(restored.count(), 3);
        assert_eq!(restored.total(), Decimal::new(3248, 2));
    }
}
