//! The cart aggregate: line item list, invariants, derived totals.

use serde::de::Error as _;

use super::model::{CartItem, CartLine};
use crate::error::Result;

/// Marker returned by every cart mutator.
///
/// The aggregate itself performs no I/O; the caller is expected to consume
/// this marker by writing the cart's current state to the persistence mirror.
/// Returning it makes the "mutate, then mirror" step visible at the call
/// site instead of hiding a side effect inside the setter.
#[must_use = "a mutated cart should be mirrored to persistent storage"]
#[derive(Debug)]
pub struct CartChanged;

/// The full cart for one device/session.
///
/// Invariants, upheld by every mutator:
/// - at most one line per `product_id`, insertion order preserved
/// - every line has `quantity >= 1`
/// - totals are derived fresh from `lines` on each read, never stored
///
/// Mutation is strictly serialized: the aggregate is exclusively owned by
/// one in-process cart session and all operations take `&mut self`, run to
/// completion and never suspend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartAggregate {
    lines: Vec<CartLine>,
}

impl CartAggregate {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product to the cart.
    ///
    /// If a line with the same product id already exists, its quantity is
    /// incremented by `quantity` and the descriptive fields keep their
    /// original add-time snapshots. Otherwise a new line is appended.
    ///
    /// Callers are expected to pass `quantity >= 1`; the initial value is
    /// not clamped here.
    pub fn add_item(&mut self, item: CartItem, quantity: u32) -> CartChanged {
        match self.find_mut(&item.product_id) {
            Some(line) => line.quantity += quantity,
            None => self.lines.push(item.into_line(quantity)),
        }
        CartChanged
    }

    /// Removes the line matching `product_id`. No-op if absent.
    pub fn remove_item(&mut self, product_id: &str) -> CartChanged {
        self.lines.retain(|line| line.product_id != product_id);
        CartChanged
    }

    /// Sets the matching line's quantity to the given absolute value.
    ///
    /// A quantity of zero or below means "remove", never "invalid". No-op
    /// if `product_id` is not in the cart.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CartChanged {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }
        if let Some(line) = self.find_mut(product_id) {
            line.quantity = quantity as u32;
        }
        CartChanged
    }

    /// Empties the cart unconditionally.
    pub fn clear(&mut self) -> CartChanged {
        self.lines.clear();
        CartChanged
    }

    /// All lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all quantities, computed fresh on every call.
    pub fn total_item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `unit_price * quantity` over all lines, computed fresh on
    /// every call.
    pub fn total_price(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Serializes the full cart state for the persistence mirror.
    ///
    /// The payload is a JSON array of line records; the whole state is
    /// re-serialized on every write, so a late-completing write only ever
    /// leaves a slightly stale full snapshot behind.
    pub fn to_mirror_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.lines)?)
    }

    /// Rebuilds a cart from a mirror payload produced by
    /// [`to_mirror_payload`](Self::to_mirror_payload).
    ///
    /// Lines that violate the quantity invariant are rejected as corrupt
    /// rather than silently normalized.
    pub fn from_mirror_payload(payload: &str) -> Result<Self> {
        let lines: Vec<CartLine> = serde_json::from_str(payload)?;
        if lines.iter().any(|line| line.quantity == 0) {
            return Err(serde_json::Error::custom("cart line with zero quantity").into());
        }
        Ok(Self { lines })
    }

    fn find_mut(&mut self, product_id: &str) -> Option<&mut CartLine> {
        // Linear scan; carts hold tens of items at most.
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: f64) -> CartItem {
        CartItem::new(id, format!("Product {id}"), price, None)
    }

    #[test]
    fn test_add_item_merges_on_same_product_id() {
        let mut cart = CartAggregate::new();
        let _ = cart.add_item(item("p1", 10.0), 2);
        let _ = cart.add_item(item("p1", 10.0), 3);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_add_item_keeps_first_snapshot_fields() {
        let mut cart = CartAggregate::new();
        let _ = cart.add_item(CartItem::new("p1", "Original title", 10.0, None), 1);
        let _ = cart.add_item(CartItem::new("p1", "Renamed title", 99.0, None), 1);

        let line = &cart.lines()[0];
        assert_eq!(line.title, "Original title");
        assert_eq!(line.unit_price, 10.0);
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_add_item_preserves_insertion_order() {
        let mut cart = CartAggregate::new();
        let _ = cart.add_item(item("p1", 1.0), 1);
        let _ = cart.add_item(item("p2", 2.0), 1);
        let _ = cart.add_item(item("p3", 3.0), 1);
        let _ = cart.add_item(item("p2", 2.0), 1);

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2", "p3"]);
    }

    #[test]
    fn test_remove_item_unknown_id_is_noop() {
        let mut cart = CartAggregate::new();
        let _ = cart.add_item(item("p1", 1.0), 1);
        let _ = cart.add_item(item("p2", 2.0), 2);
        let before = cart.clone();

        let _ = cart.remove_item("unknown");

        assert_eq!(cart, before);
    }

    #[test]
    fn test_update_quantity_sets_absolute_value() {
        let mut cart = CartAggregate::new();
        let _ = cart.add_item(item("p1", 1.0), 2);
        let _ = cart.update_quantity("p1", 7);

        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        let mut cart = CartAggregate::new();
        let _ = cart.add_item(item("p1", 1.0), 2);
        let _ = cart.add_item(item("p2", 1.0), 2);

        let _ = cart.update_quantity("p1", 0);
        assert!(cart.lines().iter().all(|l| l.product_id != "p1"));

        let _ = cart.update_quantity("p2", -5);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_id_is_noop() {
        let mut cart = CartAggregate::new();
        let _ = cart.add_item(item("p1", 1.0), 2);
        let before = cart.clone();

        let _ = cart.update_quantity("unknown", 4);

        assert_eq!(cart, before);
    }

    #[test]
    fn test_totals_track_mutations_without_recompute_call() {
        let mut cart = CartAggregate::new();
        let _ = cart.add_item(item("p1", 2.5), 2);
        let _ = cart.add_item(item("p2", 10.0), 1);
        assert_eq!(cart.total_item_count(), 3);
        assert_eq!(cart.total_price(), 15.0);

        let _ = cart.update_quantity("p2", 3);
        assert_eq!(cart.total_item_count(), 5);
        assert_eq!(cart.total_price(), 35.0);

        let _ = cart.remove_item("p1");
        assert_eq!(cart.total_item_count(), 3);
        assert_eq!(cart.total_price(), 30.0);

        let _ = cart.clear();
        assert_eq!(cart.total_item_count(), 0);
        assert_eq!(cart.total_price(), 0.0);
    }

    #[test]
    fn test_product_ids_stay_unique() {
        let mut cart = CartAggregate::new();
        for _ in 0..4 {
            let _ = cart.add_item(item("p1", 1.0), 1);
            let _ = cart.add_item(item("p2", 1.0), 1);
        }

        let mut ids: Vec<&str> = cart.lines().iter().map(|l| l.product_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), cart.len());
    }

    #[test]
    fn test_mirror_payload_round_trip() {
        let mut cart = CartAggregate::new();
        let _ = cart.add_item(
            CartItem::new("p1", "Keyboard", 49.9, Some("https://img/kb.jpg".into())),
            2,
        );
        let _ = cart.add_item(CartItem::new("p2", "Mouse", 19.9, None), 1);

        let payload = cart.to_mirror_payload().unwrap();
        let rebuilt = CartAggregate::from_mirror_payload(&payload).unwrap();

        assert_eq!(rebuilt, cart);
    }

    #[test]
    fn test_mirror_payload_uses_original_field_names() {
        let mut cart = CartAggregate::new();
        let _ = cart.add_item(CartItem::new("p1", "Keyboard", 49.9, None), 2);

        let payload = cart.to_mirror_payload().unwrap();
        assert!(payload.contains("\"id\":\"p1\""));
        assert!(payload.contains("\"price\":49.9"));
        assert!(payload.contains("\"qty\":2"));
    }

    #[test]
    fn test_from_mirror_payload_rejects_garbage() {
        assert!(CartAggregate::from_mirror_payload("not json").is_err());
        assert!(CartAggregate::from_mirror_payload("{\"id\":\"p1\"}").is_err());
        // Zero quantity violates the invariant and reads as corrupt.
        assert!(
            CartAggregate::from_mirror_payload(
                "[{\"id\":\"p1\",\"title\":\"x\",\"price\":1.0,\"qty\":0}]"
            )
            .is_err()
        );
    }
}
