//! Simulated order placement.
//!
//! Checkout is an intentional demo stub: no order row is written anywhere,
//! no payment step runs, and the generated identifier carries no server
//! meaning. The whole flow is "generate an id, clear the cart".

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Prefix of every simulated order identifier.
pub const ORDER_ID_PREFIX: &str = "ORD-";

/// Receipt for a simulated checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedOrder {
    /// Locally generated, cosmetic identifier (`ORD-` + base-36 timestamp).
    pub order_id: String,
    /// Number of distinct lines at checkout time.
    pub line_count: usize,
    /// Sum of quantities at checkout time.
    pub total_item_count: u64,
    /// Cart total at checkout time.
    pub total_price: f64,
}

/// Generates a simulated order identifier from the current wall clock.
pub fn generate_order_id() -> String {
    order_id_from_millis(Utc::now().timestamp_millis().max(0) as u64)
}

/// `ORD-` followed by the upper-cased base-36 encoding of `millis`.
pub fn order_id_from_millis(millis: u64) -> String {
    format!("{ORDER_ID_PREFIX}{}", to_base36_upper(millis))
}

fn to_base36_upper(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_format() {
        // 1700000000000 in base 36 is "LOYW3V28" with an upper-case alphabet.
        assert_eq!(order_id_from_millis(1_700_000_000_000), "ORD-LOYW3V28");
        assert_eq!(order_id_from_millis(0), "ORD-0");
        assert_eq!(order_id_from_millis(35), "ORD-Z");
        assert_eq!(order_id_from_millis(36), "ORD-10");
    }

    #[test]
    fn test_generated_id_has_prefix_and_base36_body() {
        let id = generate_order_id();
        let body = id.strip_prefix(ORDER_ID_PREFIX).unwrap();
        assert!(!body.is_empty());
        assert!(body.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
