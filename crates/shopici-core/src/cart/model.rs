//! Cart line item models.

use serde::{Deserialize, Serialize};

/// One product entry in the cart, uniquely keyed by product id.
///
/// The serialized field names match the mirror blob format carried over from
/// the first release (`id`, `price`, `image_urls`, `qty`), so previously
/// persisted carts stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product identifier, matches a remote product record. Immutable.
    #[serde(rename = "id")]
    pub product_id: String,
    /// Display name snapshot taken at add time, never re-synced.
    pub title: String,
    /// Unit price snapshot taken at add time, never re-synced.
    #[serde(rename = "price")]
    pub unit_price: f64,
    /// Optional display image reference.
    #[serde(rename = "image_urls", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Always >= 1; a line that would drop to zero is removed instead.
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl CartLine {
    /// Line subtotal (`unit_price * quantity`).
    pub fn subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// A product descriptor passed to `add_item`, without a quantity.
///
/// Title, price and image are copied into the new [`CartLine`] as snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product_id: String,
    pub title: String,
    pub unit_price: f64,
    pub image_url: Option<String>,
}

impl CartItem {
    pub fn new(
        product_id: impl Into<String>,
        title: impl Into<String>,
        unit_price: f64,
        image_url: Option<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            title: title.into(),
            unit_price,
            image_url,
        }
    }

    /// Turns the descriptor into a line with the given quantity.
    pub fn into_line(self, quantity: u32) -> CartLine {
        CartLine {
            product_id: self.product_id,
            title: self.title,
            unit_price: self.unit_price,
            image_url: self.image_url,
            quantity,
        }
    }
}

/// Snapshot of a catalog row at add-to-cart time.
impl From<&crate::product::Product> for CartItem {
    fn from(product: &crate::product::Product) -> Self {
        Self {
            product_id: product.id.clone(),
            title: product.title.clone(),
            unit_price: product.price,
            image_url: product.image_urls.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{Product, ProductCategory, ProductStatus};
    use chrono::Utc;

    #[test]
    fn test_cart_item_snapshots_product_fields() {
        let product = Product {
            id: "p1".into(),
            user_id: "seller-1".into(),
            title: "Vintage radio".into(),
            description: "Still hums".into(),
            price: 25.0,
            category: ProductCategory::Electronics,
            image_urls: Some("https://img/radio.jpg".into()),
            status: ProductStatus::Active,
            created_at: Utc::now(),
        };

        let line = CartItem::from(&product).into_line(2);
        assert_eq!(line.product_id, "p1");
        assert_eq!(line.unit_price, 25.0);
        assert_eq!(line.image_url.as_deref(), Some("https://img/radio.jpg"));
        assert_eq!(line.quantity, 2);
    }
}
