//! Product domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Listing category shown as a catalog filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Electronics,
    Fashion,
    Home,
}

impl ProductCategory {
    /// The fixed category list offered by the listing form.
    pub const ALL: [ProductCategory; 3] = [Self::Electronics, Self::Fashion, Self::Home];

    /// Human-readable name used by catalog filter chips.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Fashion => "Fashion",
            Self::Home => "Home",
        }
    }
}

/// Listing visibility. Only `active` products appear in the public catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Inactive,
}

impl Default for ProductStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// A product row as stored by the remote data service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Row identifier assigned by the backend.
    pub id: String,
    /// Seller's user id.
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: ProductCategory,
    /// Public URL of the listing image, if one was uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<String>,
    #[serde(default)]
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
}

/// A draft listing to be inserted; the backend assigns the row id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: ProductCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<String>,
    #[serde(default)]
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
}

impl NewProduct {
    /// Checks the fields the listing form requires before submission.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.title.trim().is_empty() {
            return Err(crate::StoreError::validation("product title is required"));
        }
        if self.description.trim().is_empty() {
            return Err(crate::StoreError::validation(
                "product description is required",
            ));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(crate::StoreError::validation(
                "product price must be a non-negative number",
            ));
        }
        Ok(())
    }
}
