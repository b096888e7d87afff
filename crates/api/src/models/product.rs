//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use vitrina_core::ProductId;

/// A catalog product (domain type).
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Brand name.
    pub brand: String,
    /// Stock-keeping unit, unique across the catalog.
    pub sku: String,
    /// Unit price in RSD minor units. Always >= 0.
    pub price: i64,
    /// Tracked stock quantity; `None` means stock is not tracked.
    pub stock: Option<i32>,
    /// Ordered image URLs.
    pub images: Vec<String>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether `quantity` units can be put in a cart.
    ///
    /// Untracked stock (`None`) never limits the quantity.
    #[must_use]
    pub fn has_stock_for(&self, quantity: i32) -> bool {
        self.stock.is_none_or(|available| quantity <= available)
    }
}

/// JSON representation of a product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub sku: String,
    pub price: i64,
    pub stock: Option<i32>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            brand: product.brand.clone(),
            sku: product.sku.clone(),
            price: product.price,
            stock: product.stock,
            images: product.images.clone(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: Option<i32>) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Patike".to_owned(),
            brand: "Nike".to_owned(),
            sku: "SKU-001".to_owned(),
            price: 12_990,
            stock,
            images: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_untracked_stock_never_limits() {
        assert!(product(None).has_stock_for(1_000));
    }

    #[test]
    fn test_tracked_stock_is_a_ceiling() {
        let p = product(Some(3));
        assert!(p.has_stock_for(3));
        assert!(!p.has_stock_for(4));
    }
}
