//! Cart domain types.
//!
//! The cart owns only (product, quantity) pairs; product display fields are
//! joined from the live catalog at read time so the client always sees
//! current names, prices, and stock.

use chrono::{DateTime, Utc};
use serde::Serialize;

use vitrina_core::ProductId;

/// One cart line for a user, with the product fields joined at read time.
#[derive(Debug, Clone)]
pub struct CartEntry {
    /// The product in the cart.
    pub product_id: ProductId,
    /// How many units the user wants. Always >= 1.
    pub quantity: i32,
    /// When the product was first added.
    pub added_at: DateTime<Utc>,
    /// Live product name.
    pub name: String,
    /// Live brand name.
    pub brand: String,
    /// Live unit price in RSD minor units.
    pub price: i64,
    /// Live tracked stock, if the product tracks stock.
    pub stock: Option<i32>,
    /// First product image, if any.
    pub image: Option<String>,
}

impl CartEntry {
    /// Line total: unit price x quantity.
    #[must_use]
    pub const fn line_total(&self) -> i64 {
        self.price * self.quantity as i64
    }
}

/// Subtotal over a set of cart entries.
#[must_use]
pub fn subtotal(entries: &[CartEntry]) -> i64 {
    entries.iter().map(CartEntry::line_total).sum()
}

/// JSON representation of a cart line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: ProductId,
    pub quantity: i32,
    pub added_at: DateTime<Utc>,
    pub name: String,
    pub brand: String,
    pub price: i64,
    pub stock: Option<i32>,
    pub image: Option<String>,
    pub line_total: i64,
}

impl From<&CartEntry> for CartItemView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            product_id: entry.product_id,
            quantity: entry.quantity,
            added_at: entry.added_at,
            name: entry.name.clone(),
            brand: entry.brand.clone(),
            price: entry.price,
            stock: entry.stock,
            image: entry.image.clone(),
            line_total: entry.line_total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(price: i64, quantity: i32) -> CartEntry {
        CartEntry {
            product_id: ProductId::new(1),
            quantity,
            added_at: Utc::now(),
            name: "Majica".to_owned(),
            brand: "Adidas".to_owned(),
            price,
            stock: None,
            image: None,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(entry(1_500, 3).line_total(), 4_500);
    }

    #[test]
    fn test_subtotal_over_entries() {
        let entries = vec![entry(1_500, 2), entry(990, 1)];
        assert_eq!(subtotal(&entries), 3_990);
    }

    #[test]
    fn test_subtotal_empty_cart() {
        assert_eq!(subtotal(&[]), 0);
    }
}
