//! The single shared pricing formula.
//!
//! Every amount is in RSD minor units (para). Both the cart-page preview and
//! the checkout total are computed by [`quote`] so the two can never
//! disagree, and promo codes resolve here on the server - a discount the
//! client computed on its own never reaches an order.

use serde::{Deserialize, Serialize};

/// Subtotals strictly above this ship for free.
pub const FREE_SHIPPING_THRESHOLD: i64 = 50_000;

/// Flat delivery fee below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: i64 = 390;

/// Recognized promo codes and their percentage discounts.
const PROMO_CODES: &[(&str, u8)] = &[("POPUST10", 10), ("NOVO20", 20)];

/// Compute the shipping fee for a subtotal.
///
/// Free strictly above [`FREE_SHIPPING_THRESHOLD`]; a subtotal of exactly
/// the threshold still pays the flat fee.
#[must_use]
pub const fn compute_shipping(subtotal: i64) -> i64 {
    if subtotal > FREE_SHIPPING_THRESHOLD {
        0
    } else {
        FLAT_SHIPPING_FEE
    }
}

/// Resolve a promo code to its percentage discount.
///
/// Codes are matched exactly (case-sensitive, as printed in campaigns).
/// Returns `None` for unknown codes.
#[must_use]
pub fn resolve_promo(code: &str) -> Option<u8> {
    PROMO_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|&(_, percent)| percent)
}

/// A server-computed order quote.
///
/// `total = subtotal - discount + shipping`, with shipping computed on the
/// discounted subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Sum of unit price x quantity over the items.
    pub subtotal: i64,
    /// Promo discount amount (0 without a code).
    pub discount: i64,
    /// Percentage behind `discount`, when a code was applied.
    pub discount_percent: Option<u8>,
    /// Delivery fee.
    pub shipping: i64,
    /// Amount actually charged.
    pub total: i64,
}

/// Unknown promo code.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unknown promo code: {code}")]
pub struct UnknownPromoCode {
    /// The code as submitted.
    pub code: String,
}

/// Compute the full quote for a subtotal and an optional promo code.
///
/// # Errors
///
/// Returns [`UnknownPromoCode`] if a code is supplied but not recognized;
/// an unknown code rejects the operation instead of silently charging the
/// undiscounted amount.
pub fn quote(subtotal: i64, promo_code: Option<&str>) -> Result<Quote, UnknownPromoCode> {
    let discount_percent = match promo_code {
        Some(code) => Some(resolve_promo(code).ok_or_else(|| UnknownPromoCode {
            code: code.to_owned(),
        })?),
        None => None,
    };

    let discount = discount_percent.map_or(0, |percent| subtotal * i64::from(percent) / 100);
    let discounted = subtotal - discount;
    let shipping = compute_shipping(discounted);

    Ok(Quote {
        subtotal,
        discount,
        discount_percent,
        shipping,
        total: discounted + shipping,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shipping_free_strictly_above_threshold() {
        assert_eq!(compute_shipping(50_001), 0);
    }

    #[test]
    fn test_shipping_flat_below_threshold() {
        assert_eq!(compute_shipping(49_999), FLAT_SHIPPING_FEE);
        assert!(compute_shipping(49_999) > 0);
    }

    #[test]
    fn test_shipping_boundary_is_not_free() {
        // Exactly the threshold still pays: the comparison is strict.
        assert_eq!(compute_shipping(50_000), FLAT_SHIPPING_FEE);
    }

    #[test]
    fn test_resolve_known_codes() {
        assert_eq!(resolve_promo("POPUST10"), Some(10));
        assert_eq!(resolve_promo("NOVO20"), Some(20));
    }

    #[test]
    fn test_resolve_unknown_code() {
        assert_eq!(resolve_promo("GRATIS50"), None);
        // Case-sensitive
        assert_eq!(resolve_promo("popust10"), None);
    }

    #[test]
    fn test_quote_without_promo() {
        let q = quote(10_000, None).unwrap();
        assert_eq!(q.subtotal, 10_000);
        assert_eq!(q.discount, 0);
        assert_eq!(q.shipping, FLAT_SHIPPING_FEE);
        assert_eq!(q.total, 10_000 + FLAT_SHIPPING_FEE);
    }

    #[test]
    fn test_quote_with_promo() {
        let q = quote(10_000, Some("POPUST10")).unwrap();
        assert_eq!(q.discount, 1_000);
        assert_eq!(q.discount_percent, Some(10));
        assert_eq!(q.total, 9_000 + FLAT_SHIPPING_FEE);
    }

    #[test]
    fn test_quote_unknown_promo_rejected() {
        let err = quote(10_000, Some("NEPOSTOJI")).unwrap_err();
        assert_eq!(err.code, "NEPOSTOJI");
    }

    #[test]
    fn test_quote_discount_can_drop_below_free_shipping() {
        // 55,000 ships free on its own, but NOVO20 brings the discounted
        // subtotal to 44,000 which pays the flat fee.
        let q = quote(55_000, Some("NOVO20")).unwrap();
        assert_eq!(q.discount, 11_000);
        assert_eq!(q.shipping, FLAT_SHIPPING_FEE);
        assert_eq!(q.total, 44_000 + FLAT_SHIPPING_FEE);
    }

    #[test]
    fn test_quote_large_subtotal_ships_free() {
        let q = quote(120_000, None).unwrap();
        assert_eq!(q.shipping, 0);
        assert_eq!(q.total, 120_000);
    }
}
