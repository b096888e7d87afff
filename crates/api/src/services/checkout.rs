//! Checkout service.
//!
//! Turns a non-empty cart plus buyer-supplied data into exactly one order,
//! then clears the cart - all inside a single transaction, so a failure at
//! any step leaves the cart intact for retry.
//!
//! Unit prices are resolved from the catalog here, never taken from the
//! client, and the promo code (if any) must resolve server-side; the
//! resulting discount is persisted on the order.

use sqlx::PgPool;
use thiserror::Error;

use vitrina_core::{Email, PaymentMethod, PhoneNumber, UserId, pricing};

use crate::db::RepositoryError;
use crate::db::{carts, orders};
use crate::models::cart::{CartEntry, subtotal};
use crate::models::order::{Order, OrderItem, ShippingAddress};

/// Errors that can occur during checkout.
///
/// Validation messages are user-facing Serbian; everything else is mapped
/// to a client message at the response layer.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A form field failed validation. Fail-fast: the first failing field
    /// aborts the checkout.
    #[error("invalid field {field}: {message}")]
    Validation {
        /// camelCase field name, as the SPA knows it.
        field: &'static str,
        /// Serbian, user-facing.
        message: &'static str,
    },

    /// Checkout with an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line exceeds the product's tracked stock.
    #[error("not enough stock for {name}: {available} available")]
    InsufficientStock {
        /// Product display name.
        name: String,
        /// Units currently in stock.
        available: i32,
    },

    /// Unrecognized promo code.
    #[error("unknown promo code: {0}")]
    UnknownPromo(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Checkout input, as submitted by the client.
///
/// No prices anywhere in here: the server resolves them from the catalog.
#[derive(Debug)]
pub struct CheckoutData<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub street: &'a str,
    pub city: &'a str,
    pub postal_code: &'a str,
    pub country: Option<&'a str>,
    pub note: Option<&'a str>,
    pub payment_method: PaymentMethod,
    pub promo_code: Option<&'a str>,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert the user's cart into an order and clear the cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Validation` on the first failing form field,
    /// `CheckoutError::EmptyCart` when there is nothing to order,
    /// `CheckoutError::InsufficientStock` when a line exceeds tracked
    /// stock, and `CheckoutError::UnknownPromo` for unrecognized codes. On
    /// any error the transaction rolls back and the cart is untouched.
    pub async fn checkout(
        &self,
        user_id: UserId,
        data: CheckoutData<'_>,
    ) -> Result<Order, CheckoutError> {
        let address = validate(&data)?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let lines = carts::lines_for_update_in(&mut tx, user_id).await?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        check_stock(&lines)?;

        let quote = pricing::quote(subtotal(&lines), data.promo_code)
            .map_err(|e| CheckoutError::UnknownPromo(e.code))?;

        let items: Vec<OrderItem> = lines
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id,
                quantity: line.quantity,
                price_at_time: line.price,
            })
            .collect();

        let order_number = generate_order_number();
        let order = orders::create_in(
            &mut tx,
            orders::NewOrder {
                order_number: &order_number,
                user_id,
                payment_method: data.payment_method,
                subtotal: quote.subtotal,
                discount: quote.discount,
                promo_code: data.promo_code,
                shipping_fee: quote.shipping,
                total_amount: quote.total,
                address: &address,
                items: &items,
            },
        )
        .await?;

        carts::clear_in(&mut tx, user_id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(order)
    }
}

/// Validate the checkout form, fail-fast, and build the shipping address.
fn validate(data: &CheckoutData<'_>) -> Result<ShippingAddress, CheckoutError> {
    if data.first_name.trim().is_empty() {
        return Err(CheckoutError::Validation {
            field: "firstName",
            message: "Ime je obavezno",
        });
    }
    if data.last_name.trim().is_empty() {
        return Err(CheckoutError::Validation {
            field: "lastName",
            message: "Prezime je obavezno",
        });
    }
    if Email::parse(data.email).is_err() {
        return Err(CheckoutError::Validation {
            field: "email",
            message: "Unesite ispravnu email adresu",
        });
    }
    let phone = PhoneNumber::parse(data.phone).map_err(|_| CheckoutError::Validation {
        field: "phone",
        message: "Unesite ispravan broj telefona",
    })?;
    if data.street.trim().is_empty() {
        return Err(CheckoutError::Validation {
            field: "street",
            message: "Adresa je obavezna",
        });
    }
    if data.city.trim().is_empty() {
        return Err(CheckoutError::Validation {
            field: "city",
            message: "Grad je obavezan",
        });
    }
    if data.postal_code.trim().is_empty() {
        return Err(CheckoutError::Validation {
            field: "postalCode",
            message: "Poštanski broj je obavezan",
        });
    }

    Ok(ShippingAddress {
        street: data.street.trim().to_owned(),
        city: data.city.trim().to_owned(),
        postal_code: data.postal_code.trim().to_owned(),
        country: data
            .country
            .map_or_else(|| "Srbija".to_owned(), |c| c.trim().to_owned()),
        phone: Some(phone.into_inner()),
        note: data.note.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty()),
    })
}

/// Reject the checkout if any line exceeds its product's tracked stock.
fn check_stock(lines: &[CartEntry]) -> Result<(), CheckoutError> {
    for line in lines {
        if let Some(available) = line.stock
            && line.quantity > available
        {
            return Err(CheckoutError::InsufficientStock {
                name: line.name.clone(),
                available,
            });
        }
    }

    Ok(())
}

/// Generate a human-readable order number.
fn generate_order_number() -> String {
    format!("VTR-{:08}", rand::random::<u32>() % 100_000_000)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vitrina_core::ProductId;

    fn valid_data() -> CheckoutData<'static> {
        CheckoutData {
            first_name: "Marko",
            last_name: "Marković",
            email: "marko@example.com",
            phone: "+381641234567",
            street: "Knez Mihailova 1",
            city: "Beograd",
            postal_code: "11000",
            country: None,
            note: None,
            payment_method: PaymentMethod::Cash,
            promo_code: None,
        }
    }

    fn line(price: i64, quantity: i32, stock: Option<i32>) -> CartEntry {
        CartEntry {
            product_id: ProductId::new(1),
            quantity,
            added_at: Utc::now(),
            name: "Patike".to_owned(),
            brand: "Nike".to_owned(),
            price,
            stock,
            image: None,
        }
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        let address = validate(&valid_data()).unwrap();
        assert_eq!(address.country, "Srbija");
        assert_eq!(address.phone.as_deref(), Some("+381641234567"));
    }

    #[test]
    fn test_validate_fails_fast_on_first_field() {
        let mut data = valid_data();
        data.first_name = "  ";
        data.email = "neispravan";

        // Both fields are bad; the first one wins.
        let err = validate(&data).unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Validation {
                field: "firstName",
                ..
            }
        ));
    }

    #[test]
    fn test_validate_rejects_email_without_tld() {
        let mut data = valid_data();
        data.email = "marko@example";

        let err = validate(&data).unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Validation { field: "email", .. }
        ));
    }

    #[test]
    fn test_validate_rejects_short_phone() {
        let mut data = valid_data();
        data.phone = "+38164123";

        let err = validate(&data).unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Validation { field: "phone", .. }
        ));
    }

    #[test]
    fn test_validate_accepts_both_phone_prefixes() {
        let mut data = valid_data();
        data.phone = "0641234567";
        assert!(validate(&data).is_ok());
    }

    #[test]
    fn test_validate_empty_note_becomes_none() {
        let mut data = valid_data();
        data.note = Some("   ");
        let address = validate(&data).unwrap();
        assert!(address.note.is_none());
    }

    #[test]
    fn test_check_stock_within_limits() {
        assert!(check_stock(&[line(1_000, 2, Some(5)), line(500, 3, None)]).is_ok());
    }

    #[test]
    fn test_check_stock_exceeded() {
        let err = check_stock(&[line(1_000, 6, Some(5))]).unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InsufficientStock { available: 5, .. }
        ));
    }

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number();
        assert!(number.starts_with("VTR-"));
        assert_eq!(number.len(), 12);
    }
}
