//! Catalog seeding for development environments.

use super::{CliError, connect};

/// Demo products: (name, brand, sku, price in RSD minor units, stock, image).
const DEMO_PRODUCTS: &[(&str, &str, &str, i64, Option<i32>, &str)] = &[
    (
        "Patike Air Zoom",
        "Nike",
        "NK-AZ-001",
        12_990,
        Some(25),
        "https://cdn.vitrina.rs/img/nk-az-001.jpg",
    ),
    (
        "Duks sa kapuljačom",
        "Adidas",
        "AD-HD-014",
        6_490,
        Some(40),
        "https://cdn.vitrina.rs/img/ad-hd-014.jpg",
    ),
    (
        "Pamučna majica",
        "Zara",
        "ZR-TS-102",
        2_190,
        None,
        "https://cdn.vitrina.rs/img/zr-ts-102.jpg",
    ),
    (
        "Zimska jakna",
        "The North Face",
        "TNF-JK-007",
        54_990,
        Some(8),
        "https://cdn.vitrina.rs/img/tnf-jk-007.jpg",
    ),
    (
        "Ranac 28l",
        "Deuter",
        "DT-BP-028",
        18_490,
        Some(12),
        "https://cdn.vitrina.rs/img/dt-bp-028.jpg",
    ),
];

/// Insert demo products. Existing SKUs are left untouched, so the command
/// is safe to re-run.
///
/// # Errors
///
/// Returns `CliError::Database` if an insert fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    let mut inserted = 0_u32;
    for &(name, brand, sku, price, stock, image) in DEMO_PRODUCTS {
        let result = sqlx::query(
            "INSERT INTO shop.products (name, brand, sku, price, stock, images) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (sku) DO NOTHING",
        )
        .bind(name)
        .bind(brand)
        .bind(sku)
        .bind(price)
        .bind(stock)
        .bind(vec![image.to_owned()])
        .execute(&pool)
        .await?;

        inserted += u32::try_from(result.rows_affected()).unwrap_or(0);
    }

    tracing::info!(inserted, "catalog seeded");
    Ok(())
}
