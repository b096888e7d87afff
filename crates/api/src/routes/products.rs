//! Catalog route handlers.
//!
//! Listing and detail are public; mutations are admin-only.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use vitrina_core::ProductId;

use crate::db::products::{ProductFilter, ProductInput, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::product::{Product, ProductView};
use crate::routes::orders::PaginationView;
use crate::state::AppState;

/// Catalog listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub brand: Option<String>,
}

/// Product create/update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub brand: String,
    pub sku: String,
    pub price: i64,
    pub stock: Option<i32>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProductRequest {
    /// Validate the request and borrow it as repository input.
    fn as_input(&self) -> Result<ProductInput<'_>> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Naziv proizvoda je obavezan".to_owned()));
        }
        if self.sku.trim().is_empty() {
            return Err(AppError::BadRequest("SKU je obavezan".to_owned()));
        }
        if self.price < 0 {
            return Err(AppError::BadRequest("Cena ne može biti negativna".to_owned()));
        }
        if self.stock.is_some_and(|stock| stock < 0) {
            return Err(AppError::BadRequest(
                "Stanje ne može biti negativno".to_owned(),
            ));
        }

        Ok(ProductInput {
            name: self.name.trim(),
            brand: self.brand.trim(),
            sku: self.sku.trim(),
            price: self.price,
            stock: self.stock,
            images: &self.images,
        })
    }
}

fn product_views(products: &[Product]) -> Vec<ProductView> {
    products.iter().map(ProductView::from).collect()
}

/// Paginated product listing with optional name search and brand filter.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Value>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let filter = ProductFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        brand: query.brand.filter(|b| !b.trim().is_empty()),
    };

    let (products, total) = ProductRepository::new(state.pool())
        .list(&filter, page, limit)
        .await?;

    Ok(Json(json!({
        "products": product_views(&products),
        "pagination": PaginationView::new(page, limit, total),
    })))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Proizvod nije pronađen".to_owned()))?;

    Ok(Json(json!({ "product": ProductView::from(&product) })))
}

/// Create a product.
#[instrument(skip(state, _admin, request))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(request): Json<ProductRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let product = ProductRepository::new(state.pool())
        .create(request.as_input()?)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::Conflict(_) => {
                AppError::BadRequest("Proizvod sa ovim SKU već postoji".to_owned())
            }
            other => AppError::Database(other),
        })?;

    tracing::info!(product_id = %product.id, sku = %product.sku, "product created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Proizvod je uspešno kreiran",
            "product": ProductView::from(&product),
        })),
    ))
}

/// Update a product.
#[instrument(skip(state, _admin, request))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(request): Json<ProductRequest>,
) -> Result<Json<Value>> {
    let product = ProductRepository::new(state.pool())
        .update(id, request.as_input()?)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Proizvod nije pronađen".to_owned())
            }
            crate::db::RepositoryError::Conflict(_) => {
                AppError::BadRequest("Proizvod sa ovim SKU već postoji".to_owned())
            }
            other => AppError::Database(other),
        })?;

    Ok(Json(json!({
        "message": "Proizvod je uspešno izmenjen",
        "product": ProductView::from(&product),
    })))
}

/// Delete a product.
#[instrument(skip(state, _admin))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    let deleted = ProductRepository::new(state.pool()).delete(id).await?;

    if !deleted {
        return Err(AppError::NotFound("Proizvod nije pronađen".to_owned()));
    }

    tracing::info!(product_id = %id, "product deleted");

    Ok(StatusCode::NO_CONTENT)
}
