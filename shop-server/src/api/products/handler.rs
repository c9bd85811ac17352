//! Product API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use shared::ErrorCode;
use shared::catalog::normalize_category;
use shared::models::{Product, ProductCreate, ProductUpdate, SaleUpdate};

use crate::api::form::MultipartForm;
use crate::core::ServerState;
use crate::db::repository::{RepoError, product};
use crate::services::{StoredFile, uploads};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_price,
    validate_text_range,
};
use crate::utils::{ApiResponse, ApiResult, AppError, ok, ok_with_message};

const MIN_PRODUCT_NAME_LEN: usize = 3;

fn product_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
        .with_detail("productId", id)
}

/// Repository `NotFound` becomes `ProductNotFound`; other errors pass through
fn not_found_as_product(id: i64) -> impl FnOnce(RepoError) -> AppError {
    move |e| match e {
        RepoError::NotFound(_) => product_not_found(id),
        other => other.into(),
    }
}

fn canonical_category(input: &str) -> Result<String, AppError> {
    normalize_category(input)
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidCategory,
                format!("Unknown category: {}", input.trim()),
            )
            .with_detail("category", input.trim())
        })
}

fn validate_stock(stock: i64) -> Result<(), AppError> {
    if stock < 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "stock must be a non-negative integer",
        )
        .with_detail("field", "stock"));
    }
    Ok(())
}

fn priced(products: Vec<Product>) -> Vec<Product> {
    let now = shared::util::now_millis();
    products
        .into_iter()
        .map(|p| p.with_effective_price(now))
        .collect()
}

// =============================================================================
// Public
// =============================================================================

/// GET /api/products - active products
pub async fn list(State(state): State<ServerState>) -> ApiResult<Vec<Product>> {
    let products = product::find_active(state.pool()).await?;
    Ok(ok(priced(products)))
}

/// GET /api/products/sale - products on sale now
pub async fn list_on_sale(State(state): State<ServerState>) -> ApiResult<Vec<Product>> {
    let products = product::find_on_sale(state.pool(), shared::util::now_millis()).await?;
    Ok(ok(priced(products)))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ApiResult<Product> {
    let found = product::find_active_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| product_not_found(id))?;
    Ok(ok(found.with_effective_price(shared::util::now_millis())))
}

// =============================================================================
// Admin
// =============================================================================

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Json(mut payload): Json<ProductCreate>,
) -> ApiResult<Product> {
    validate_text_range(&payload.name, "name", MIN_PRODUCT_NAME_LEN, MAX_NAME_LEN)?;
    payload.category = canonical_category(&payload.category)?;
    validate_price(payload.price, "price")?;
    if let Some(stock) = payload.stock {
        validate_stock(stock)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;

    let created = product::create(state.pool(), payload).await?;
    tracing::info!(product_id = created.id, name = %created.name, "Product created");
    Ok(ok_with_message("Product added", created))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(mut payload): Json<ProductUpdate>,
) -> ApiResult<Product> {
    if let Some(name) = &payload.name {
        validate_text_range(name, "name", MIN_PRODUCT_NAME_LEN, MAX_NAME_LEN)?;
    }
    if let Some(category) = &payload.category {
        payload.category = Some(canonical_category(category)?);
    }
    if let Some(price) = payload.price {
        validate_price(price, "price")?;
    }
    if let Some(stock) = payload.stock {
        validate_stock(stock)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;

    let updated = product::update(state.pool(), id, payload)
        .await
        .map_err(not_found_as_product(id))?;
    tracing::info!(product_id = id, "Product updated");
    Ok(ok_with_message("Product updated", updated))
}

/// DELETE /api/products/{id} - soft delete
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<()>, AppError> {
    if !product::soft_delete(state.pool(), id).await? {
        return Err(product_not_found(id));
    }
    tracing::info!(product_id = id, "Product soft-deleted");
    Ok(ApiResponse::ok_with_message("Product deleted"))
}

fn validate_sale(sale: &SaleUpdate) -> Result<(), AppError> {
    let invalid = |msg: &str| AppError::with_message(ErrorCode::InvalidSale, msg);

    if !sale.discount_percentage.is_finite()
        || !(0.0..=100.0).contains(&sale.discount_percentage)
    {
        return Err(invalid("discountPercentage must be between 0 and 100"));
    }
    if sale.is_on_sale && sale.discount_percentage <= 0.0 {
        return Err(invalid("discountPercentage must be positive for an active sale"));
    }
    if let (Some(start), Some(end)) = (sale.sale_start_date, sale.sale_end_date)
        && start > end
    {
        return Err(invalid("saleStartDate must not be after saleEndDate"));
    }
    Ok(())
}

/// PUT /api/products/sale/{id}
pub async fn set_sale(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(sale): Json<SaleUpdate>,
) -> ApiResult<Product> {
    validate_sale(&sale)?;
    let updated = product::set_sale(state.pool(), id, &sale)
        .await
        .map_err(not_found_as_product(id))?;
    tracing::info!(
        product_id = id,
        discount = sale.discount_percentage,
        on_sale = sale.is_on_sale,
        "Product sale updated"
    );
    Ok(ok_with_message(
        "Sale updated",
        updated.with_effective_price(shared::util::now_millis()),
    ))
}

/// DELETE /api/products/sale/{id}
pub async fn remove_sale(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ApiResult<Product> {
    let updated = product::remove_sale(state.pool(), id)
        .await
        .map_err(not_found_as_product(id))?;
    tracing::info!(product_id = id, "Product sale removed");
    Ok(ok_with_message("Sale removed", updated))
}

/// GET /api/products/admin/all - including soft-deleted
pub async fn list_all(State(state): State<ServerState>) -> ApiResult<Vec<Product>> {
    let products = product::find_all(state.pool()).await?;
    Ok(ok(products))
}

/// PATCH /api/products/admin/restore/{id}
pub async fn restore(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ApiResult<Product> {
    if !product::restore(state.pool(), id).await? {
        return Err(product_not_found(id));
    }
    let restored = product::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| product_not_found(id))?;
    tracing::info!(product_id = id, "Product restored");
    Ok(ok_with_message("Product restored", restored))
}

/// DELETE /api/products/admin/permanent/{id}
pub async fn delete_permanent(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<()>, AppError> {
    if !product::delete_permanent(state.pool(), id).await? {
        return Err(product_not_found(id));
    }
    tracing::warn!(product_id = id, "Product permanently deleted");
    Ok(ApiResponse::ok_with_message("Product permanently deleted"))
}

/// POST /api/products/images - multipart field `file` (or `image`)
pub async fn upload_image(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> ApiResult<StoredFile> {
    let mut form = MultipartForm::read(multipart).await?;
    let file = form
        .take_file(&["file", "image"])
        .ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;

    let stored = uploads::store_product_image(&state.uploads_dir(), &file.filename, &file.data)?;
    Ok(ok_with_message("Image uploaded", stored))
}
