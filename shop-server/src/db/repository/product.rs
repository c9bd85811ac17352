//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate, ProductUpdate, SaleUpdate};
use sqlx::{Sqlite, SqlitePool, Transaction};

const PRODUCT_SELECT: &str = "SELECT id, name, category, price, description, image, stock, is_deleted, is_on_sale, discount_percentage, sale_start_date, sale_end_date, created_at, updated_at FROM products";

/// Non-deleted products, newest first
pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE is_deleted = 0 ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Product>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Non-deleted products flagged on sale whose end date has not passed
pub async fn find_on_sale(pool: &SqlitePool, now: i64) -> RepoResult<Vec<Product>> {
    let sql = format!(
        "{PRODUCT_SELECT} WHERE is_deleted = 0 AND is_on_sale = 1 AND (sale_end_date IS NULL OR sale_end_date >= ?) ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, Product>(&sql)
        .bind(now)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// All products including soft-deleted ones
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let sql = format!("{PRODUCT_SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Product>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_active_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ? AND is_deleted = 0");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a product; `category` must already be canonical
pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO products (id, name, category, price, description, image, stock, is_deleted, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(&data.category)
    .bind(data.price)
    .bind(data.description.as_deref().unwrap_or_default())
    .bind(&data.image)
    .bind(data.stock.unwrap_or(0))
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Partial update of a non-deleted product
pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE products SET name = COALESCE(?1, name), category = COALESCE(?2, category), price = COALESCE(?3, price), description = COALESCE(?4, description), image = COALESCE(?5, image), stock = COALESCE(?6, stock), updated_at = ?7 WHERE id = ?8 AND is_deleted = 0",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.category)
    .bind(data.price)
    .bind(&data.description)
    .bind(&data.image)
    .bind(data.stock)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

pub async fn set_sale(pool: &SqlitePool, id: i64, sale: &SaleUpdate) -> RepoResult<Product> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE products SET is_on_sale = ?1, discount_percentage = ?2, sale_start_date = ?3, sale_end_date = ?4, updated_at = ?5 WHERE id = ?6 AND is_deleted = 0",
    )
    .bind(sale.is_on_sale)
    .bind(sale.discount_percentage)
    .bind(sale.sale_start_date)
    .bind(sale.sale_end_date)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

pub async fn remove_sale(pool: &SqlitePool, id: i64) -> RepoResult<Product> {
    set_sale(
        pool,
        id,
        &SaleUpdate {
            is_on_sale: false,
            discount_percentage: 0.0,
            sale_start_date: None,
            sale_end_date: None,
        },
    )
    .await
}

/// Set the soft-delete flag; `false` if missing or already deleted
pub async fn soft_delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows =
        sqlx::query("UPDATE products SET is_deleted = 1, updated_at = ? WHERE id = ? AND is_deleted = 0")
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
    Ok(rows.rows_affected() > 0)
}

/// Clear the soft-delete flag; `false` if missing or not deleted
pub async fn restore(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows =
        sqlx::query("UPDATE products SET is_deleted = 0, updated_at = ? WHERE id = ? AND is_deleted = 1")
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete_permanent(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Non-deleted products with fewer than `threshold` units left
pub async fn low_stock(pool: &SqlitePool, threshold: i64) -> RepoResult<Vec<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE is_deleted = 0 AND stock < ? ORDER BY stock ASC");
    let rows = sqlx::query_as::<_, Product>(&sql)
        .bind(threshold)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn count_active(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE is_deleted = 0")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

// ── Stock (inside the placement transaction) ────────────────────────

/// Take `quantity` units if at least that many are left.
///
/// Check and decrement are one statement; `false` means the product is
/// missing, deleted, or short.
pub async fn decrement_stock(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    quantity: i64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE products SET stock = stock - ?1, updated_at = ?2 WHERE id = ?3 AND is_deleted = 0 AND stock >= ?1",
    )
    .bind(quantity)
    .bind(now)
    .bind(id)
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Current stock of a non-deleted product
pub async fn stock_of(tx: &mut Transaction<'_, Sqlite>, id: i64) -> RepoResult<Option<i64>> {
    let stock =
        sqlx::query_scalar::<_, i64>("SELECT stock FROM products WHERE id = ? AND is_deleted = 0")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
    Ok(stock)
}
