//! # Producto Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD operations
//! - Barcode lookups (exact match, existence)
//! - Quantity adjustments
//!
//! ## Barcode Existence Port
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BarcodeGenerator::generate_unique_async                               │
//! │       │  lookup.exists("KXRTP00103")                                   │
//! │       ▼                                                                 │
//! │  ProductoRepository (impl BarcodeLookup)                               │
//! │       │  SELECT EXISTS(... WHERE barcode = ?1)                         │
//! │       ▼                                                                 │
//! │  UNIQUE index on productos.barcode                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use inventario_core::{BarcodeLookup, Producto};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

const SELECT_PRODUCTO: &str = r#"
    SELECT
        id, supplier, reference, name, quantity, unit,
        cost, real_cost, sale_price, code, barcode, packaging,
        cost_center_id, created_by, edited_by, created_at, updated_at
    FROM productos
"#;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductoRepository {
    pool: SqlitePool,
}

impl ProductoRepository {
    /// Creates a new ProductoRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductoRepository { pool }
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Producto)` - Inserted product
    /// * `Err(DbError::UniqueViolation)` - Barcode already taken
    pub async fn insert(&self, producto: &Producto) -> DbResult<Producto> {
        debug!(code = %producto.code, barcode = ?producto.barcode, "Inserting producto");

        sqlx::query(
            r#"
            INSERT INTO productos (
                id, supplier, reference, name, quantity, unit,
                cost, real_cost, sale_price, code, barcode, packaging,
                cost_center_id, created_by, edited_by, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11, ?12,
                ?13, ?14, ?15, ?16, ?17
            )
            "#,
        )
        .bind(&producto.id)
        .bind(producto.supplier)
        .bind(&producto.reference)
        .bind(&producto.name)
        .bind(producto.quantity)
        .bind(producto.unit)
        .bind(&producto.cost)
        .bind(producto.real_cost)
        .bind(&producto.sale_price)
        .bind(&producto.code)
        .bind(&producto.barcode)
        .bind(&producto.packaging)
        .bind(&producto.cost_center_id)
        .bind(&producto.created_by)
        .bind(&producto.edited_by)
        .bind(producto.created_at)
        .bind(producto.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| with_barcode_context(e.into(), producto.barcode.as_deref()))?;

        Ok(producto.clone())
    }

    /// Updates the editable fields of an existing product.
    ///
    /// The barcode is not touched; see [`set_barcode`](Self::set_barcode).
    pub async fn update(&self, producto: &Producto) -> DbResult<()> {
        debug!(id = %producto.id, "Updating producto");

        let result = sqlx::query(
            r#"
            UPDATE productos SET
                supplier = ?2,
                reference = ?3,
                name = ?4,
                quantity = ?5,
                unit = ?6,
                cost = ?7,
                real_cost = ?8,
                sale_price = ?9,
                code = ?10,
                packaging = ?11,
                cost_center_id = ?12,
                edited_by = ?13,
                updated_at = ?14
            WHERE id = ?1
            "#,
        )
        .bind(&producto.id)
        .bind(producto.supplier)
        .bind(&producto.reference)
        .bind(&producto.name)
        .bind(producto.quantity)
        .bind(producto.unit)
        .bind(&producto.cost)
        .bind(producto.real_cost)
        .bind(&producto.sale_price)
        .bind(&producto.code)
        .bind(&producto.packaging)
        .bind(&producto.cost_center_id)
        .bind(&producto.edited_by)
        .bind(producto.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Producto", &producto.id));
        }

        Ok(())
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Producto>> {
        let producto = sqlx::query_as::<_, Producto>(&format!("{SELECT_PRODUCTO} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(producto)
    }

    /// Gets a product by exact barcode (scanner lookups).
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Producto>> {
        let producto =
            sqlx::query_as::<_, Producto>(&format!("{SELECT_PRODUCTO} WHERE barcode = ?1"))
                .bind(barcode)
                .fetch_optional(&self.pool)
                .await?;

        Ok(producto)
    }

    /// Checks whether any product carries `barcode`. Read-only.
    pub async fn barcode_exists(&self, barcode: &str) -> DbResult<bool> {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM productos WHERE barcode = ?1)")
                .bind(barcode)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists != 0)
    }

    /// Searches name, reference, code and barcode with a substring match.
    ///
    /// An empty query returns the most recently created products.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Producto>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching productos");

        if query.is_empty() {
            return self.list_recent(limit).await;
        }

        let pattern = format!("%{}%", query.to_uppercase());

        let productos = sqlx::query_as::<_, Producto>(&format!(
            r#"{SELECT_PRODUCTO}
            WHERE UPPER(name) LIKE ?1
               OR UPPER(reference) LIKE ?1
               OR code LIKE ?1
               OR barcode LIKE ?1
            ORDER BY created_at DESC
            LIMIT ?2"#
        ))
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = productos.len(), "Search returned productos");
        Ok(productos)
    }

    /// Lists the newest products first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Producto>> {
        let productos = sqlx::query_as::<_, Producto>(&format!(
            "{SELECT_PRODUCTO} ORDER BY created_at DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(productos)
    }

    /// Lists products of one cost center, newest first.
    pub async fn list_by_cost_center(&self, cost_center_id: &str) -> DbResult<Vec<Producto>> {
        let productos = sqlx::query_as::<_, Producto>(&format!(
            "{SELECT_PRODUCTO} WHERE cost_center_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(cost_center_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(productos)
    }

    /// Lists products with no barcode (NULL or empty), oldest first.
    pub async fn list_missing_barcode(&self) -> DbResult<Vec<Producto>> {
        let productos = sqlx::query_as::<_, Producto>(&format!(
            "{SELECT_PRODUCTO} WHERE barcode IS NULL OR barcode = '' ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(productos)
    }

    /// Assigns a barcode to an existing product.
    pub async fn set_barcode(&self, id: &str, barcode: &str) -> DbResult<()> {
        debug!(id = %id, barcode = %barcode, "Setting barcode");

        let result = sqlx::query("UPDATE productos SET barcode = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(barcode)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| with_barcode_context(e.into(), Some(barcode)))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Producto", id));
        }

        Ok(())
    }

    /// Applies a quantity delta (negative to withdraw, positive to restock).
    ///
    /// The stock check is part of the `UPDATE`, so the quantity never goes
    /// below zero even under concurrent withdrawals.
    ///
    /// ## Returns
    /// * `Ok(true)` - Delta applied
    /// * `Ok(false)` - Not enough stock, nothing written
    /// * `Err(DbError::NotFound)` - No product with that ID
    pub async fn adjust_quantity(&self, id: &str, delta: f64) -> DbResult<bool> {
        debug!(id = %id, delta = %delta, "Adjusting quantity");

        let result = sqlx::query(
            r#"
            UPDATE productos SET quantity = quantity + ?2, updated_at = ?3
            WHERE id = ?1 AND quantity + ?2 >= 0
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        match self.get_by_id(id).await? {
            Some(_) => Ok(false),
            None => Err(DbError::not_found("Producto", id)),
        }
    }

    /// Deletes a product.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting producto");

        let result = sqlx::query("DELETE FROM productos WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Producto", id));
        }

        Ok(())
    }

    /// Counts all products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM productos")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl BarcodeLookup for ProductoRepository {
    type Error = DbError;

    async fn exists(&self, candidate: &str) -> Result<bool, DbError> {
        self.barcode_exists(candidate).await
    }
}

fn with_barcode_context(err: DbError, barcode: Option<&str>) -> DbError {
    match (err, barcode) {
        (DbError::UniqueViolation { field, .. }, Some(barcode)) => DbError::duplicate(field, barcode),
        (err, _) => err,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
