//! # Producto Service
//!
//! The product workflow: validation, cost decoding, barcode generation and
//! persistence, in that order.
//!
//! ## Create Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  NewProducto { code: "103", cost: "hub", ... }                         │
//! │       │                                                                 │
//! │       ▼  validate_new_producto (cost letters checked against table)    │
//! │  ProductoDraft { cost: "HUB", ... }                                    │
//! │       │                                                                 │
//! │       ▼  CostCodec::decode                                             │
//! │  real_cost = 12                                                        │
//! │       │                                                                 │
//! │       ▼  BarcodeGenerator::generate_unique_async (repo as lookup)      │
//! │  barcode = "KXRTP00103"                                                │
//! │       │                                                                 │
//! │       ▼  ProductoRepository::insert                                    │
//! │  Producto                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use inventario_core::validation::{validate_barcode_query, validate_new_producto};
use inventario_core::{
    BarcodeGenerator, CodecConfig, CoreError, CostCodec, NewProducto, Producto, ValidationError,
};
use tracing::{debug, info};

use crate::error::{DbError, ServiceError, ServiceResult};
use crate::pool::Database;

/// Product workflow bound to one codec configuration.
#[derive(Debug, Clone)]
pub struct ProductoService {
    db: Database,
    codec: CostCodec,
    generator: BarcodeGenerator,
}

impl ProductoService {
    /// Creates the service with the codec and generator of `config`.
    pub fn new(db: Database, config: &CodecConfig) -> Self {
        ProductoService::with_parts(db, config.cost_codec(), config.barcode_generator())
    }

    pub fn with_parts(db: Database, codec: CostCodec, generator: BarcodeGenerator) -> Self {
        ProductoService {
            db,
            codec,
            generator,
        }
    }

    pub fn codec(&self) -> &CostCodec {
        &self.codec
    }

    pub fn generator(&self) -> &BarcodeGenerator {
        &self.generator
    }

    /// Creates a product with a decoded cost and a fresh unique barcode.
    pub async fn create(&self, form: &NewProducto, created_by: &str) -> ServiceResult<Producto> {
        let created_by = require_user(created_by)?;
        let draft = validate_new_producto(form, &self.codec)?;
        let real_cost = self.real_cost(&draft.cost)?;

        let repo = self.db.productos();
        let barcode = self
            .generator
            .generate_unique_async(&draft.code, &draft.cost, &repo)
            .await?;

        debug!(code = %draft.code, barcode = %barcode, "Barcode generated");

        let producto = Producto::from_draft(draft, real_cost, barcode, created_by);
        let producto = repo.insert(&producto).await?;

        info!(
            id = %producto.id,
            code = %producto.code,
            barcode = ?producto.barcode,
            real_cost = producto.real_cost,
            "Producto created"
        );

        Ok(producto)
    }

    /// Updates a product's fields and re-decodes its cost.
    ///
    /// The barcode assigned at creation is kept even if the code or cost
    /// change.
    pub async fn update(
        &self,
        id: &str,
        form: &NewProducto,
        edited_by: &str,
    ) -> ServiceResult<Producto> {
        let edited_by = require_user(edited_by)?;
        let draft = validate_new_producto(form, &self.codec)?;
        let real_cost = self.real_cost(&draft.cost)?;

        let mut producto = self.get(id).await?;
        producto.apply_draft(draft, real_cost, edited_by);
        self.db.productos().update(&producto).await?;

        info!(id = %producto.id, real_cost = producto.real_cost, "Producto updated");
        Ok(producto)
    }

    /// Gets a product by ID.
    pub async fn get(&self, id: &str) -> ServiceResult<Producto> {
        self.db
            .productos()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()).into())
    }

    /// Finds the product a scanned barcode belongs to.
    pub async fn find_by_barcode(&self, barcode: &str) -> ServiceResult<Producto> {
        let barcode = validate_barcode_query(barcode)?;

        self.db
            .productos()
            .get_by_barcode(&barcode)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(barcode).into())
    }

    /// Substring search over name, reference, code and barcode.
    pub async fn search(&self, query: &str, limit: u32) -> ServiceResult<Vec<Producto>> {
        Ok(self.db.productos().search(query, limit.min(100)).await?)
    }

    /// Adds `delta` to a product's quantity, refusing to go below zero.
    pub async fn adjust_quantity(&self, id: &str, delta: f64) -> ServiceResult<Producto> {
        if !delta.is_finite() {
            return Err(ValidationError::invalid_format("quantity", "must be a number").into());
        }

        let repo = self.db.productos();
        let applied = repo.adjust_quantity(id, delta).await.map_err(|e| match e {
            DbError::NotFound { .. } => CoreError::ProductNotFound(id.to_string()).into(),
            other => ServiceError::from(other),
        })?;

        let producto = self.get(id).await?;
        if !applied {
            return Err(CoreError::InsufficientStock {
                code: producto.code,
                available: producto.quantity,
                requested: -delta,
            }
            .into());
        }

        info!(id = %id, delta = delta, quantity = producto.quantity, "Quantity adjusted");
        Ok(producto)
    }

    /// Deletes a product.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        self.db.productos().delete(id).await.map_err(|e| match e {
            DbError::NotFound { .. } => CoreError::ProductNotFound(id.to_string()).into(),
            other => other.into(),
        })
    }

    fn real_cost(&self, cost: &str) -> Result<i64, ValidationError> {
        i64::try_from(self.codec.decode(cost))
            .map_err(|_| ValidationError::invalid_format("cost", "decoded value is too large"))
    }
}

fn require_user(user_id: &str) -> Result<&str, ValidationError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(ValidationError::required("user"));
    }
    Ok(user_id)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use inventario_core::{BarcodeLayout, CostTable, SubstitutionTable};

    async fn service(config: CodecConfig) -> ProductoService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        ProductoService::new(db, &config)
    }

    fn form(code: &str, cost: &str) -> NewProducto {
        NewProducto {
            supplier: "bodega".to_string(),
            reference: "ref-1".to_string(),
            name: "cinta satin".to_string(),
            quantity: "10".to_string(),
            unit: "metros".to_string(),
            cost: cost.to_string(),
            sale_price: "2500".to_string(),
            code: code.to_string(),
            packaging: None,
            cost_center_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_decodes_cost_and_assigns_barcode() {
        let service = service(CodecConfig::default()).await;

        let producto = service.create(&form("103", "hub"), "user-1").await.unwrap();

        assert_eq!(producto.cost, "HUB");
        assert_eq!(producto.real_cost, 12);
        assert_eq!(producto.name, "CINTA SATIN");

        let barcode = producto.barcode.clone().unwrap();
        assert_eq!(barcode.len(), 10);
        assert!(barcode.ends_with("103"));

        let found = service.find_by_barcode(&barcode.to_lowercase()).await.unwrap();
        assert_eq!(found.id, producto.id);
    }

    #[tokio::test]
    async fn test_create_with_layout_a_and_classic_table() {
        let config = CodecConfig {
            cost_table: CostTable::Classic,
            barcode_layout: BarcodeLayout::A,
        };
        let service = service(config).await;

        let producto = service.create(&form("103", "xdf"), "user-1").await.unwrap();

        assert_eq!(producto.real_cost, 446);
        let barcode = producto.barcode.unwrap();
        assert!(barcode.ends_with("103XDF"));
        assert_eq!(barcode.len(), 12);
        assert_eq!(service.codec().table(), &SubstitutionTable::CLASSIC);
    }

    #[tokio::test]
    async fn test_barcodes_stay_unique() {
        let service = service(CodecConfig::default()).await;

        let mut seen = std::collections::HashSet::new();
        for _ in 0..20 {
            let producto = service.create(&form("103", "hub"), "user-1").await.unwrap();
            assert!(seen.insert(producto.barcode.unwrap()));
        }
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_form() {
        let service = service(CodecConfig::default()).await;

        let err = service.create(&form("103", "HUB7"), "user-1").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::InvalidFormat { .. })
        ));

        let err = service.create(&form("103", "hub"), " ").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::Required { .. })));
    }

    #[tokio::test]
    async fn test_update_keeps_barcode() {
        let service = service(CodecConfig::default()).await;
        let created = service.create(&form("103", "hub"), "user-1").await.unwrap();

        let updated = service
            .update(&created.id, &form("999", "uh"), "user-2")
            .await
            .unwrap();

        assert_eq!(updated.real_cost, 10);
        assert_eq!(updated.code, "999");
        assert_eq!(updated.barcode, created.barcode);
        assert_eq!(updated.edited_by.as_deref(), Some("user-2"));

        let stored = service.get(&created.id).await.unwrap();
        assert_eq!(stored.real_cost, 10);
    }

    #[tokio::test]
    async fn test_adjust_quantity() {
        let service = service(CodecConfig::default()).await;
        let created = service.create(&form("103", "hub"), "user-1").await.unwrap();

        let p = service.adjust_quantity(&created.id, -4.0).await.unwrap();
        assert_eq!(p.quantity, 6.0);

        let err = service.adjust_quantity(&created.id, -7.0).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::InsufficientStock { .. })
        ));

        let p = service.adjust_quantity(&created.id, 1.5).await.unwrap();
        assert_eq!(p.quantity, 7.5);

        assert!(matches!(
            service.adjust_quantity("missing", -1.0).await,
            Err(ServiceError::Core(CoreError::ProductNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_withdrawals_keep_stock_non_negative() {
        let service = service(CodecConfig::default()).await;
        let created = service.create(&form("103", "hub"), "user-1").await.unwrap();

        let (a, b) = tokio::join!(
            service.adjust_quantity(&created.id, -7.0),
            service.adjust_quantity(&created.id, -7.0)
        );

        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        let err = a.err().or(b.err()).unwrap();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::InsufficientStock { .. })
        ));

        let stored = service.get(&created.id).await.unwrap();
        assert_eq!(stored.quantity, 3.0);
    }

    #[tokio::test]
    async fn test_not_found() {
        let service = service(CodecConfig::default()).await;

        assert!(matches!(
            service.find_by_barcode("NOPE000000").await,
            Err(ServiceError::Core(CoreError::ProductNotFound(_)))
        ));
        assert!(matches!(
            service.delete("missing").await,
            Err(ServiceError::Core(CoreError::ProductNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_search_and_delete() {
        let service = service(CodecConfig::default()).await;
        let created = service.create(&form("103", "hub"), "user-1").await.unwrap();

        assert_eq!(service.search("satin", 500).await.unwrap().len(), 1);

        service.delete(&created.id).await.unwrap();
        assert!(service.search("", 10).await.unwrap().is_empty());
    }
}
