//! # Barcode Backfill
//!
//! Assigns a unique barcode to every product created before barcodes were
//! generated (NULL or empty `barcode`).
//!
//! Each barcode is generated against the live table, so barcodes assigned
//! earlier in the same run count as taken.

use inventario_core::BarcodeGenerator;
use serde::Serialize;
use tracing::info;

use crate::error::DbResult;
use crate::pool::Database;

/// One barcode written by the backfill.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeAssignment {
    pub id: String,
    pub name: String,
    pub code: String,
    pub barcode: String,
}

/// Outcome of a backfill run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BackfillReport {
    pub updated: usize,
    pub assignments: Vec<BarcodeAssignment>,
}

/// Generates and stores barcodes for all products missing one.
pub async fn backfill_missing_barcodes(
    db: &Database,
    generator: &BarcodeGenerator,
) -> DbResult<BackfillReport> {
    let repo = db.productos();
    let pending = repo.list_missing_barcode().await?;

    info!(count = pending.len(), "Products without barcode");

    let mut report = BackfillReport::default();

    for producto in pending {
        let barcode = generator
            .generate_unique_async(&producto.code, &producto.cost, &repo)
            .await?;

        repo.set_barcode(&producto.id, &barcode).await?;

        info!(
            name = %producto.name,
            code = %producto.code,
            barcode = %barcode,
            "Barcode assigned"
        );

        report.assignments.push(BarcodeAssignment {
            id: producto.id,
            name: producto.name,
            code: producto.code,
            barcode,
        });
        report.updated += 1;
    }

    Ok(report)
}
