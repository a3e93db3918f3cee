//! # Barcode Backfill
//!
//! Assigns a unique barcode to every product that has none.
//!
//! ## Usage
//! ```bash
//! cargo run -p inventario-db --bin backfill-barcodes -- --db ./data/inventario.db
//!
//! # Print the assignments as JSON on stdout
//! cargo run -p inventario-db --bin backfill-barcodes -- --json
//! ```

use std::env;

use inventario_core::CodecConfig;
use inventario_db::{backfill_missing_barcodes, init_tracing, Database, DbConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut db_config = DbConfig::from_env();
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_config = DbConfig::new(&args[i + 1]);
                    i += 1;
                }
            }
            "--json" => json = true,
            "--help" | "-h" => {
                println!("Inventario Barcode Backfill");
                println!();
                println!("Usage: backfill-barcodes [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $INVENTARIO_DB_PATH or ./inventario_dev.db)");
                println!("      --json         Print assignments as JSON");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = CodecConfig::load()?;
    let generator = config.barcode_generator();

    info!(
        db = %db_config.database_path.display(),
        barcode_layout = %generator.layout(),
        "Starting barcode backfill"
    );

    let db = Database::new(db_config).await?;
    let report = backfill_missing_barcodes(&db, &generator).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    info!(updated = report.updated, "Barcode backfill complete");
    db.close().await;

    Ok(())
}
