//! # Seed Data Generator
//!
//! Populates the database with sample products for development, going
//! through the same create workflow as the web layer (cost decoding and
//! barcode generation included).
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p inventario-db --bin seed
//!
//! # Generate custom amount into a specific database
//! cargo run -p inventario-db --bin seed -- --count 1000 --db ./data/inventario.db
//!
//! # Use the classic cost table and layout A
//! INVENTARIO_COST_TABLE=classic INVENTARIO_BARCODE_LAYOUT=a cargo run -p inventario-db --bin seed
//! ```

use std::env;

use inventario_core::{format_real_cost, CodecConfig, NewProducto, SubstitutionTable, Supplier, Unit};
use inventario_db::{init_tracing, Database, DbConfig, ProductoService};
use tracing::{info, warn};

/// Sample product names per unit of measure
const CATALOG: &[(Unit, &[&str])] = &[
    (
        Unit::Metros,
        &["Cinta Satin", "Encaje", "Cordon", "Elastico", "Sesgo", "Tela Tul"],
    ),
    (Unit::Yardas, &["Cinta Grosgrain", "Vivo", "Cinta Terciopelo"]),
    (Unit::Gramos, &["Mostacilla", "Lentejuela", "Canutillo"]),
    (
        Unit::Unidad,
        &["Boton", "Hebilla", "Cremallera", "Broche", "Argolla", "Dije"],
    ),
];

const SEED_USER: &str = "seed";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_config = DbConfig::from_env();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_config = DbConfig::new(&args[i + 1]);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Inventario Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: $INVENTARIO_DB_PATH or ./inventario_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = CodecConfig::load()?;
    info!(
        db = %db_config.database_path.display(),
        count,
        cost_table = %config.cost_table.table(),
        barcode_layout = %config.barcode_layout,
        "Seeding products"
    );

    let db = Database::new(db_config).await?;

    let existing = db.productos().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has products, skipping seed");
        return Ok(());
    }

    let service = ProductoService::new(db, &config);
    let table = *service.codec().table();
    let start = std::time::Instant::now();
    let mut generated = 0;

    for seed in 0..count {
        let form = sample_form(&table, seed);

        match service.create(&form, SEED_USER).await {
            Ok(producto) => {
                generated += 1;
                if generated % 50 == 0 {
                    info!(
                        generated,
                        last_barcode = ?producto.barcode,
                        last_cost = %format_real_cost(producto.real_cost.unsigned_abs()),
                        "Progress"
                    );
                }
            }
            Err(e) => warn!(code = %form.code, error = %e, "Failed to create product"),
        }
    }

    let elapsed = start.elapsed();
    info!(
        generated,
        elapsed_ms = elapsed.as_millis() as u64,
        "Seed complete"
    );

    Ok(())
}

/// Builds a deterministic sample form for `seed`.
fn sample_form(table: &SubstitutionTable, seed: usize) -> NewProducto {
    let (unit, names) = CATALOG[seed % CATALOG.len()];
    let name = names[(seed / CATALOG.len()) % names.len()];
    let supplier = Supplier::ALL[seed % Supplier::ALL.len()];

    // Cost 500 - 49,999 pesos
    let cost = 500 + (seed as u64 * 7919) % 49_500;
    let sale_price = cost + cost * 40 / 100;

    NewProducto {
        supplier: supplier.to_string(),
        reference: format!("REF-{:04}", seed),
        name: format!("{} {}", name, seed),
        quantity: ((seed * 13) % 100 + 1).to_string(),
        unit: unit.to_string(),
        cost: encode_cost(table, cost),
        sale_price: sale_price.to_string(),
        code: (100 + seed).to_string(),
        packaging: None,
        cost_center_id: None,
    }
}

/// Writes `value` with the first letter of `table` mapped to each digit.
fn encode_cost(table: &SubstitutionTable, value: u64) -> String {
    value
        .to_string()
        .chars()
        .filter_map(|digit| {
            table
                .entries()
                .iter()
                .find(|(_, d)| *d == digit)
                .map(|(letter, _)| *letter)
        })
        .collect()
}
