//! # inventario-db: Database Layer for Inventario
//!
//! SQLite storage for products, the barcode existence lookup used by the
//! generator, and the product workflow built on top of both.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Inventario Data Flow                             │
//! │                                                                         │
//! │  Web layer / binaries (seed, backfill-barcodes)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   inventario-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │ ProductoRepo   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ (BarcodeLookup)│    │  (embedded)  │  │   │
//! │  │   └───────────────┘    └───────▲────────┘    └──────────────┘  │   │
//! │  │                                │                                │   │
//! │  │   ┌───────────────┐    ┌───────┴────────┐                      │   │
//! │  │   │   backfill    │    │ProductoService │                      │   │
//! │  │   └───────────────┘    └────────────────┘                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and workflow error types
//! - [`repository`] - Product repository
//! - [`service`] - Create/update/scan workflow
//! - [`backfill`] - Barcode assignment for legacy products
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inventario_core::CodecConfig;
//! use inventario_db::{Database, DbConfig, ProductoService};
//!
//! let db = Database::new(DbConfig::from_env()).await?;
//! let service = ProductoService::new(db, &CodecConfig::load()?);
//! let producto = service.create(&form, &user_id).await?;
//! ```

pub mod backfill;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

pub use backfill::{backfill_missing_barcodes, BackfillReport, BarcodeAssignment};
pub use error::{DbError, DbResult, ServiceError, ServiceResult};
pub use pool::{Database, DbConfig};
pub use repository::producto::ProductoRepository;
pub use service::ProductoService;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for the binaries.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=inventario=trace` - Trace for inventario crates only
/// - Default: `info,inventario=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inventario=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
