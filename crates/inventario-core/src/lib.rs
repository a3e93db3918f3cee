//! # inventario-core: Pure Business Logic for Inventario
//!
//! Cost decoding, barcode generation, product types and form validation,
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Inventario Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Web layer (forms, scanning UI)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ NewProducto                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ inventario-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cost    │  │  barcode  │  │   types   │  │ validation│  │   │
//! │  │   │ CostCodec │  │ Generator │  │ Producto  │  │   rules   │  │   │
//! │  │   └───────────┘  └─────┬─────┘  └───────────┘  └───────────┘  │   │
//! │  │                        │ BarcodeLookup (port)                  │   │
//! │  └────────────────────────┼────────────────────────────────────────┘   │
//! │                           │                                             │
//! │  ┌────────────────────────▼────────────────────────────────────────┐   │
//! │  │             inventario-db (SQLite, product workflow)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cost`] - Substitution tables and the cost codec
//! - [`barcode`] - Barcode layouts, candidate rendering, unique generation
//! - [`config`] - Table/layout selection, loaded once per process
//! - [`types`] - Product domain types
//! - [`validation`] - Product form rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use inventario_core::config::CodecConfig;
//!
//! let config = CodecConfig::default();
//! let codec = config.cost_codec();
//! let generator = config.barcode_generator();
//!
//! assert_eq!(codec.decode("hub"), 12);
//!
//! let barcode = generator.generate_unique("103", "hub", |_| false);
//! assert_eq!(barcode.len(), 10);
//! assert!(barcode.ends_with("103"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod barcode;
pub mod config;
pub mod cost;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use barcode::{BarcodeGenerator, BarcodeLayout, BarcodeLookup};
pub use config::{CodecConfig, ConfigError, CostTable};
pub use cost::{format_real_cost, CostCodec, SubstitutionTable};
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;
