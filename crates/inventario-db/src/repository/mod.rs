//! # Repository Module
//!
//! Database repository implementations for Inventario.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductoService / backfill                                            │
//! │       │                                                                 │
//! │       │  db.productos().get_by_barcode("KXRTP00103")                   │
//! │       ▼                                                                 │
//! │  ProductoRepository                                                    │
//! │  ├── insert / update / delete                                          │
//! │  ├── get_by_id / get_by_barcode / search                               │
//! │  ├── barcode_exists (BarcodeLookup port)                               │
//! │  └── list_missing_barcode / set_barcode                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod producto;
