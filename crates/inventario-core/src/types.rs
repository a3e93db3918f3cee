//! # Domain Types
//!
//! Product types shared by the workflow and the database layer.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  NewProducto (raw form text)                                            │
//! │       │                                                                 │
//! │       ▼  validation::validate_new_producto                              │
//! │  ProductoDraft (typed, uppercased)                                      │
//! │       │                                                                 │
//! │       ▼  + real cost (CostCodec) + barcode (BarcodeGenerator)           │
//! │  Producto (persisted)                                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! - `id`: UUID v4, immutable, used for database relations
//! - `code` / `barcode`: human-facing identifiers printed on the label

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Supplier
// =============================================================================

/// Where a product was sourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "lowercase")]
pub enum Supplier {
    Bodega,
    Alea,
}

impl Supplier {
    pub const ALL: [Supplier; 2] = [Supplier::Bodega, Supplier::Alea];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Supplier::Bodega => "bodega",
            Supplier::Alea => "alea",
        }
    }
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Supplier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Supplier::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

// =============================================================================
// Unit
// =============================================================================

/// Unit the quantity is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Metros,
    Yardas,
    Gramos,
    Unidad,
}

impl Unit {
    pub const ALL: [Unit; 4] = [Unit::Metros, Unit::Yardas, Unit::Gramos, Unit::Unidad];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Unit::Metros => "metros",
            Unit::Yardas => "yardas",
            Unit::Gramos => "gramos",
            Unit::Unidad => "unidad",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Unit::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

// =============================================================================
// Product Input
// =============================================================================

/// Product form as submitted: every field is raw text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProducto {
    pub supplier: String,
    pub reference: String,
    pub name: String,
    pub quantity: String,
    pub unit: String,
    /// Letter-coded cost as typed on the label.
    pub cost: String,
    pub sale_price: String,
    /// Product code; only its digits reach the barcode.
    pub code: String,
    pub packaging: Option<String>,
    pub cost_center_id: Option<String>,
}

/// A validated, normalized product form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductoDraft {
    pub supplier: Supplier,
    pub reference: String,
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    /// Encoded cost, uppercased and trimmed.
    pub cost: String,
    pub sale_price: String,
    pub code: String,
    pub packaging: Option<String>,
    pub cost_center_id: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A stock record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Producto {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub supplier: Supplier,
    pub reference: String,
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    /// Encoded cost, uppercased.
    pub cost: String,
    /// Decoded cost.
    pub real_cost: i64,
    pub sale_price: String,
    pub code: String,
    /// Generated barcode; `None` for records created before barcodes existed.
    pub barcode: Option<String>,
    pub packaging: Option<String>,
    pub cost_center_id: Option<String>,
    pub created_by: String,
    pub edited_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Producto {
    /// Builds a fresh record from a validated draft.
    pub fn from_draft(
        draft: ProductoDraft,
        real_cost: i64,
        barcode: String,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Producto {
            id: uuid::Uuid::new_v4().to_string(),
            supplier: draft.supplier,
            reference: draft.reference,
            name: draft.name,
            quantity: draft.quantity,
            unit: draft.unit,
            cost: draft.cost,
            real_cost,
            sale_price: draft.sale_price,
            code: draft.code,
            barcode: Some(barcode),
            packaging: draft.packaging,
            cost_center_id: draft.cost_center_id,
            created_by: created_by.into(),
            edited_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the editable fields from a draft, keeping id and barcode.
    pub fn apply_draft(&mut self, draft: ProductoDraft, real_cost: i64, edited_by: impl Into<String>) {
        self.supplier = draft.supplier;
        self.reference = draft.reference;
        self.name = draft.name;
        self.quantity = draft.quantity;
        self.unit = draft.unit;
        self.cost = draft.cost;
        self.real_cost = real_cost;
        self.sale_price = draft.sale_price;
        self.code = draft.code;
        self.packaging = draft.packaging;
        self.cost_center_id = draft.cost_center_id;
        self.edited_by = Some(edited_by.into());
        self.updated_at = Utc::now();
    }

    /// Checks whether `delta` can be applied without going below zero.
    pub fn can_adjust(&self, delta: f64) -> bool {
        self.quantity + delta >= 0.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
