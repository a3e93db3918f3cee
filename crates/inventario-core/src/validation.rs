//! # Validation Module
//!
//! Product form rules, applied before a cost is decoded or a barcode is
//! generated.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web form                                                     │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields                                                   │
//! │  ├── Supplier / unit in their allowed sets                             │
//! │  └── Cost made only of the configured table's letters                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── UNIQUE barcode                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use inventario_core::cost::CostCodec;
//! use inventario_core::types::NewProducto;
//! use inventario_core::validation::validate_new_producto;
//!
//! let form = NewProducto {
//!     supplier: "bodega".into(),
//!     reference: "ref-1".into(),
//!     name: "cinta".into(),
//!     quantity: "3".into(),
//!     unit: "metros".into(),
//!     cost: "hub".into(),
//!     sale_price: "2500".into(),
//!     code: "103".into(),
//!     ..Default::default()
//! };
//!
//! let draft = validate_new_producto(&form, &CostCodec::default()).unwrap();
//! assert_eq!(draft.cost, "HUB");
//! ```

use crate::cost::CostCodec;
use crate::error::ValidationError;
use crate::types::{NewProducto, ProductoDraft, Supplier, Unit};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of free-text fields.
pub const MAX_TEXT_LEN: usize = 200;

/// Validates and normalizes a product form.
///
/// ## Rules
/// - reference, name, quantity, cost, sale price and code are required
/// - quantity parses as a non-negative number
/// - supplier and unit belong to their allowed sets
/// - cost is a valid encoding for `codec`'s table
///
/// ## Normalization
/// Reference, name, cost and packaging are trimmed and uppercased; the code
/// and sale price are only trimmed.
pub fn validate_new_producto(form: &NewProducto, codec: &CostCodec) -> ValidationResult<ProductoDraft> {
    let supplier = validate_supplier(&form.supplier)?;
    let reference = required_text("reference", &form.reference)?.to_uppercase();
    let name = required_text("name", &form.name)?.to_uppercase();
    let quantity = validate_quantity(&form.quantity)?;
    let unit = validate_unit(&form.unit)?;
    let cost = validate_encoded_cost(&form.cost, codec)?;
    let sale_price = required_text("sale price", &form.sale_price)?.to_string();
    let code = required_text("code", &form.code)?.to_string();

    let packaging = form
        .packaging
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_uppercase);

    let cost_center_id = form
        .cost_center_id
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Ok(ProductoDraft {
        supplier,
        reference,
        name,
        quantity,
        unit,
        cost,
        sale_price,
        code,
        packaging,
        cost_center_id,
    })
}

/// Validates the encoded cost against the configured table.
///
/// ## Returns
/// The uppercased, trimmed encoding.
pub fn validate_encoded_cost(cost: &str, codec: &CostCodec) -> ValidationResult<String> {
    if cost.trim().is_empty() {
        return Err(ValidationError::required("cost"));
    }

    if !codec.is_valid_encoding(cost) {
        let letters: String = codec.table().letters().collect();
        return Err(ValidationError::invalid_format(
            "cost",
            format!("must contain only the letters {letters}"),
        ));
    }

    Ok(cost.trim().to_uppercase())
}

/// Parses the quantity text as a non-negative number.
pub fn validate_quantity(quantity: &str) -> ValidationResult<f64> {
    let quantity = required_text("quantity", quantity)?;

    let value: f64 = quantity
        .parse()
        .map_err(|_| ValidationError::invalid_format("quantity", "must be a number"))?;

    if !value.is_finite() {
        return Err(ValidationError::invalid_format("quantity", "must be a number"));
    }

    if value < 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(value)
}

/// Validates a barcode search term.
///
/// ## Returns
/// The trimmed, uppercased barcode.
pub fn validate_barcode_query(barcode: &str) -> ValidationResult<String> {
    Ok(required_text("barcode", barcode)?.to_uppercase())
}

fn validate_supplier(supplier: &str) -> ValidationResult<Supplier> {
    if supplier.trim().is_empty() {
        return Err(ValidationError::required("supplier"));
    }

    supplier.parse().map_err(|_| ValidationError::NotAllowed {
        field: "supplier".to_string(),
        allowed: Supplier::ALL.iter().map(|s| s.to_string()).collect(),
    })
}

fn validate_unit(unit: &str) -> ValidationResult<Unit> {
    if unit.trim().is_empty() {
        return Err(ValidationError::required("unit"));
    }

    unit.parse().map_err(|_| ValidationError::NotAllowed {
        field: "unit".to_string(),
        allowed: Unit::ALL.iter().map(|u| u.to_string()).collect(),
    })
}

fn required_text<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(value)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::SubstitutionTable;

    fn form() -> NewProducto {
        NewProducto {
            supplier: "bodega".to_string(),
            reference: " ref-9 ".to_string(),
            name: "botones".to_string(),
            quantity: "4.5".to_string(),
            unit: "unidad".to_string(),
            cost: " hub ".to_string(),
            sale_price: "1.500".to_string(),
            code: "103".to_string(),
            packaging: Some(" bolsa ".to_string()),
            cost_center_id: Some("   ".to_string()),
        }
    }

    #[test]
    fn test_valid_form_is_normalized() {
        let draft = validate_new_producto(&form(), &CostCodec::default()).unwrap();

        assert_eq!(draft.supplier, Supplier::Bodega);
        assert_eq!(draft.reference, "REF-9");
        assert_eq!(draft.name, "BOTONES");
        assert_eq!(draft.quantity, 4.5);
        assert_eq!(draft.unit, Unit::Unidad);
        assert_eq!(draft.cost, "HUB");
        assert_eq!(draft.sale_price, "1.500");
        assert_eq!(draft.packaging.as_deref(), Some("BOLSA"));
        assert!(draft.cost_center_id.is_none());
    }

    #[test]
    fn test_required_fields() {
        let mut f = form();
        f.code = "  ".to_string();
        assert_eq!(
            validate_new_producto(&f, &CostCodec::default()),
            Err(ValidationError::required("code"))
        );

        let mut f = form();
        f.cost = String::new();
        assert_eq!(
            validate_new_producto(&f, &CostCodec::default()),
            Err(ValidationError::required("cost"))
        );
    }

    #[test]
    fn test_cost_must_match_table() {
        let hub = CostCodec::new(SubstitutionTable::HUB);
        let classic = CostCodec::new(SubstitutionTable::CLASSIC);

        assert!(validate_encoded_cost("HUB7", &hub).is_err());
        assert!(validate_encoded_cost("XYZ", &hub).is_err());
        assert_eq!(validate_encoded_cost("xyz", &classic), Ok("XYZ".to_string()));
    }

    #[test]
    fn test_quantity_rules() {
        assert_eq!(validate_quantity("3"), Ok(3.0));
        assert_eq!(validate_quantity(" 0.25 "), Ok(0.25));
        assert!(matches!(
            validate_quantity("-1"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_quantity("tres"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(validate_quantity("NaN").is_err());
    }

    #[test]
    fn test_enums_not_allowed() {
        let mut f = form();
        f.unit = "litros".to_string();
        let err = validate_new_producto(&f, &CostCodec::default()).unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { ref field, .. } if field == "unit"));
    }

    #[test]
    fn test_too_long() {
        let mut f = form();
        f.name = "A".repeat(MAX_TEXT_LEN + 1);
        assert!(matches!(
            validate_new_producto(&f, &CostCodec::default()),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_barcode_query() {
        assert_eq!(validate_barcode_query(" abcde00103 "), Ok("ABCDE00103".to_string()));
        assert!(validate_barcode_query("").is_err());
    }
}
