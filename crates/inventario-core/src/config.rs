//! Codec configuration.
//!
//! The cost table and the barcode layout are chosen once at startup and
//! shared by the whole process. Configuration is loaded from environment
//! variables with fallback to defaults.
//!
//! | Variable                    | Values           | Default |
//! |-----------------------------|------------------|---------|
//! | `INVENTARIO_COST_TABLE`     | `classic`, `hub` | `hub`   |
//! | `INVENTARIO_BARCODE_LAYOUT` | `a`, `b`         | `b`     |

use serde::{Deserialize, Serialize};
use std::env;

use crate::barcode::{BarcodeGenerator, BarcodeLayout};
use crate::cost::{CostCodec, SubstitutionTable};

/// Environment variable selecting the substitution table.
pub const COST_TABLE_VAR: &str = "INVENTARIO_COST_TABLE";

/// Environment variable selecting the barcode layout.
pub const BARCODE_LAYOUT_VAR: &str = "INVENTARIO_BARCODE_LAYOUT";

/// Which substitution table a deployment decodes costs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostTable {
    /// Full A–Z table.
    Classic,
    /// `HUBLOTERAS` table.
    #[default]
    Hub,
}

impl CostTable {
    /// The constant table this choice refers to.
    pub const fn table(&self) -> SubstitutionTable {
        match self {
            CostTable::Classic => SubstitutionTable::CLASSIC,
            CostTable::Hub => SubstitutionTable::HUB,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "classic" => Some(CostTable::Classic),
            "hub" => Some(CostTable::Hub),
            _ => None,
        }
    }
}

/// Process-wide codec configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodecConfig {
    pub cost_table: CostTable,
    pub barcode_layout: BarcodeLayout,
}

impl CodecConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key → value source.
    ///
    /// Missing keys fall back to defaults; present but unknown values fail.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cost_table = match lookup(COST_TABLE_VAR) {
            Some(value) => CostTable::parse(&value)
                .ok_or_else(|| ConfigError::InvalidValue(COST_TABLE_VAR.to_string()))?,
            None => CostTable::default(),
        };

        let barcode_layout = match lookup(BARCODE_LAYOUT_VAR) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue(BARCODE_LAYOUT_VAR.to_string()))?,
            None => BarcodeLayout::default(),
        };

        Ok(CodecConfig {
            cost_table,
            barcode_layout,
        })
    }

    /// The cost codec for this deployment.
    pub const fn cost_codec(&self) -> CostCodec {
        CostCodec::new(self.cost_table.table())
    }

    /// The barcode generator for this deployment.
    pub const fn barcode_generator(&self) -> BarcodeGenerator {
        BarcodeGenerator::new(self.barcode_layout)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
