//! Cabinet and packing configuration.
//!
//! A [`CabinetConfig`] is built once (defaults, optionally a TOML file, then
//! command-line overrides), validated once, and passed by reference to the
//! dimensioner and the packing adapter.

use std::fs;
use std::path::Path;

use carcass_pack::Bin;
use serde::{Deserialize, Serialize};

use crate::error::{CarcassError, Result};

/// Overall dimensions and layout of the bookcase, in millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CabinetConfig {
    /// Outer width of the carcass.
    pub width: f64,
    /// Outer height of the carcass.
    pub height: f64,
    /// Depth of the carcass (front to back).
    pub depth: f64,
    /// Thickness of the sheet material.
    pub sheet_thickness: f64,
    /// Number of columns separated by vertical dividers.
    pub number_columns: usize,
    /// Shelf count for each column; length must equal `number_columns`.
    pub number_shelves: Vec<usize>,
    /// How panels are cut from stock.
    pub packing: PackingConfig,
}

impl Default for CabinetConfig {
    fn default() -> Self {
        Self {
            width: 1345.0,
            height: 1600.0,
            depth: 300.0,
            sheet_thickness: 18.0,
            number_columns: 2,
            number_shelves: vec![5, 4],
            packing: PackingConfig::default(),
        }
    }
}

/// Saw and stock settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackingConfig {
    /// Blade width added to both sides of every panel before packing.
    pub kerf: f64,
    /// Whether panels may be turned 90° on the sheet.
    pub allow_rotation: bool,
    /// Stock sheets available, in the order they are offered.
    pub stock: Vec<StockSheet>,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            kerf: 3.0,
            allow_rotation: true,
            stock: vec![StockSheet {
                width: 2440.0,
                height: 320.0,
                count: 7,
            }],
        }
    }
}

/// A batch of identical stock sheets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StockSheet {
    /// Sheet length along X.
    pub width: f64,
    /// Sheet width along Y.
    pub height: f64,
    /// How many such sheets are available.
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    1
}

/// Upper bound on the total shelf count.
pub const MAX_SHELVES: usize = 10_000;
/// Upper bound on the column count.
pub const MAX_COLUMNS: usize = 1_000;
/// Upper bound on the number of stock sheets in the catalog.
pub const MAX_STOCK_SHEETS: usize = 10_000;

/// Sum of `counts`, or `None` past `limit` or on overflow.
fn bounded_sum<'a>(counts: impl IntoIterator<Item = &'a usize>, limit: usize) -> Option<usize> {
    counts
        .into_iter()
        .try_fold(0usize, |acc, &n| acc.checked_add(n))
        .filter(|&total| total <= limit)
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl PackingConfig {
    /// Expand the stock list into the ordered bin catalog.
    pub fn bin_catalog(&self) -> Vec<Bin> {
        self.stock
            .iter()
            .flat_map(|s| std::iter::repeat(Bin::new(s.width, s.height)).take(s.count))
            .collect()
    }

    /// Check kerf and stock.
    pub fn validate(&self) -> Result<()> {
        if !positive(self.kerf) {
            return Err(CarcassError::InvalidConfig(format!(
                "kerf must be positive, got {}",
                self.kerf
            )));
        }
        for sheet in &self.stock {
            if !positive(sheet.width) || !positive(sheet.height) {
                return Err(CarcassError::InvalidConfig(format!(
                    "stock sheet {} x {} must have positive size",
                    sheet.width, sheet.height
                )));
            }
        }
        if bounded_sum(self.stock.iter().map(|s| &s.count), MAX_STOCK_SHEETS).is_none() {
            return Err(CarcassError::InvalidConfig(format!(
                "at most {MAX_STOCK_SHEETS} stock sheets are supported"
            )));
        }
        if self.stock.iter().all(|s| s.count == 0) {
            return Err(CarcassError::InvalidConfig(
                "at least one stock sheet is required".into(),
            ));
        }
        Ok(())
    }
}

impl CabinetConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Render as a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Total number of shelves across all columns, saturating on overflow.
    pub fn shelf_count(&self) -> usize {
        self.number_shelves.iter().fold(0, |acc, &n| acc.saturating_add(n))
    }

    /// Number of vertical dividers between columns.
    pub fn centre_count(&self) -> usize {
        self.number_columns.saturating_sub(1)
    }

    /// Check the configuration before any piece is derived.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
            ("sheet_thickness", self.sheet_thickness),
        ] {
            if !positive(value) {
                return Err(CarcassError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.number_columns == 0 {
            return Err(CarcassError::InvalidConfig(
                "number_columns must be at least 1".into(),
            ));
        }
        if self.number_columns > MAX_COLUMNS {
            return Err(CarcassError::InvalidConfig(format!(
                "number_columns is {} but at most {MAX_COLUMNS} are supported",
                self.number_columns
            )));
        }
        if self.number_shelves.len() != self.number_columns {
            return Err(CarcassError::InvalidConfig(format!(
                "number_shelves has {} entries but number_columns is {}",
                self.number_shelves.len(),
                self.number_columns
            )));
        }
        if bounded_sum(&self.number_shelves, MAX_SHELVES).is_none() {
            return Err(CarcassError::InvalidConfig(format!(
                "number_shelves {:?} exceeds {MAX_SHELVES} shelves in total",
                self.number_shelves
            )));
        }
        self.packing.validate()
    }
}
