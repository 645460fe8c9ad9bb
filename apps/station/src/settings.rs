//! # Station Settings
//!
//! Loads the station's JSON settings file once at startup and converts it
//! into the immutable configuration values the core takes at construction.
//! Nothing reads settings as ambient global state.
//!
//! ## Settings File
//! The keys match the settings document the receiving stations already
//! deploy (`input/settings.json`):
//!
//! ```json
//! {
//!   "shelf_count": 4,
//!   "serial_length": 10,
//!   "pn_loc": "B2",
//!   "date_loc": "E2",
//!   "cart_loc": "B4",
//!   "dn_loc": "E4",
//!   "serial_column": "C",
//!   "offsets": [7, 35, 64, 92]
//! }
//! ```
//!
//! `serial_length` is deliberately required: the length check is the only
//! guard against scanning the wrong label, so a deployment must be explicit
//! about it. Everything else has the stock-template defaults.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use wocheck_core::export::{DEFAULT_SERIAL_COLUMN, DEFAULT_SHELF_OFFSETS};
use wocheck_core::{SheetLayout, DEFAULT_SHELF_COUNT};

use crate::error::{StationError, StationResult};

/// Station settings, deserialized from the deployment's JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Number of physical shelves at this station.
    #[serde(default = "default_shelf_count")]
    pub shelf_count: usize,

    /// Exact required serial length. No default on purpose.
    pub serial_length: usize,

    /// Cell for the part number in the output template.
    #[serde(default = "default_pn_loc")]
    pub pn_loc: String,

    /// Cell for the order date.
    #[serde(default = "default_date_loc")]
    pub date_loc: String,

    /// Cell for the cart number.
    #[serde(default = "default_cart_loc")]
    pub cart_loc: String,

    /// Cell for the delivery number.
    #[serde(default = "default_dn_loc")]
    pub dn_loc: String,

    /// Column the serials are written into.
    #[serde(default = "default_serial_column")]
    pub serial_column: String,

    /// Starting row per shelf.
    #[serde(default = "default_offsets")]
    pub offsets: Vec<u32>,
}

fn default_shelf_count() -> usize {
    DEFAULT_SHELF_COUNT
}

fn default_pn_loc() -> String {
    "B2".to_string()
}

fn default_date_loc() -> String {
    "E2".to_string()
}

fn default_cart_loc() -> String {
    "B4".to_string()
}

fn default_dn_loc() -> String {
    "E4".to_string()
}

fn default_serial_column() -> String {
    DEFAULT_SERIAL_COLUMN.to_string()
}

fn default_offsets() -> Vec<u32> {
    DEFAULT_SHELF_OFFSETS.to_vec()
}

impl Settings {
    /// Loads and validates the settings file.
    pub fn load(path: &Path) -> StationResult<Self> {
        let raw = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings from an in-memory JSON document.
    pub fn from_json(raw: &str) -> StationResult<Self> {
        let settings: Settings = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> StationResult<()> {
        if self.serial_length == 0 {
            return Err(StationError::Settings(
                "serial_length must be greater than zero".to_string(),
            ));
        }
        if self.shelf_count == 0 {
            return Err(StationError::Settings(
                "shelf_count must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The template layout for the export assembler.
    pub fn layout(&self) -> SheetLayout {
        SheetLayout {
            pn_cell: self.pn_loc.clone(),
            date_cell: self.date_loc.clone(),
            cart_cell: self.cart_loc.clone(),
            dn_cell: self.dn_loc.clone(),
            serial_column: self.serial_column.clone(),
            shelf_offsets: self.offsets.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_settings_use_defaults() {
        let settings = Settings::from_json(r#"{ "serial_length": 10 }"#).unwrap();
        assert_eq!(settings.shelf_count, 4);
        assert_eq!(settings.serial_length, 10);
        assert_eq!(settings.offsets, vec![7, 35, 64, 92]);
        assert_eq!(settings.serial_column, "C");
    }

    #[test]
    fn test_serial_length_is_required() {
        assert!(Settings::from_json(r#"{ "shelf_count": 4 }"#).is_err());
    }

    #[test]
    fn test_zero_serial_length_rejected() {
        let err = Settings::from_json(r#"{ "serial_length": 0 }"#).unwrap_err();
        assert!(matches!(err, StationError::Settings(_)));
    }

    #[test]
    fn test_layout_carries_cell_addresses() {
        let settings = Settings::from_json(
            r#"{
                "serial_length": 10,
                "pn_loc": "A1",
                "date_loc": "A2",
                "cart_loc": "A3",
                "dn_loc": "A4",
                "serial_column": "D",
                "offsets": [5, 40]
            }"#,
        )
        .unwrap();

        let layout = settings.layout();
        assert_eq!(layout.pn_cell, "A1");
        assert_eq!(layout.dn_cell, "A4");
        assert_eq!(layout.serial_column, "D");
        assert_eq!(layout.shelf_offsets, vec![5, 40]);
    }
}
