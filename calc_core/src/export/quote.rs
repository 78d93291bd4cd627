//! Quote request export.
//!
//! The quote collaborator prices a plain material list; labour rates,
//! mark-up and VAT are applied on its side.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "materials": [
//!     { "item": "6mm² twin & earth cable", "quantity": 20.0, "unit": "m" }
//!   ],
//!   "summary": "6mm² cable recommended for 32.0A load over 20m run (Method C, clipped direct); voltage drop 2.0%"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::{CableDerived, ScaffoldDerived, UValueDerived};
use crate::result::CalculationResult;

/// One priced line of the quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub item: String,
    pub quantity: f64,
    pub unit: String,
}

impl MaterialLine {
    pub fn new(item: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        MaterialLine {
            item: item.into(),
            quantity,
            unit: unit.into(),
        }
    }

    fn each(item: &str, count: u32) -> Self {
        MaterialLine::new(item, f64::from(count), "each")
    }
}

/// Input shape of the quote collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub materials: Vec<MaterialLine>,
    pub summary: String,
}

impl QuoteRequest {
    pub fn from_result<D: QuoteSource>(result: &CalculationResult<D>) -> Self {
        QuoteRequest {
            materials: result.derived().material_lines(),
            summary: result.summary().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Derived quantities that translate into purchasable materials
pub trait QuoteSource {
    fn material_lines(&self) -> Vec<MaterialLine>;
}

impl QuoteSource for CableDerived {
    /// The run length at the size that satisfies both ampacity and drop.
    fn material_lines(&self) -> Vec<MaterialLine> {
        let size = self.size_for_voltage_drop.unwrap_or(self.size_mm2);
        vec![MaterialLine::new(
            format!("{} twin & earth cable", size),
            self.length_m.0,
            "m",
        )]
    }
}

impl QuoteSource for UValueDerived {
    /// Insulation by area; nothing to quote without one.
    fn material_lines(&self) -> Vec<MaterialLine> {
        let thickness = self.recommended_thickness_mm.unwrap_or(self.thickness_mm);
        self.area_m2
            .map(|area| {
                vec![MaterialLine::new(
                    format!("{}mm {} insulation", thickness.0, self.material_name),
                    area.0,
                    "m²",
                )]
            })
            .unwrap_or_default()
    }
}

impl QuoteSource for ScaffoldDerived {
    fn material_lines(&self) -> Vec<MaterialLine> {
        vec![
            MaterialLine::each("Scaffold tube (6.3m)", self.tubes.total),
            MaterialLine::each("Right-angle coupler", self.fittings.right_angle),
            MaterialLine::each("Swivel coupler", self.fittings.swivel),
            MaterialLine::each("Base plate", self.fittings.base_plates),
            MaterialLine::each("Board clip", self.fittings.board_clips),
            MaterialLine::each("Scaffold board", self.boards.scaffold_boards),
            MaterialLine::each("Toe board", self.boards.toe_boards),
            MaterialLine::each("Wall tie", self.ties.total),
        ]
    }
}
