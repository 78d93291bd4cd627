//! Insulation Materials
//!
//! Thermal conductivity (λ) and installed cost per m² for the insulation
//! products offered by the U-value calculator.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Thermal and cost properties of one insulation product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperty {
    /// Form code (e.g. "mineral-wool")
    pub code: String,
    /// Display name
    pub name: String,
    /// Thermal conductivity λ (W/m·K)
    pub lambda_w_mk: f64,
    /// Supply cost per m² of element area
    pub cost_per_m2: f64,
}

impl MaterialProperty {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        lambda_w_mk: f64,
        cost_per_m2: f64,
    ) -> Self {
        MaterialProperty {
            code: code.into(),
            name: name.into(),
            lambda_w_mk,
            cost_per_m2,
        }
    }
}

/// Insulation code to property mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialTable {
    materials: Vec<MaterialProperty>,
}

/// Built-in insulation products.
pub static DEFAULT_MATERIALS: Lazy<MaterialTable> = Lazy::new(|| MaterialTable {
    materials: vec![
        MaterialProperty::new("mineral-wool", "Mineral Wool", 0.044, 6.50),
        MaterialProperty::new("glass-wool", "Glass Wool", 0.040, 5.80),
        MaterialProperty::new("eps", "Expanded Polystyrene (EPS)", 0.038, 9.20),
        MaterialProperty::new("xps", "Extruded Polystyrene (XPS)", 0.034, 14.50),
        MaterialProperty::new("pir", "PIR Board", 0.022, 18.00),
        MaterialProperty::new("phenolic", "Phenolic Foam", 0.020, 22.50),
        MaterialProperty::new("wood-fibre", "Wood Fibre", 0.038, 16.00),
        MaterialProperty::new("sheep-wool", "Sheep's Wool", 0.039, 12.00),
    ],
});

/// Normalize a form code: lowercase, spaces and underscores as hyphens
fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase().replace([' ', '_'], "-")
}

impl MaterialTable {
    /// Build a table, rejecting non-positive λ, negative costs and duplicate codes.
    pub fn new(materials: Vec<MaterialProperty>) -> CalcResult<Self> {
        for (i, mat) in materials.iter().enumerate() {
            if !(mat.lambda_w_mk > 0.0) {
                return Err(CalcError::invalid_table(
                    "insulation",
                    format!("λ for '{}' must be positive", mat.code),
                ));
            }
            if !(mat.cost_per_m2 >= 0.0) {
                return Err(CalcError::invalid_table(
                    "insulation",
                    format!("Cost for '{}' cannot be negative", mat.code),
                ));
            }
            let code = normalize_code(&mat.code);
            if materials[..i].iter().any(|m| normalize_code(&m.code) == code) {
                return Err(CalcError::invalid_table(
                    "insulation",
                    format!("Duplicate material code '{}'", mat.code),
                ));
            }
        }
        Ok(MaterialTable { materials })
    }

    /// Look up a material by code (case-insensitive, `_`/space treated as `-`)
    pub fn get(&self, code: &str) -> CalcResult<&MaterialProperty> {
        let wanted = normalize_code(code);
        self.materials
            .iter()
            .find(|m| normalize_code(&m.code) == wanted)
            .ok_or_else(|| CalcError::material_not_found(code.trim()))
    }

    /// All codes, in table order (for form option lists)
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.materials.iter().map(|m| m.code.as_str())
    }

    pub fn materials(&self) -> &[MaterialProperty] {
        &self.materials
    }
}
